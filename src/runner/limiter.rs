//! Clock and fixed-delay rate limiting
//!
//! A run pauses for a fixed delay after every API call. The pause goes
//! through a [`Clock`] so tests can observe it without waiting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Source of time for a run
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time, used for inspection and log timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Suspends the run for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Enforces a fixed pause between consecutive requests
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay; returns immediately when the delay is zero
    pub async fn pause(&self, clock: &dyn Clock) {
        if self.delay.is_zero() {
            return;
        }
        tracing::trace!("Pausing {}ms before next request", self.delay.as_millis());
        clock.sleep(self.delay).await;
    }
}
