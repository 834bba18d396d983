//! Configuration module for Index-Inspector
//!
//! Two layers live here:
//! - the TOML process configuration (database path, API endpoint, credentials)
//! - the per-run [`RunSettings`] resolved from the settings store
//!
//! # Example
//!
//! ```no_run
//! use index_inspector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("index-inspector.toml")).unwrap();
//! println!("Inspecting against: {}", config.api.endpoint);
//! ```

mod parser;
mod settings;
mod types;
mod validation;

// Re-export types
pub use settings::{
    RunSettings, DEFAULT_DELAY_MS, DEFAULT_MAX_REQUESTS_PER_RUN, DELAY_MS_KEY, MAX_REQUESTS_KEY,
    SITE_URL_KEY,
};
pub use types::{ApiConfig, Config, CredentialConfig, StorageConfig, DEFAULT_ENDPOINT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
