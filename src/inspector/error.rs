//! Per-item inspection errors
//!
//! Every variant here is recorded on the row being inspected; none of them
//! stop a run.

use thiserror::Error;

/// Failure to obtain a bearer token
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Environment variable {0} is not set")]
    MissingEnv(String),

    #[error("Failed to read token file {path}: {source}")]
    TokenFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Credential source returned an empty token")]
    Empty,
}

/// Failure of a single inspection call
#[derive(Debug, Error)]
pub enum InspectionError {
    /// Connection failure, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response; `body` is the raw response text
    #[error("HTTP {status} {body}")]
    ApiHttp { status: u16, body: String },

    /// 2xx response that is not the expected JSON structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),
}

impl InspectionError {
    /// Builds a transport error, classifying the underlying reqwest failure
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Transport(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            Self::Transport(format!("Connection failed: {}", error))
        } else {
            Self::Transport(error.to_string())
        }
    }
}
