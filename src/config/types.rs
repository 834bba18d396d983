use serde::Deserialize;

/// Default URL Inspection endpoint
pub const DEFAULT_ENDPOINT: &str =
    "https://searchconsole.googleapis.com/v1/urlInspection/index:inspect";

/// Main configuration structure for Index-Inspector
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub credentials: CredentialConfig,
}

/// Where subject rows, settings and logs live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Inspection API client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Inspection endpoint receiving the POST requests
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("index-inspector/{}", env!("CARGO_PKG_VERSION"))
}

/// Source of the bearer token sent to the inspection API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum CredentialConfig {
    /// Read the token from an environment variable
    Env {
        #[serde(rename = "env-var", default = "default_env_var")]
        env_var: String,
    },

    /// Read the token from a file, re-read on every request
    File {
        #[serde(rename = "token-file")]
        token_file: String,
    },

    /// Token written directly in the config file
    Static { token: String },
}

fn default_env_var() -> String {
    "GSC_ACCESS_TOKEN".to_string()
}
