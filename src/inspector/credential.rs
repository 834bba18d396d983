//! Bearer token sources
//!
//! The client asks its provider for a token on every call, so a provider that
//! re-reads its source (environment, file) picks up rotated tokens mid-run.

use crate::config::CredentialConfig;
use crate::inspector::error::CredentialError;

/// Opaque source of bearer tokens
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Result<String, CredentialError>;
}

/// A fixed token
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Result<String, CredentialError> {
        non_empty(self.0.clone())
    }
}

/// Token read from an environment variable at call time
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvToken {
    fn token(&self) -> Result<String, CredentialError> {
        let value =
            std::env::var(&self.var).map_err(|_| CredentialError::MissingEnv(self.var.clone()))?;
        non_empty(value)
    }
}

/// Token read from a file at call time
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: String,
}

impl TokenFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for TokenFile {
    fn token(&self) -> Result<String, CredentialError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| CredentialError::TokenFile {
                path: self.path.clone(),
                source,
            })?;
        non_empty(content)
    }
}

fn non_empty(token: String) -> Result<String, CredentialError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CredentialError::Empty);
    }
    Ok(token.to_string())
}

/// Builds the provider selected in the configuration
pub fn credential_provider(config: &CredentialConfig) -> Box<dyn CredentialProvider> {
    match config {
        CredentialConfig::Env { env_var } => Box::new(EnvToken::new(env_var.clone())),
        CredentialConfig::File { token_file } => Box::new(TokenFile::new(token_file.clone())),
        CredentialConfig::Static { token } => Box::new(StaticToken::new(token.clone())),
    }
}
