use crate::config::types::{ApiConfig, Config, CredentialConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_api_config(&config.api)?;
    validate_credential_config(&config.credentials)?;
    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates API client configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if endpoint.scheme() != "https" && endpoint.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "endpoint must use http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the chosen credential source has what it needs
fn validate_credential_config(config: &CredentialConfig) -> Result<(), ConfigError> {
    match config {
        CredentialConfig::Env { env_var } if env_var.trim().is_empty() => Err(
            ConfigError::Validation("env-var cannot be empty".to_string()),
        ),
        CredentialConfig::File { token_file } if token_file.trim().is_empty() => Err(
            ConfigError::Validation("token-file cannot be empty".to_string()),
        ),
        CredentialConfig::Static { token } if token.trim().is_empty() => Err(
            ConfigError::Validation("static token cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}
