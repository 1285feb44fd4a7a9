use crate::config::types::{Config, SourceConfig, StateConfig};
use crate::ConfigError;
use url::Url;

/// Validates the settings a run cannot do without
///
/// Email addressing and the provider name are checked when the transport is
/// built; a mistake there disables notifications but never the run.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_state_config(&config.state)?;
    validate_mailjet_url(&config.mailjet.api_url)?;
    Ok(())
}

/// Validates the page source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid source url '{}': {}", config.url, e))
    })?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "Source url '{}' must use http or https",
            config.url
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be at least 1".to_string(),
        ));
    }

    if config.heading.trim().is_empty() {
        return Err(ConfigError::Validation("heading cannot be empty".to_string()));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_state_config(config: &StateConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "state path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_mailjet_url(api_url: &str) -> Result<(), ConfigError> {
    Url::parse(api_url).map(|_| ()).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid mailjet api-url '{}': {}", api_url, e))
    })
}
