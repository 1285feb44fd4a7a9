//! Environment overlay
//!
//! Values found in the environment take precedence over the config file.
//! Credentials are only ever read here.

use crate::config::types::Config;
use crate::ConfigError;

/// Applies the process environment on top of `config`
pub fn apply_env(config: &mut Config) -> Result<(), ConfigError> {
    apply_env_with(config, |key| std::env::var(key).ok())
}

/// Applies environment values supplied by `lookup` on top of `config`
///
/// Empty values are treated as unset, which is what CI runners hand out for
/// secrets that were never defined.
pub fn apply_env_with<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(path) = get("STATE_FILE") {
        config.state.path = path;
    }

    if let Some(recipient) = get("RECIPIENT_EMAIL") {
        config.email.recipient = Some(recipient);
    }

    if let Some(provider) = get("EMAIL_PROVIDER") {
        config.email.provider = provider;
    }

    if let Some(from) = get("EMAIL_FROM").or_else(|| get("MAILJET_FROM_EMAIL")) {
        config.email.from_email = Some(from);
    }

    if let Some(name) = get("MAILJET_FROM_NAME") {
        config.email.from_name = name;
    }

    if let Some(host) = get("SMTP_HOST") {
        config.smtp.host = host;
    }

    if let Some(port) = get("SMTP_PORT") {
        config.smtp.port = port.parse().map_err(|_| {
            ConfigError::Validation(format!("SMTP_PORT must be a port number, got '{}'", port))
        })?;
    }

    config.smtp.username = get("SMTP_USERNAME").or(config.smtp.username.take());
    config.smtp.password = get("SMTP_PASSWORD").or(config.smtp.password.take());
    config.mailjet.api_key = get("MAILJET_API_KEY").or(config.mailjet.api_key.take());
    config.mailjet.api_secret = get("MAILJET_API_SECRET").or(config.mailjet.api_secret.take());

    Ok(())
}
