use crate::config::{Config, Provider};
use crate::notify::mailjet::MailjetMailer;
use crate::notify::message::Email;
use crate::notify::smtp::SmtpMailer;
use crate::notify::{NotifyError, NotifyResult};
use async_trait::async_trait;
use lettre::Address;

/// A way of delivering a rendered notification
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Short provider name for log lines
    fn name(&self) -> &'static str;

    /// Delivers `email` to its recipient
    async fn send(&self, email: &Email) -> NotifyResult<()>;
}

/// Builds the transport selected by `config.email.provider`
///
/// Fails on an unknown provider, a malformed recipient or sender address,
/// or missing credentials; callers treat that as "notifications disabled"
/// rather than a fatal error.
pub fn build_transport(config: &Config) -> NotifyResult<Box<dyn EmailTransport>> {
    let provider: Provider = config
        .email
        .provider
        .parse()
        .map_err(NotifyError::UnknownProvider)?;

    for address in [&config.email.recipient, &config.email.from_email]
        .into_iter()
        .flatten()
    {
        address.parse::<Address>()?;
    }

    let transport: Box<dyn EmailTransport> = match provider {
        Provider::Smtp => Box::new(SmtpMailer::from_config(&config.smtp, &config.email)?),
        Provider::Mailjet => {
            Box::new(MailjetMailer::from_config(&config.mailjet, &config.email)?)
        }
    };
    tracing::debug!("Using {} email transport", transport.name());
    Ok(transport)
}
