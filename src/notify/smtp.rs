use crate::config::{EmailConfig, Provider, SmtpConfig};
use crate::notify::message::Email;
use crate::notify::transport::EmailTransport;
use crate::notify::{NotifyError, NotifyResult};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;

/// Implicit-TLS submission port; everything else uses STARTTLS
const SMTPS_PORT: u16 = 465;

/// Delivery through an authenticated SMTP relay
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(smtp: &SmtpConfig, email: &EmailConfig) -> NotifyResult<Self> {
        let (Some(username), Some(password)) = (&smtp.username, &smtp.password) else {
            return Err(NotifyError::MissingCredentials {
                provider: Provider::Smtp,
                variables: "SMTP_USERNAME and SMTP_PASSWORD",
            });
        };

        let sender = email.sender().ok_or(NotifyError::MissingSender)?;
        let from = Mailbox::new(Some(email.from_name.clone()), sender.parse()?);

        let builder = if smtp.port == SMTPS_PORT {
            SmtpTransport::relay(&smtp.host)?
        } else {
            SmtpTransport::starttls_relay(&smtp.host)?
        };

        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .timeout(Some(Duration::from_secs(30)))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    fn name(&self) -> &'static str {
        Provider::Smtp.as_str()
    }

    async fn send(&self, email: &Email) -> NotifyResult<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .reply_to(self.from.clone())
            .to(email.recipient.parse()?)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))?;

        // The lettre SMTP client blocks
        let transport = self.transport.clone();
        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))??;

        tracing::debug!("SMTP relay answered {}", response.code());
        Ok(())
    }
}
