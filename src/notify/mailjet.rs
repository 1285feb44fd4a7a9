use crate::config::{EmailConfig, MailjetConfig, Provider};
use crate::notify::message::Email;
use crate::notify::transport::EmailTransport;
use crate::notify::{NotifyError, NotifyResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Delivery through the Mailjet v3.1 send API
pub struct MailjetMailer {
    client: Client,
    api_url: String,
    api_key: String,
    api_secret: String,
    from_email: String,
    from_name: String,
}

impl MailjetMailer {
    pub fn from_config(mailjet: &MailjetConfig, email: &EmailConfig) -> NotifyResult<Self> {
        let (Some(api_key), Some(api_secret)) = (&mailjet.api_key, &mailjet.api_secret) else {
            return Err(NotifyError::MissingCredentials {
                provider: Provider::Mailjet,
                variables: "MAILJET_API_KEY and MAILJET_API_SECRET",
            });
        };

        let from_email = email.sender().ok_or(NotifyError::MissingSender)?;

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_url: mailjet.api_url.clone(),
            api_key: api_key.clone(),
            api_secret: api_secret.clone(),
            from_email: from_email.to_string(),
            from_name: email.from_name.clone(),
        })
    }

    /// Request body for one message
    fn payload(&self, email: &Email) -> Value {
        let sender = json!({ "Email": self.from_email, "Name": self.from_name });
        json!({
            "Messages": [{
                "From": sender,
                "To": [{ "Email": email.recipient }],
                "Subject": email.subject,
                "TextPart": email.text,
                "HTMLPart": email.html,
                "ReplyTo": sender,
            }]
        })
    }
}

#[async_trait]
impl EmailTransport for MailjetMailer {
    fn name(&self) -> &'static str {
        Provider::Mailjet.as_str()
    }

    async fn send(&self, email: &Email) -> NotifyResult<()> {
        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&self.payload(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Mailjet accepted the message ({})", status);
        Ok(())
    }
}
