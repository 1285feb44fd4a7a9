//! Email notification of newly discovered codes
//!
//! This module handles:
//! - Rendering the HTML and plain-text notification
//! - The `EmailTransport` interface and its SMTP and Mailjet implementations
//! - `Notifier`, which sends and absorbs delivery failures

mod mailjet;
mod message;
mod smtp;
mod transport;

pub use mailjet::MailjetMailer;
pub use message::{compose, render_html, render_text, sample_record, subject, Email, REDEEM_URL};
pub use smtp::SmtpMailer;
pub use transport::{build_transport, EmailTransport};

use crate::config::{Config, Provider};
use crate::extract::CodeRecord;
use thiserror::Error;

/// Errors that can occur while preparing or delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{provider} credentials missing: set {variables}")]
    MissingCredentials {
        provider: Provider,
        variables: &'static str,
    },

    #[error("Unknown email provider '{0}' (expected smtp or mailjet)")]
    UnknownProvider(String),

    #[error("No sender address configured (set RECIPIENT_EMAIL or EMAIL_FROM)")]
    MissingSender,

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Email API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// What happened to a notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Nothing to send, or notifications are disabled
    Skipped,
    Sent,
    /// Delivery failed; the error was logged
    Failed,
}

/// Renders notifications and hands them to a transport
pub struct Notifier {
    transport: Box<dyn EmailTransport>,
    source_url: String,
}

impl Notifier {
    pub fn new(transport: Box<dyn EmailTransport>, source_url: impl Into<String>) -> Self {
        Self {
            transport,
            source_url: source_url.into(),
        }
    }

    /// Sends one notification listing `records` to `recipient`
    ///
    /// Does nothing for an empty slice. Delivery errors are logged and
    /// reported as `NotifyOutcome::Failed`, never returned.
    pub async fn notify(&self, records: &[CodeRecord], recipient: &str) -> NotifyOutcome {
        if records.is_empty() {
            return NotifyOutcome::Skipped;
        }

        let email = compose(records, recipient, &self.source_url);
        match self.transport.send(&email).await {
            Ok(()) => {
                tracing::info!(
                    "Email sent to {} via {} ({} code(s))",
                    recipient,
                    self.transport.name(),
                    records.len()
                );
                NotifyOutcome::Sent
            }
            Err(e) => {
                tracing::error!("Error sending email via {}: {}", self.transport.name(), e);
                NotifyOutcome::Failed
            }
        }
    }
}

/// Builds the notifier described by `config`
///
/// Returns `None`, after logging why, when there is no recipient or the
/// selected transport cannot be set up. The run goes on without email.
pub fn notifier_from_config(config: &Config) -> Option<Notifier> {
    if config.email.recipient.is_none() {
        tracing::warn!("RECIPIENT_EMAIL not set. Email notifications will be skipped.");
        return None;
    }

    match build_transport(config) {
        Ok(transport) => Some(Notifier::new(transport, &config.source.url)),
        Err(e) => {
            tracing::error!("Email notifications disabled: {}", e);
            None
        }
    }
}
