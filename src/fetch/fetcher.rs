//! HTTP fetcher implementation
//!
//! One GET of the code page. Any transport failure or non-success status is
//! reported as a `FetchError`, which is the only error that ends a run early.

use crate::config::SourceConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching the code page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Builds an HTTP client for the page source
///
/// # Example
///
/// ```no_run
/// use shift_watch::config::SourceConfig;
/// use shift_watch::fetch::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> FetchResult<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(10).min(config.timeout()))
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Fetches `url` and returns the response body
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout | `FetchError::Timeout` |
/// | Connection/TLS failure | `FetchError::Http` |
/// | Non-2xx status | `FetchError::Status` |
/// | Body could not be read | `FetchError::Http` |
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    tracing::debug!(
        "Fetched {} ({}, {} bytes)",
        response.url(),
        status,
        response.content_length().unwrap_or(0)
    );

    response.text().await.map_err(|e| classify(url, e))
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
