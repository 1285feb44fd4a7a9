//! Page fetching
//!
//! Builds the HTTP client from the source configuration and performs the
//! single GET a run needs.

mod fetcher;

pub use fetcher::{build_http_client, fetch_page, FetchError, FetchResult};
