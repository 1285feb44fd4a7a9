//! Shift-Watch: a SHiFT code watcher
//!
//! This crate fetches a public page listing Borderlands SHiFT codes, extracts
//! the code table, compares it against a locally persisted set of codes that
//! were already reported, and emails a notification for the new ones.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod notify;
pub mod novelty;
pub mod runner;
pub mod state;

use thiserror::Error;

/// Main error type for Shift-Watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] state::StorageError),

    #[error("Notification error: {0}")]
    Notify(#[from] notify::NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Shift-Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_codes, CodePage, CodeRecord};
pub use novelty::diff;
pub use runner::{RunReport, Watcher};
pub use state::{KnownCodes, StateStore};
