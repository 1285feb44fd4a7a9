//! Configuration module for Shift-Watch
//!
//! Configuration is assembled once at startup from an optional TOML file and
//! the process environment, then passed by reference to the components that
//! need it.
//!
//! # Example
//!
//! ```no_run
//! use shift_watch::config::resolve_config;
//! use std::path::Path;
//!
//! let config = resolve_config(Some(Path::new("shift-watch.toml"))).unwrap();
//! println!("State file: {}", config.state.path);
//! ```

mod env;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EmailConfig, MailjetConfig, Provider, SmtpConfig, SourceConfig, StateConfig,
    DEFAULT_FROM_NAME, DEFAULT_HEADING, DEFAULT_SOURCE_URL,
};

// Re-export loading functions
pub use env::{apply_env, apply_env_with};
pub use parser::{load_config, parse_config, resolve_config};
pub use validation::validate;
