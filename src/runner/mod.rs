//! Run-level orchestration
//!
//! The `Watcher` owns the HTTP client, the state store and the optional
//! notifier for the duration of one run.

mod watcher;

pub use watcher::{RunReport, Watcher};

use crate::config::Config;
use crate::notify::notifier_from_config;

/// Runs one complete check with notifications set up from `config`
///
/// This is the main entry point when the CLI is not involved.
pub async fn run_once(config: Config) -> crate::Result<RunReport> {
    let notifier = notifier_from_config(&config);
    Watcher::new(config)?.with_notifier(notifier).run().await
}
