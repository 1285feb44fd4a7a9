//! Known-code state
//!
//! # Components
//!
//! - `KnownCodes`: the in-memory, append-only set of reported codes
//! - `StateStore`: loads and atomically saves that set as a JSON file

mod known;
mod store;

pub use known::KnownCodes;
pub use store::{StateStore, StorageError, StorageResult};
