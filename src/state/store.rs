//! JSON state file
//!
//! The file holds `{ "codes": [...], "last_updated": "<RFC 3339>" }` and is
//! always rewritten whole through a temp file in the same directory.

use crate::state::known::KnownCodes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while writing the state file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace state file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    codes: Vec<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// Durable store of known codes
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the known code set
    ///
    /// A missing, unreadable or malformed file yields an empty set.
    pub fn load(&self) -> BTreeSet<String> {
        self.load_known().into_codes()
    }

    /// Loads the known codes together with the last-updated timestamp
    pub fn load_known(&self) -> KnownCodes {
        match self.read() {
            Ok(Some(known)) => known,
            Ok(None) => {
                tracing::debug!(
                    "No state file at {}, starting fresh",
                    self.path.display()
                );
                KnownCodes::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable state file {}: {}",
                    self.path.display(),
                    e
                );
                KnownCodes::new()
            }
        }
    }

    fn read(&self) -> StorageResult<Option<KnownCodes>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: StateFile = serde_json::from_str(&content)?;
        Ok(Some(KnownCodes::with_timestamp(
            file.codes.into_iter().collect(),
            file.last_updated,
        )))
    }

    /// Replaces the state file with `codes` and a fresh timestamp
    ///
    /// The caller supplies the complete set; nothing is merged here.
    pub fn save(&self, codes: &BTreeSet<String>) -> StorageResult<()> {
        let file = StateFile {
            codes: codes.iter().cloned().collect(),
            last_updated: Some(Utc::now().to_rfc3339()),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        // Temp files are created 0600; keep the mode of the file being replaced
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        tracing::debug!("Saved {} codes to {}", codes.len(), self.path.display());
        Ok(())
    }
}
