use crate::extract::CodeRecord;
use std::collections::BTreeSet;

/// The set of codes that have already been reported
///
/// Codes are only ever added; nothing removes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownCodes {
    codes: BTreeSet<String>,
    last_updated: Option<String>,
}

impl KnownCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_timestamp(codes: BTreeSet<String>, last_updated: Option<String>) -> Self {
        Self {
            codes,
            last_updated,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &BTreeSet<String> {
        &self.codes
    }

    pub fn into_codes(self) -> BTreeSet<String> {
        self.codes
    }

    /// Timestamp of the last save, as written to the state file
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Adds the codes of `records`, returning how many were not yet known
    pub fn merge<'a, I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a CodeRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.codes.insert(record.code.clone()))
            .count()
    }
}

impl From<BTreeSet<String>> for KnownCodes {
    fn from(codes: BTreeSet<String>) -> Self {
        Self {
            codes,
            last_updated: None,
        }
    }
}
