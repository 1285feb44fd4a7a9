//! Novelty detection
//!
//! Decides which extracted records have not been reported yet.

use crate::extract::CodeRecord;
use std::collections::BTreeSet;

/// Returns the candidates whose code is not in `known`, in candidate order
///
/// Pure: neither input is modified. Duplicate candidates are passed through
/// unchanged.
pub fn diff<I>(candidates: I, known: &BTreeSet<String>) -> Vec<CodeRecord>
where
    I: IntoIterator<Item = CodeRecord>,
{
    candidates
        .into_iter()
        .filter(|record| !known.contains(&record.code))
        .collect()
}
