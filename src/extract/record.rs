use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Five groups of five uppercase alphanumerics joined by hyphens
static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{5}(?:-[A-Z0-9]{5}){4}$").expect("code pattern compiles"));

/// Length of a well-formed code, hyphens included
pub const CODE_LEN: usize = 29;

/// One row of the code table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeRecord {
    /// The SHiFT code, e.g. `ABCDE-12345-ABCDE-12345-ABCDE`
    pub code: String,

    /// What the code unlocks, as displayed on the page
    pub reward: String,

    /// Display date the code was published
    pub added_date: String,

    /// Display date the code expires (often "Unknown")
    pub expire_date: String,
}

impl CodeRecord {
    pub fn new(
        code: impl Into<String>,
        reward: impl Into<String>,
        added_date: impl Into<String>,
        expire_date: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            reward: reward.into(),
            added_date: added_date.into(),
            expire_date: expire_date.into(),
        }
    }
}

impl fmt::Display for CodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.reward)
    }
}

/// Returns true if `code` has the exact SHiFT code shape
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN && CODE_PATTERN.is_match(code)
}
