//! Extraction of SHiFT code records from the source page
//!
//! This module contains:
//! - `CodeRecord`, the value extracted from each table row
//! - Code shape validation
//! - `CodePage`, which locates the code table by heading and reads its rows

mod page;
mod record;

pub use page::{extract_codes, CodePage, LayoutError};
pub use record::{is_valid_code, CodeRecord, CODE_LEN};
