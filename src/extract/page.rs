//! Code table extraction
//!
//! The page is a long article; the table we want sits inside a `<figure>`
//! somewhere after a heading announcing it. Layout drift is expected, so the
//! lookup is by heading text rather than by id or class.

use crate::extract::record::{is_valid_code, CodeRecord};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{trace, warn};

static HEADING: Lazy<Selector> = Lazy::new(|| selector("h1, h2, h3, h4, h5, h6"));
static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static CELL: Lazy<Selector> = Lazy::new(|| selector("td"));
static CODE: Lazy<Selector> = Lazy::new(|| selector("code"));

/// Element that wraps the code table on the page
const TABLE_CONTAINER: &str = "figure";

/// Heading level the table is announced with; other levels are a fallback
const TABLE_HEADING: &str = "h2";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector parses")
}

/// Structural failures: the page no longer has the shape we expect
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("could not find the code table heading '{heading}'")]
    HeadingNotFound { heading: String },

    #[error("could not find the code table after heading '{heading}'")]
    TableNotFound { heading: String },
}

/// A parsed page that code records can be read from
pub struct CodePage {
    document: Html,
}

impl CodePage {
    /// Parses an HTML document; parsing itself never fails
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Finds the code table announced by `heading`
    pub fn locate_table(&self, heading: &str) -> Result<ElementRef<'_>, LayoutError> {
        let anchor = self
            .find_heading(heading)
            .ok_or_else(|| LayoutError::HeadingNotFound {
                heading: heading.to_string(),
            })?;

        self.find_next_container(anchor)
            .and_then(|container| container.select(&TABLE).next())
            .ok_or_else(|| LayoutError::TableNotFound {
                heading: heading.to_string(),
            })
    }

    /// Lazily yields the valid code records under `heading`, in page order
    ///
    /// A missing heading or table is logged as a warning and yields nothing.
    /// Rows that are too short, have no `<code>` element, or carry a
    /// malformed code are skipped.
    pub fn records(&self, heading: &str) -> impl Iterator<Item = CodeRecord> + '_ {
        let table = match self.locate_table(heading) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        table
            .into_iter()
            .flat_map(|table| table.select(&ROW).skip(1).filter_map(parse_row))
    }

    /// Heading whose text contains `phrase`, ignoring case and spacing
    ///
    /// The first matching `h2` wins; any other level is only used when no
    /// `h2` matches, so a page title repeating the phrase is not picked.
    fn find_heading(&self, phrase: &str) -> Option<ElementRef<'_>> {
        let needle = normalize(phrase);
        let mut matches = self
            .document
            .select(&HEADING)
            .filter(|heading| normalize(&element_text(*heading)).contains(&needle));

        let first = matches.next()?;
        if first.value().name() == TABLE_HEADING {
            return Some(first);
        }
        matches
            .find(|heading| heading.value().name() == TABLE_HEADING)
            .or(Some(first))
    }

    /// Nearest container following `anchor` in document order
    fn find_next_container<'a>(&'a self, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.document
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != anchor.id())
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == TABLE_CONTAINER)
    }
}

/// Extracts every valid code record from `html` under `heading`
///
/// # Example
///
/// ```
/// use shift_watch::extract_codes;
///
/// let html = r#"
///     <h2>Golden Key Codes</h2>
///     <figure><table>
///         <tr><th>Reward</th><th>Added</th><th>Code</th><th>Expires</th></tr>
///         <tr><td>3 Golden Key</td><td>Nov 20, 2025</td>
///             <td><code>ABCDE-12345-ABCDE-12345-ABCDE</code></td><td>Nov 27, 2025</td></tr>
///     </table></figure>"#;
///
/// let records = extract_codes(html, "golden key codes");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].reward, "3 Golden Key");
/// ```
pub fn extract_codes(html: &str, heading: &str) -> Vec<CodeRecord> {
    CodePage::parse(html).records(heading).collect()
}

fn parse_row(row: ElementRef<'_>) -> Option<CodeRecord> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < 4 {
        trace!("Skipping row with {} cells", cells.len());
        return None;
    }

    let Some(code) = cells[2].select(&CODE).next().map(element_text) else {
        trace!("Skipping row without a code element");
        return None;
    };

    if !is_valid_code(&code) {
        trace!("Skipping malformed code '{}'", code);
        return None;
    }

    Some(CodeRecord {
        code,
        reward: element_text(cells[0]),
        added_date: element_text(cells[1]),
        expire_date: element_text(cells[3]),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
