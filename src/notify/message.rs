//! Notification rendering
//!
//! Both renderings carry the same content: a count, one block per record,
//! and a footer linking to the redemption site and the source page.

use crate::extract::CodeRecord;
use std::fmt::Write;
use url::Url;

/// Where codes are redeemed
pub const REDEEM_URL: &str = "https://shift.gearboxsoftware.com/rewards";

/// A rendered notification ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders the notification for `records`
pub fn compose(records: &[CodeRecord], recipient: &str, source_url: &str) -> Email {
    Email {
        recipient: recipient.to_string(),
        subject: subject(records.len()),
        html: render_html(records, source_url),
        text: render_text(records, source_url),
    }
}

pub fn subject(count: usize) -> String {
    format!("New Borderlands 4 Shift Codes Available ({} new)", count)
}

/// Record used by `--preview` and `--test-email`
pub fn sample_record() -> CodeRecord {
    CodeRecord::new(
        "TEST1-2TEST-3TEST-4TEST-5TEST",
        "3 Golden Key",
        "Nov 20, 2025",
        "Nov 27, 2025",
    )
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; }
        .code {
            font-family: monospace;
            background-color: #f4f4f4;
            padding: 10px;
            border-radius: 5px;
            margin: 10px 0;
        }
        .code-block {
            background-color: #ffffff;
            border: 1px solid #ddd;
            border-radius: 5px;
            padding: 15px;
            margin: 10px 0;
        }
        h2 { color: #333; }
        .reward { font-weight: bold; color: #0066cc; }
        .date { color: #666; font-size: 0.9em; }
"#;

pub fn render_html(records: &[CodeRecord], source_url: &str) -> String {
    let mut html = String::new();

    html.push_str("<html>\n<head>\n    <style>");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str("    <h2>New Borderlands 4 Shift Codes!</h2>\n");
    let _ = writeln!(
        html,
        "    <p>Found <strong>{}</strong> new shift code(s):</p>",
        records.len()
    );

    for record in records {
        let _ = write!(
            html,
            r#"    <div class="code-block">
        <div class="reward">{}</div>
        <div class="code">{}</div>
        <div class="date">Added: {} | Expires: {}</div>
    </div>
"#,
            escape_html(&record.reward),
            escape_html(&record.code),
            escape_html(&record.added_date),
            escape_html(&record.expire_date),
        );
    }

    let _ = writeln!(
        html,
        r#"    <p><a href="{}">Redeem codes on the Official SHiFT Website</a></p>"#,
        REDEEM_URL
    );
    let _ = writeln!(
        html,
        r#"    <p><small>Source: <a href="{}">{}</a></small></p>"#,
        escape_html(source_url),
        escape_html(&source_label(source_url))
    );
    html.push_str("</body>\n</html>\n");

    html
}

pub fn render_text(records: &[CodeRecord], source_url: &str) -> String {
    let mut text = String::new();

    text.push_str("New Borderlands 4 Shift Codes Available!\n\n");
    let _ = writeln!(text, "Found {} new shift code(s):\n", records.len());

    for record in records {
        let _ = writeln!(text, "{}", record.reward);
        let _ = writeln!(text, "Code: {}", record.code);
        let _ = writeln!(
            text,
            "Added: {} | Expires: {}\n",
            record.added_date, record.expire_date
        );
    }

    text.push_str("Redeem codes on the Official SHiFT Website:\n");
    let _ = writeln!(text, "{}\n", REDEEM_URL);
    let _ = writeln!(text, "Source: {}", source_url);

    text
}

/// Host name of the source page, used as the link label
fn source_label(source_url: &str) -> String {
    Url::parse(source_url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| source_url.to_string())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
