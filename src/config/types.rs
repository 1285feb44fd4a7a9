use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Page the codes are scraped from
pub const DEFAULT_SOURCE_URL: &str = "https://mentalmars.com/game-news/borderlands-4-shift-codes/";

/// Heading text that introduces the Golden Key code table
pub const DEFAULT_HEADING: &str = "Every Borderlands 4 SHiFT Code for Golden Keys";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_STATE_PATH: &str = "known_codes.json";

pub const DEFAULT_FROM_NAME: &str = "Borderlands Monitor";

pub const DEFAULT_MAILJET_API_URL: &str = "https://api.mailjet.com/v3.1/send";

/// Main configuration structure for Shift-Watch
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub state: StateConfig,
    pub email: EmailConfig,
    pub smtp: SmtpConfig,
    pub mailjet: MailjetConfig,
}

/// Where and how the code page is fetched
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of the page carrying the code table
    pub url: String,

    /// User-Agent header sent with the request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Heading text that anchors the code table
    pub heading: String,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            heading: DEFAULT_HEADING.to_string(),
        }
    }
}

/// Location of the known-codes file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub path: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STATE_PATH.to_string(),
        }
    }
}

/// Email transport provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    Smtp,
    #[default]
    Mailjet,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Mailjet => "mailjet",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    /// The unrecognised name
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "mailjet" => Ok(Self::Mailjet),
            _ => Err(s.trim().to_string()),
        }
    }
}

/// Notification addressing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Which transport delivers the notification, `smtp` or `mailjet`
    ///
    /// Kept as written; an unknown name disables notifications when the
    /// transport is built instead of failing the run.
    pub provider: String,

    /// Recipient address; notifications are skipped when unset
    pub recipient: Option<String>,

    /// Sender address; falls back to the recipient
    #[serde(rename = "from-email")]
    pub from_email: Option<String>,

    /// Sender display name
    #[serde(rename = "from-name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Sender address, defaulting to the recipient
    pub fn sender(&self) -> Option<&str> {
        self.from_email.as_deref().or(self.recipient.as_deref())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default().to_string(),
            recipient: None,
            from_email: None,
            from_name: DEFAULT_FROM_NAME.to_string(),
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,

    /// Only read from the environment
    #[serde(skip)]
    pub username: Option<String>,

    /// Only read from the environment
    #[serde(skip)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: None,
            password: None,
        }
    }
}

/// Mailjet API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailjetConfig {
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Only read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Only read from the environment
    #[serde(skip)]
    pub api_secret: Option<String>,
}

impl Default for MailjetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_MAILJET_API_URL.to_string(),
            api_key: None,
            api_secret: None,
        }
    }
}
