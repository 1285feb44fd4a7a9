//! Run orchestration
//!
//! One run: load the known codes, fetch the page, extract the code table,
//! keep the codes not seen before, persist the grown set, then notify.
//! Only the fetch may fail the run; everything after it degrades to a
//! logged warning or error.

use crate::config::Config;
use crate::extract::{CodePage, CodeRecord};
use crate::fetch::{build_http_client, fetch_page};
use crate::notify::{Notifier, NotifyOutcome};
use crate::novelty::diff;
use crate::state::StateStore;
use chrono::Local;
use reqwest::Client;

/// What a run found and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Codes known before the run started
    pub known_before: usize,

    /// Valid codes found on the page
    pub found: usize,

    /// Codes that were not known yet, in page order
    pub new_codes: Vec<CodeRecord>,

    /// Whether the state file was rewritten
    pub state_saved: bool,

    pub notification: NotifyOutcome,
}

/// Runs the fetch / extract / diff / persist / notify pipeline
pub struct Watcher {
    config: Config,
    client: Client,
    store: StateStore,
    notifier: Option<Notifier>,
    dry_run: bool,
}

impl Watcher {
    /// Creates a watcher without notifications
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client(&config.source)?;
        let store = StateStore::new(&config.state.path);

        Ok(Self {
            config,
            client,
            store,
            notifier: None,
            dry_run: false,
        })
    }

    pub fn with_notifier(mut self, notifier: Option<Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// In a dry run new codes are reported but neither saved nor mailed
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Performs one complete run
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The page was fetched and processed
    /// * `Err(WatchError::Fetch)` - The page could not be fetched; state is untouched
    pub async fn run(&self) -> crate::Result<RunReport> {
        tracing::info!("Starting scrape at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

        let mut known = self.store.load_known();
        match known.last_updated() {
            Some(stamp) => tracing::info!(
                "Loaded {} known codes (last updated {})",
                known.len(),
                stamp
            ),
            None => tracing::info!("Loaded {} known codes", known.len()),
        }
        let known_before = known.len();

        let html = match fetch_page(&self.client, &self.config.source.url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Error fetching page: {}", e);
                return Err(e.into());
            }
        };

        // The parsed document is dropped before the next await
        let (found, new_codes) = {
            let page = CodePage::parse(&html);
            let mut found = 0usize;
            let new_codes = diff(
                page.records(&self.config.source.heading)
                    .inspect(|_| found += 1),
                known.codes(),
            );
            (found, new_codes)
        };
        tracing::info!("Found {} codes on the page", found);

        let mut report = RunReport {
            known_before,
            found,
            new_codes,
            state_saved: false,
            notification: NotifyOutcome::Skipped,
        };

        if report.new_codes.is_empty() {
            tracing::info!("No new codes found");
            self.finish();
            return Ok(report);
        }

        tracing::info!("Found {} new code(s):", report.new_codes.len());
        for record in &report.new_codes {
            tracing::info!("  - {}", record);
        }

        if self.dry_run {
            tracing::info!("Dry run: state file and email left untouched");
            self.finish();
            return Ok(report);
        }

        // Saved before notifying; a failed email is not retried
        known.merge(&report.new_codes);
        report.state_saved = match self.store.save(known.codes()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    "Failed to save known codes to {}: {}",
                    self.store.path().display(),
                    e
                );
                false
            }
        };

        report.notification = match (&self.notifier, self.config.email.recipient.as_deref()) {
            (Some(notifier), Some(recipient)) => {
                notifier.notify(&report.new_codes, recipient).await
            }
            _ => {
                tracing::info!("Skipping email notification");
                NotifyOutcome::Skipped
            }
        };

        self.finish();
        Ok(report)
    }

    fn finish(&self) {
        tracing::info!("Scrape completed at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    }
}
