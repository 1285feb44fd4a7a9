//! Shift-Watch main entry point
//!
//! This is the command-line interface for the Shift-Watch code watcher.

use anyhow::Context;
use clap::Parser;
use shift_watch::config::{resolve_config, Config};
use shift_watch::notify::{
    notifier_from_config, render_html, render_text, sample_record, NotifyOutcome,
};
use shift_watch::Watcher;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shift-Watch: a SHiFT code watcher
///
/// Fetches the code page, compares the listed codes with the ones already
/// reported and emails the new ones. Meant to be run periodically by an
/// external scheduler.
#[derive(Parser, Debug)]
#[command(name = "shift-watch")]
#[command(version)]
#[command(about = "Emails newly published SHiFT codes", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the known-codes state file (overrides the config)
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report new codes without saving them or sending email
    #[arg(long, conflicts_with_all = ["preview", "test_email"])]
    dry_run: bool,

    /// Run normally but never send email
    #[arg(long, conflicts_with_all = ["preview", "test_email"])]
    no_email: bool,

    /// Print the notification for a sample code and exit
    #[arg(long, conflicts_with = "test_email")]
    preview: bool,

    /// Send the notification for a sample code and exit
    #[arg(long)]
    test_email: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config =
        resolve_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(state) = &cli.state {
        config.state.path = state.display().to_string();
    }

    if cli.preview {
        handle_preview(&config);
    } else if cli.test_email {
        handle_test_email(&config).await?;
    } else {
        handle_run(config, cli.dry_run, cli.no_email).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shift_watch=info,warn"),
            1 => EnvFilter::new("shift_watch=debug,info"),
            2 => EnvFilter::new("shift_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --preview: renders both bodies for a sample record
fn handle_preview(config: &Config) {
    let records = vec![sample_record()];

    println!("=== HTML Version ===\n");
    println!("{}", render_html(&records, &config.source.url));
    println!("=== Plain Text Version ===\n");
    println!("{}", render_text(&records, &config.source.url));
}

/// Handles --test-email: sends the sample notification through the configured transport
async fn handle_test_email(config: &Config) -> anyhow::Result<()> {
    let (Some(notifier), Some(recipient)) =
        (notifier_from_config(config), config.email.recipient.as_deref())
    else {
        anyhow::bail!("Email is not configured; see the log above");
    };

    match notifier.notify(&[sample_record()], recipient).await {
        NotifyOutcome::Sent => {
            println!("✓ Test email sent to {}", recipient);
            Ok(())
        }
        _ => anyhow::bail!("Test email could not be sent"),
    }
}

/// Handles the regular run
async fn handle_run(config: Config, dry_run: bool, no_email: bool) -> anyhow::Result<()> {
    let notifier = if dry_run || no_email {
        None
    } else {
        notifier_from_config(&config)
    };

    let watcher = Watcher::new(config)?
        .with_notifier(notifier)
        .dry_run(dry_run);

    let report = watcher.run().await?;

    if dry_run {
        for record in &report.new_codes {
            println!(
                "{}\t{}\t{}\t{}",
                record.code, record.reward, record.added_date, record.expire_date
            );
        }
    }

    Ok(())
}
