use crate::common::{code_page, create_test_config, row, Outbox};
use shift_watch::config::validate;
use shift_watch::notify::{Notifier, NotifyOutcome};
use shift_watch::runner::run_once;
use shift_watch::{StateStore, WatchError, Watcher};
use std::collections::BTreeSet;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GOLDEN: &str = "ABCDE-12345-ABCDE-12345-ABCDE";
const FRESH: &str = "ZZZZZ-11111-ZZZZZ-11111-ZZZZZ";

async fn serve_page(body: String) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/codes/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=UTF-8"),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

fn two_code_page() -> String {
    code_page(&[
        row("3 Golden Key", "Nov 20, 2025", GOLDEN, "Nov 27, 2025"),
        row("Promo", "Nov 20, 2025", "BAD-CODE", "Unknown"),
        row("5 Golden Keys", "Nov 21, 2025", FRESH, "Unknown"),
    ])
}

fn watcher(server: &MockServer, dir: &TempDir, outbox: &Outbox) -> Watcher {
    let config = create_test_config(
        &format!("{}/codes/", server.uri()),
        &dir.path().join("known_codes.json"),
    );
    let notifier = Notifier::new(Box::new(outbox.clone()), config.source.url.clone());
    Watcher::new(config)
        .expect("Failed to create watcher")
        .with_notifier(Some(notifier))
}

fn set(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_first_run_reports_every_code() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox);

    let report = watcher.run().await.expect("Run failed");

    assert_eq!(report.known_before, 0);
    assert_eq!(report.found, 2);
    assert_eq!(
        report
            .new_codes
            .iter()
            .map(|r| r.code.as_str())
            .collect::<Vec<_>>(),
        vec![GOLDEN, FRESH]
    );
    assert!(report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Sent);

    assert_eq!(watcher.store().load(), set(&[GOLDEN, FRESH]));

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "me@example.com");
    assert_eq!(
        sent[0].subject,
        "New Borderlands 4 Shift Codes Available (2 new)"
    );
    assert!(sent[0].text.contains(GOLDEN));
    assert!(sent[0].text.contains(FRESH));
    assert!(!sent[0].text.contains("BAD-CODE"));
    assert!(!sent[0].text.contains("COSME-TICCO-DECOS-METIC-CODES"));
}

#[tokio::test]
async fn test_second_run_finds_nothing_new() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox);

    watcher.run().await.expect("First run failed");
    let report = watcher.run().await.expect("Second run failed");

    assert_eq!(report.known_before, 2);
    assert_eq!(report.found, 2);
    assert!(report.new_codes.is_empty());
    assert!(!report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Skipped);
    assert_eq!(outbox.sent().len(), 1);
}

#[tokio::test]
async fn test_only_unknown_codes_are_reported() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox);

    watcher.store().save(&set(&[GOLDEN])).unwrap();

    let report = watcher.run().await.expect("Run failed");

    assert_eq!(report.known_before, 1);
    assert_eq!(report.new_codes.len(), 1);
    assert_eq!(report.new_codes[0].code, FRESH);
    assert_eq!(report.new_codes[0].reward, "5 Golden Keys");
    assert_eq!(watcher.store().load(), set(&[GOLDEN, FRESH]));

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains(FRESH));
    assert!(!sent[0].text.contains(GOLDEN));
}

#[tokio::test]
async fn test_known_codes_are_never_dropped() {
    let server = serve_page(code_page(&[row("1 Golden Key", "Nov 22", FRESH, "Nov 29")])).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox);

    // A code that has since vanished from the page
    watcher.store().save(&set(&[GOLDEN])).unwrap();
    watcher.run().await.expect("Run failed");

    assert_eq!(watcher.store().load(), set(&[GOLDEN, FRESH]));
}

#[tokio::test]
async fn test_fetch_failure_leaves_state_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/codes/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&mock_server, &dir, &outbox);

    let result = watcher.run().await;

    assert!(matches!(result, Err(WatchError::Fetch(_))));
    assert!(!dir.path().join("known_codes.json").exists());
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn test_not_found_is_a_fetch_failure() {
    // No mock mounted: wiremock answers 404
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&mock_server, &dir, &outbox);

    let result = watcher.run().await;
    assert!(matches!(result, Err(WatchError::Fetch(_))));
}

#[tokio::test]
async fn test_layout_change_yields_no_codes() {
    let body = r#"<html><body><h2>Borderlands 4 codes moved!</h2>
        <figure><table><tr><th>x</th></tr>
        <tr><td>a</td><td>b</td><td><code>ABCDE-12345-ABCDE-12345-ABCDE</code></td><td>c</td></tr>
        </table></figure></body></html>"#;
    let server = serve_page(body.to_string()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox);

    let report = watcher.run().await.expect("Layout drift must not fail the run");

    assert_eq!(report.found, 0);
    assert!(report.new_codes.is_empty());
    assert!(!dir.path().join("known_codes.json").exists());
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn test_email_failure_keeps_saved_state() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::failing();
    let watcher = watcher(&server, &dir, &outbox);

    let report = watcher.run().await.expect("Email failure must not fail the run");

    assert!(report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Failed);
    assert_eq!(watcher.store().load(), set(&[GOLDEN, FRESH]));

    // The codes count as reported from now on
    let again = watcher.run().await.unwrap();
    assert!(again.new_codes.is_empty());
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox).dry_run(true);

    let report = watcher.run().await.expect("Run failed");

    assert_eq!(report.new_codes.len(), 2);
    assert!(!report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Skipped);
    assert!(!dir.path().join("known_codes.json").exists());
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn test_run_without_notifier_still_saves() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox).with_notifier(None);

    let report = watcher.run().await.expect("Run failed");

    assert!(report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Skipped);
    assert_eq!(watcher.store().load().len(), 2);
}

#[tokio::test]
async fn test_corrupt_state_file_starts_fresh() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("known_codes.json");
    std::fs::write(&state_path, "{\"codes\": [truncated").unwrap();

    let outbox = Outbox::default();
    let watcher = watcher(&server, &dir, &outbox);
    let report = watcher.run().await.expect("Run failed");

    assert_eq!(report.known_before, 0);
    assert_eq!(report.new_codes.len(), 2);
    assert_eq!(StateStore::new(&state_path).load(), set(&[GOLDEN, FRESH]));
}

#[tokio::test]
async fn test_state_write_failure_still_notifies() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    // A regular file where the state directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let config = create_test_config(
        &format!("{}/codes/", server.uri()),
        &blocker.join("known_codes.json"),
    );
    let outbox = Outbox::default();
    let notifier = Notifier::new(Box::new(outbox.clone()), config.source.url.clone());
    let watcher = Watcher::new(config)
        .expect("Failed to create watcher")
        .with_notifier(Some(notifier));

    let report = watcher.run().await.expect("A failed save must not fail the run");

    assert!(!report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Sent);
    assert_eq!(outbox.sent().len(), 1);
    assert!(watcher.store().load().is_empty());
}

#[tokio::test]
async fn test_bad_email_settings_do_not_stop_the_run() {
    let server = serve_page(two_code_page()).await;
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("known_codes.json");

    let mut config = create_test_config(&format!("{}/codes/", server.uri()), &state_path);
    config.email.recipient = Some("not an address".to_string());
    config.email.provider = "sendgrid".to_string();
    config.mailjet.api_key = Some("key".to_string());
    config.mailjet.api_secret = Some("secret".to_string());
    validate(&config).expect("Email settings must not fail validation");

    let report = run_once(config).await.expect("Run failed");

    assert_eq!(report.new_codes.len(), 2);
    assert!(report.state_saved);
    assert_eq!(report.notification, NotifyOutcome::Skipped);
    assert_eq!(StateStore::new(&state_path).load(), set(&[GOLDEN, FRESH]));
}
