use shift_watch::config::{EmailConfig, MailjetConfig};
use shift_watch::notify::{
    compose, sample_record, EmailTransport, MailjetMailer, NotifyError, Notifier, NotifyOutcome,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SOURCE: &str = "https://mentalmars.com/game-news/borderlands-4-shift-codes/";

fn mailer(server: &MockServer) -> MailjetMailer {
    let mailjet = MailjetConfig {
        api_url: format!("{}/v3.1/send", server.uri()),
        api_key: Some("key".to_string()),
        api_secret: Some("secret".to_string()),
    };
    let email = EmailConfig {
        recipient: Some("me@example.com".to_string()),
        from_email: Some("bot@example.com".to_string()),
        ..EmailConfig::default()
    };
    MailjetMailer::from_config(&mailjet, &email).expect("Failed to build mailer")
}

#[tokio::test]
async fn test_mailjet_request() {
    let mock_server = MockServer::start().await;

    // base64("key:secret")
    Mock::given(method("POST"))
        .and(path("/v3.1/send"))
        .and(header("authorization", "Basic a2V5OnNlY3JldA=="))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"Messages":[{"Status":"success"}]}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let email = compose(&[sample_record()], "me@example.com", SOURCE);
    mailer(&mock_server)
        .send(&email)
        .await
        .expect("Mailjet send failed");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let message = &body["Messages"][0];
    assert_eq!(message["From"]["Email"], "bot@example.com");
    assert_eq!(message["From"]["Name"], "Borderlands Monitor");
    assert_eq!(message["To"][0]["Email"], "me@example.com");
    assert_eq!(
        message["Subject"],
        "New Borderlands 4 Shift Codes Available (1 new)"
    );
    assert!(message["TextPart"]
        .as_str()
        .unwrap()
        .contains("Code: TEST1-2TEST-3TEST-4TEST-5TEST"));
    assert!(message["HTMLPart"]
        .as_str()
        .unwrap()
        .contains("TEST1-2TEST-3TEST-4TEST-5TEST"));
}

#[tokio::test]
async fn test_mailjet_rejection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3.1/send"))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key authentication failed"))
        .mount(&mock_server)
        .await;

    let email = compose(&[sample_record()], "me@example.com", SOURCE);
    let result = mailer(&mock_server).send(&email).await;

    match result {
        Err(NotifyError::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("authentication failed"));
        }
        other => panic!("Expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_notifier_absorbs_mailjet_outage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3.1/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let notifier = Notifier::new(Box::new(mailer(&mock_server)), SOURCE);
    let outcome = notifier.notify(&[sample_record()], "me@example.com").await;

    assert_eq!(outcome, NotifyOutcome::Failed);
}
