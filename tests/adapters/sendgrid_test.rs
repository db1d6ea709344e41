//! SendGrid adapter tests.

use mailrelay::providers::SendGridMailer;
use mailrelay::{Email, MailError, Mailer};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn valid_email() -> Email {
    Email::new()
        .from("tony.stark@example.com")
        .to("steve.rogers@example.com")
        .subject("Hello, Avengers!")
        .body("Hello\nWorld")
}

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(202).insert_header("X-Message-Id", "123-xyz")
}

// ============================================================================
// Basic Delivery Tests
// ============================================================================

#[tokio::test]
async fn successful_delivery_returns_ok() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .and(header("Authorization", "Bearer SG.test-api-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "from": {"email": "tony.stark@example.com"},
            "personalizations": [{"to": [{"email": "steve.rogers@example.com"}]}],
            "content": [
                {"type": "text/plain", "value": "Hello\nWorld"},
                {"type": "text/html", "value": "Hello<br>World"}
            ],
            "subject": "Hello, Avengers!"
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let delivery = mailer.deliver(&valid_email()).await.unwrap();
    assert_eq!(delivery.message_id, "123-xyz");
}

#[tokio::test]
async fn text_only_delivery_returns_ok() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key").base_url(server.uri());

    let email = Email::new()
        .from("tony.stark@example.com")
        .to("steve.rogers@example.com")
        .subject("Hello, Avengers!")
        .text_body("Hello");

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .and(body_json(json!({
            "from": {"email": "tony.stark@example.com"},
            "personalizations": [{"to": [{"email": "steve.rogers@example.com"}]}],
            "content": [{"type": "text/plain", "value": "Hello"}],
            "subject": "Hello, Avengers!"
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    assert!(mailer.deliver(&email).await.is_ok());
}

#[tokio::test]
async fn missing_message_id_header_generates_one() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = mailer.deliver(&valid_email()).await.unwrap();
    assert!(!delivery.message_id.is_empty());
}

#[tokio::test]
async fn compressed_delivery_sets_content_encoding() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key")
        .base_url(server.uri())
        .compress(true);

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .and(header("Content-Encoding", "gzip"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    assert!(mailer.deliver(&valid_email()).await.is_ok());
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn error_response_joins_messages() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [
                {"message": "The from address does not match a verified Sender Identity", "field": "from", "help": null},
                {"message": "Mail sending is disabled", "field": null, "help": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer.deliver(&valid_email()).await.unwrap_err();
    match err {
        MailError::ProviderError {
            provider,
            ref message,
            status,
        } => {
            assert_eq!(provider, "sendgrid");
            assert_eq!(status, Some(403));
            assert_eq!(
                message,
                "The from address does not match a verified Sender Identity; Mail sending is disabled"
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unparsable_error_body_is_unknown_error() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key").base_url(server.uri());

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = mailer.deliver(&valid_email()).await.unwrap_err();
    assert_eq!(err.to_string(), "Provider error (sendgrid): Unknown error");
}

#[tokio::test]
async fn missing_recipient_never_calls_the_api() {
    let server = MockServer::start().await;
    let mailer = SendGridMailer::new("SG.test-api-key").base_url(server.uri());

    Mock::given(method("POST"))
        .respond_with(success_response())
        .expect(0)
        .mount(&server)
        .await;

    let email = Email::new().from("tony.stark@example.com").subject("x");
    let err = mailer.deliver(&email).await.unwrap_err();
    assert!(matches!(err, MailError::MissingField("to")));
}
