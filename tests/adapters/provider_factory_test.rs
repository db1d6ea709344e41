//! Dispatcher wired to the real providers.

use mailrelay::{
    Dispatcher, ProviderConfig, ProviderFactory, SendGridConfig, SendRequest, SendResult,
    SmtpConfig,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sendgrid_request() -> SendRequest {
    SendRequest::new(
        "steve.rogers@example.com",
        "Hi",
        "line1\nline2",
        ProviderConfig::sendgrid(SendGridConfig {
            api_key: "SG.relay-key".into(),
            from_email: "noreply@avengers.org".into(),
        }),
    )
}

#[tokio::test]
async fn sendgrid_request_reaches_the_api() {
    let server = MockServer::start().await;
    let dispatcher =
        Dispatcher::with_factory(ProviderFactory::new().sendgrid_base_url(server.uri()));

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .and(header("Authorization", "Bearer SG.relay-key"))
        .and(body_json(json!({
            "from": {"email": "noreply@avengers.org"},
            "personalizations": [{"to": [{"email": "steve.rogers@example.com"}]}],
            "content": [
                {"type": "text/plain", "value": "line1\nline2"},
                {"type": "text/html", "value": "line1<br>line2"}
            ],
            "subject": "Hi"
        })))
        .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "sg-1"))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher.dispatch(&sendgrid_request()).await;
    assert_eq!(result, SendResult::sent(mailrelay::ProviderKind::SendGrid));
}

#[tokio::test]
async fn sendgrid_rejection_becomes_failure_message() {
    let server = MockServer::start().await;
    let dispatcher =
        Dispatcher::with_factory(ProviderFactory::new().sendgrid_base_url(server.uri()));

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{"message": "The provided authorization grant is invalid, expired, or revoked"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher.dispatch(&sendgrid_request()).await;
    assert_eq!(
        result,
        SendResult::failed(
            "The provided authorization grant is invalid, expired, or revoked"
        )
    );
}

#[tokio::test]
async fn unreachable_smtp_server_becomes_failure_message() {
    // Nothing listens on port 1 of the loopback interface.
    let dispatcher = Dispatcher::new();
    let request = SendRequest::new(
        "steve.rogers@example.com",
        "Hi",
        "body",
        ProviderConfig::smtp(SmtpConfig {
            host: "127.0.0.1".into(),
            port: Some(1),
            secure: false,
            user: "tony.stark@example.com".into(),
            password: "p".into(),
        }),
    );

    let result = dispatcher.dispatch(&request).await;
    assert!(!result.success);
    assert!(!result.message.is_empty());
    assert!(!result.message.starts_with("Send error:"), "{}", result.message);
}
