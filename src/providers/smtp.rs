//! SMTP provider using lettre.
//!
//! # Example
//!
//! ```rust,ignore
//! use mailrelay::providers::{SmtpMailer, TlsMode};
//!
//! // Implicit TLS (port 465)
//! let mailer = SmtpMailer::new("smtp.example.com", 465)
//!     .credentials("username", "password")
//!     .tls(TlsMode::Tls)
//!     .build()?;
//! ```

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::address::Address;
use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};

/// SMTP email provider.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    provider: &'static str,
}

impl SmtpMailer {
    /// Create a new SMTP mailer builder.
    ///
    /// Defaults to STARTTLS; use [`SmtpBuilder::tls`] to change it.
    pub fn new(host: &str, port: u16) -> SmtpBuilder {
        SmtpBuilder {
            host: host.to_string(),
            port,
            credentials: None,
            tls: TlsMode::StartTls,
            provider: "smtp",
        }
    }
}

/// Build a lettre Message from our Email struct.
pub(crate) fn build_message(email: &Email) -> Result<Message, MailError> {
    email.validate()?;
    let from = email.from.as_ref().ok_or(MailError::MissingField("from"))?;

    let mut builder = Message::builder()
        .from(address_to_mailbox(from)?)
        .subject(&email.subject);

    for to in &email.to {
        builder = builder.to(address_to_mailbox(to)?);
    }

    let message = match (&email.html_body, &email.text_body) {
        (Some(html), Some(text)) => {
            builder.multipart(MultiPart::alternative_plain_html(text.clone(), html.clone()))?
        }
        (Some(html), None) => builder.header(ContentType::TEXT_HTML).body(html.clone())?,
        (None, Some(text)) => builder.header(ContentType::TEXT_PLAIN).body(text.clone())?,
        (None, None) => builder
            .header(ContentType::TEXT_PLAIN)
            .body(String::new())?,
    };

    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        let message = build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::SendError(e.to_string()))?;

        // Extract message ID from SMTP response, or generate one
        let message_id = response
            .message()
            .next()
            .and_then(|m| m.lines().next())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }
}

/// TLS mode for SMTP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// No TLS (dangerous, only for localhost)
    None,
    /// Upgrade with STARTTLS when the server offers it, plain otherwise
    Opportunistic,
    /// STARTTLS required (port 587)
    StartTls,
    /// Implicit TLS - connect with TLS from start (port 465)
    Tls,
}

impl TlsMode {
    /// Map a `secure` flag onto a TLS mode.
    ///
    /// `secure` selects implicit TLS; otherwise the connection starts in
    /// plain text and upgrades if the server advertises STARTTLS.
    pub fn from_secure(secure: bool) -> Self {
        if secure {
            TlsMode::Tls
        } else {
            TlsMode::Opportunistic
        }
    }
}

/// Builder for SmtpMailer.
pub struct SmtpBuilder {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    tls: TlsMode,
    provider: &'static str,
}

impl SmtpBuilder {
    /// Set SMTP credentials.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some(Credentials::new(username.to_string(), password.to_string()));
        self
    }

    /// Set TLS mode.
    pub fn tls(mut self, mode: TlsMode) -> Self {
        self.tls = mode;
        self
    }

    /// Disable TLS (dangerous, only for localhost/testing).
    pub fn no_tls(mut self) -> Self {
        self.tls = TlsMode::None;
        self
    }

    /// Name reported by [`Mailer::provider_name`].
    pub(crate) fn provider_name(mut self, name: &'static str) -> Self {
        self.provider = name;
        self
    }

    /// Build the SmtpMailer.
    ///
    /// Fails if TLS parameters cannot be created for the host.
    pub fn build(self) -> Result<SmtpMailer, MailError> {
        let mut builder = match self.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            TlsMode::Opportunistic => {
                let params = TlsParameters::new(self.host.clone())?;
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
                    .tls(Tls::Opportunistic(params))
            }
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?,
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?,
        }
        .port(self.port);

        if let Some(creds) = self.credentials {
            builder = builder.credentials(creds);
        }

        tracing::debug!(
            host = %self.host,
            port = self.port,
            tls = ?self.tls,
            "Built SMTP transport"
        );

        Ok(SmtpMailer {
            transport: builder.build(),
            provider: self.provider,
        })
    }
}

/// Convert our Address to lettre's Mailbox.
fn address_to_mailbox(addr: &Address) -> Result<Mailbox, MailError> {
    let email: lettre::Address = addr.email.parse()?;
    Ok(Mailbox::new(None, email))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(email: &Email) -> String {
        String::from_utf8(build_message(email).unwrap().formatted()).unwrap()
    }

    #[test]
    fn test_text_and_html_become_alternative_parts() {
        let email = Email::new()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Hi")
            .body("line1\nline2");

        let raw = formatted(&email);
        assert!(raw.contains("From: sender@example.com"));
        assert!(raw.contains("To: recipient@example.com"));
        assert!(raw.contains("Subject: Hi"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_text_only_is_single_part() {
        let email = Email::new()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Plain")
            .text_body("Hello");

        let raw = formatted(&email);
        assert!(raw.contains("text/plain"));
        assert!(!raw.contains("multipart"));
    }

    #[test]
    fn test_invalid_sender_is_rejected() {
        let email = Email::new()
            .from("not-an-address")
            .to("recipient@example.com")
            .body("x");

        let err = build_message(&email).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(_)));
    }

    #[test]
    fn test_missing_recipient_is_rejected() {
        let email = Email::new().from("sender@example.com").body("x");
        let err = build_message(&email).unwrap_err();
        assert!(matches!(err, MailError::MissingField("to")));
    }

    #[test]
    fn test_tls_mode_from_secure() {
        assert_eq!(TlsMode::from_secure(true), TlsMode::Tls);
        assert_eq!(TlsMode::from_secure(false), TlsMode::Opportunistic);
    }

    #[test]
    fn test_builder_reports_provider_name() {
        let mailer = SmtpMailer::new("smtp.example.com", 2525)
            .credentials("u", "p")
            .no_tls()
            .provider_name("gmail")
            .build()
            .unwrap();
        assert_eq!(mailer.provider_name(), "gmail");
    }
}
