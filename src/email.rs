//! Email struct with builder pattern.

use serde::{Deserialize, Serialize};

use crate::address::{Address, ToAddress};
use crate::error::MailError;

/// An email message, as handed to a [`Mailer`](crate::Mailer).
///
/// ```
/// use mailrelay::Email;
///
/// let email = Email::new()
///     .from("sender@example.com")
///     .to("recipient@example.com")
///     .subject("Hello!")
///     .body("line one\nline two");
///
/// assert_eq!(email.text_body.as_deref(), Some("line one\nline two"));
/// assert_eq!(email.html_body.as_deref(), Some("line one<br>line two"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    /// Sender address
    pub from: Option<Address>,
    /// Primary recipients
    pub to: Vec<Address>,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub text_body: Option<String>,
    /// HTML body
    pub html_body: Option<String>,
}

impl Email {
    /// Create a new empty email.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender address.
    pub fn from(mut self, addr: impl ToAddress) -> Self {
        self.from = Some(addr.to_address());
        self
    }

    /// Add a recipient.
    pub fn to(mut self, addr: impl ToAddress) -> Self {
        self.to.push(addr.to_address());
        self
    }

    /// Set the subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the plain text body.
    pub fn text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    /// Set the plain text body and derive the HTML body from it.
    ///
    /// The text is kept verbatim; the HTML rendering is [`text_to_html`].
    pub fn body(self, text: impl Into<String>) -> Self {
        let text = text.into();
        let html = text_to_html(&text);
        self.text_body(text).html_body(html)
    }

    /// Check that the email has a sender and at least one recipient.
    pub fn validate(&self) -> Result<(), MailError> {
        match &self.from {
            Some(from) if !from.email.is_empty() => {}
            _ => return Err(MailError::MissingField("from")),
        }
        if self.to.is_empty() {
            return Err(MailError::MissingField("to"));
        }
        Ok(())
    }
}

/// Render a plain-text body as HTML by turning every `\n` into `<br>`.
///
/// Nothing else is escaped or rewritten.
pub fn text_to_html(text: &str) -> String {
    text.replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let email = Email::new()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test")
            .text_body("Hello");

        assert_eq!(email.from.unwrap().email, "sender@example.com");
        assert_eq!(email.to.len(), 1);
        assert_eq!(email.to[0].email, "recipient@example.com");
        assert_eq!(email.subject, "Test");
        assert_eq!(email.text_body, Some("Hello".to_string()));
        assert_eq!(email.html_body, None);
    }

    #[test]
    fn test_body_derives_html() {
        let email = Email::new().body("a\nb\n\nc");
        assert_eq!(email.text_body.as_deref(), Some("a\nb\n\nc"));
        assert_eq!(email.html_body.as_deref(), Some("a<br>b<br><br>c"));
    }

    #[test]
    fn test_text_to_html_leaves_other_characters() {
        assert_eq!(text_to_html("<b>&\r\n"), "<b>&\r<br>");
        assert_eq!(text_to_html(""), "");
        assert_eq!(text_to_html("no newline"), "no newline");
    }

    #[test]
    fn test_validate() {
        let missing_from = Email::new().to("recipient@example.com");
        assert!(matches!(
            missing_from.validate(),
            Err(MailError::MissingField("from"))
        ));

        let empty_from = Email::new().from("").to("recipient@example.com");
        assert!(matches!(
            empty_from.validate(),
            Err(MailError::MissingField("from"))
        ));

        let missing_to = Email::new().from("sender@example.com");
        assert!(matches!(
            missing_to.validate(),
            Err(MailError::MissingField("to"))
        ));

        let valid = Email::new()
            .from("sender@example.com")
            .to("recipient@example.com");
        assert!(valid.validate().is_ok());
    }
}
