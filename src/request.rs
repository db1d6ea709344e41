//! Wire model for `POST /send-email` and its resolution into a [`Provider`].
//!
//! The request body carries the provider credentials inline:
//!
//! ```json
//! {
//!   "to": "a@b.com",
//!   "subject": "Hi",
//!   "body": "line1\nline2",
//!   "config": {
//!     "EMAIL_SERVICE": "smtp",
//!     "SMTP": { "host": "smtp.example.com", "port": 587, "secure": false, "user": "u", "password": "p" }
//!   }
//! }
//! ```
//!
//! `EMAIL_SERVICE` selects which of `GMAIL`, `SENDGRID` or `SMTP` is read; the
//! other blocks are ignored.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::MailError;

/// Message returned when `EMAIL_SERVICE` is not a recognized provider.
pub const INVALID_SERVICE_MESSAGE: &str = "Invalid EMAIL_SERVICE in config";

/// A single email to relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    /// Recipient address.
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    /// Plain-text body. The HTML part is derived from it.
    #[serde(default)]
    pub body: String,
    /// Provider selection and credentials.
    pub config: ProviderConfig,
}

impl SendRequest {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            config,
        }
    }
}

/// Provider configuration as it appears on the wire.
///
/// Credential blocks stay as raw JSON until [`resolve`](Self::resolve) reads
/// the selected one, so a malformed block that is not selected never fails a
/// request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Discriminator: `gmail`, `sendgrid` or `smtp`. Any other JSON value,
    /// including a non-string, selects nothing.
    #[serde(rename = "EMAIL_SERVICE", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Value>,
    #[serde(rename = "GMAIL", default, skip_serializing_if = "Option::is_none")]
    pub gmail: Option<Value>,
    #[serde(rename = "SENDGRID", default, skip_serializing_if = "Option::is_none")]
    pub sendgrid: Option<Value>,
    #[serde(rename = "SMTP", default, skip_serializing_if = "Option::is_none")]
    pub smtp: Option<Value>,
}

impl ProviderConfig {
    pub fn gmail(config: GmailConfig) -> Self {
        Self {
            service: Some(ProviderKind::Gmail.as_str().into()),
            gmail: serde_json::to_value(config).ok(),
            ..Self::default()
        }
    }

    pub fn sendgrid(config: SendGridConfig) -> Self {
        Self {
            service: Some(ProviderKind::SendGrid.as_str().into()),
            sendgrid: serde_json::to_value(config).ok(),
            ..Self::default()
        }
    }

    pub fn smtp(config: SmtpConfig) -> Self {
        Self {
            service: Some(ProviderKind::Smtp.as_str().into()),
            smtp: serde_json::to_value(config).ok(),
            ..Self::default()
        }
    }

    /// The selected provider, or `None` if the discriminator is missing,
    /// unknown or not a string.
    pub fn kind(&self) -> Option<ProviderKind> {
        self.service
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// The discriminator as text, for logs. Non-string values are rendered
    /// as JSON.
    pub fn service_label(&self) -> Option<String> {
        self.service.as_ref().map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Resolve the credential block for `kind`.
    ///
    /// Fails when the block for the selected provider is absent or has the
    /// wrong shape. Gmail app passwords come back with all whitespace removed.
    pub fn resolve(&self, kind: ProviderKind) -> Result<Provider, MailError> {
        match kind {
            ProviderKind::Gmail => {
                let gmail: GmailConfig = read_block(kind, "GMAIL", self.gmail.as_ref())?;
                Ok(Provider::Gmail(GmailConfig {
                    app_password: normalize_app_password(&gmail.app_password),
                    ..gmail
                }))
            }
            ProviderKind::SendGrid => {
                read_block(kind, "SENDGRID", self.sendgrid.as_ref()).map(Provider::SendGrid)
            }
            ProviderKind::Smtp => read_block(kind, "SMTP", self.smtp.as_ref()).map(Provider::Smtp),
        }
    }
}

fn read_block<T: DeserializeOwned>(
    kind: ProviderKind,
    block: &str,
    value: Option<&Value>,
) -> Result<T, MailError> {
    let value = value.ok_or_else(|| {
        MailError::Configuration(format!(
            "EMAIL_SERVICE is '{}' but no {} block was provided",
            kind.as_str(),
            block
        ))
    })?;

    T::deserialize(value)
        .map_err(|err| MailError::Configuration(format!("invalid {} block: {}", block, err)))
}

/// Strip every whitespace character from an app password.
///
/// Google displays app passwords in space-separated groups of four.
pub fn normalize_app_password(password: &str) -> String {
    password.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Gmail credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmailConfig {
    /// Account address; also the sender.
    #[serde(default)]
    pub user: String,
    #[serde(rename = "appPassword", default)]
    pub app_password: String,
}

/// SendGrid credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendGridConfig {
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Verified sender address.
    #[serde(rename = "fromEmail", default)]
    pub from_email: String,
}

/// Generic SMTP server settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    /// Defaults to 465 when `secure`, 587 otherwise. Accepts `587` or `"587"`.
    #[serde(
        default,
        deserialize_with = "deserialize_port",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<u16>,
    /// Implicit TLS from the first byte; otherwise STARTTLS when offered.
    #[serde(default)]
    pub secure: bool,
    /// Login; also the sender.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

impl SmtpConfig {
    /// The configured port, or the conventional one for `secure`.
    pub fn port_or_default(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None if self.secure => 465,
            None => 587,
        }
    }
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Option::<Port>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Port::Number(port)) => Ok(Some(port)),
        Some(Port::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid port '{}'", text))),
    }
}

impl fmt::Debug for GmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GmailConfig")
            .field("user", &self.user)
            .field("app_password", &"[redacted]")
            .finish()
    }
}

impl fmt::Debug for SendGridConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridConfig")
            .field("api_key", &"[redacted]")
            .field("from_email", &self.from_email)
            .finish()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// The three supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gmail,
    SendGrid,
    Smtp,
}

impl ProviderKind {
    /// Discriminator value used in `EMAIL_SERVICE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gmail => "gmail",
            ProviderKind::SendGrid => "sendgrid",
            ProviderKind::Smtp => "smtp",
        }
    }

    /// Human-readable name used in success messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gmail => "Gmail",
            ProviderKind::SendGrid => "SendGrid",
            ProviderKind::Smtp => "SMTP",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a string is not a provider discriminator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown email service '{0}'")]
pub struct UnknownService(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownService;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gmail" => Ok(ProviderKind::Gmail),
            "sendgrid" => Ok(ProviderKind::SendGrid),
            "smtp" => Ok(ProviderKind::Smtp),
            other => Err(UnknownService(other.to_string())),
        }
    }
}

/// A provider selection with its credentials, ready to build a mailer from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Gmail(GmailConfig),
    SendGrid(SendGridConfig),
    Smtp(SmtpConfig),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Gmail(_) => ProviderKind::Gmail,
            Provider::SendGrid(_) => ProviderKind::SendGrid,
            Provider::Smtp(_) => ProviderKind::Smtp,
        }
    }

    /// Sender address for messages sent through this provider.
    pub fn sender(&self) -> &str {
        match self {
            Provider::Gmail(c) => &c.user,
            Provider::SendGrid(c) => &c.from_email,
            Provider::Smtp(c) => &c.user,
        }
    }
}

/// Uniform response body of `POST /send-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    pub message: String,
}

impl SendResult {
    /// `Email sent via <Provider>`.
    pub fn sent(kind: ProviderKind) -> Self {
        Self {
            success: true,
            message: format!("Email sent via {}", kind),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn invalid_service() -> Self {
        Self::failed(INVALID_SERVICE_MESSAGE)
    }
}
