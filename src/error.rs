//! Error types for mailrelay.

use thiserror::Error;

/// Errors that can occur when building a provider or sending an email.
///
/// `Display` prefixes each variant with its category for logs. Callers of
/// `POST /send-email` see [`detail`](MailError::detail) instead.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    /// Configuration error (missing credential block, disabled feature, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing required field (e.g., from address).
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid email address format.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Error building the email message.
    #[error("Build error: {0}")]
    BuildError(String),

    /// Error sending the email.
    #[error("Send error: {0}")]
    SendError(String),

    /// Provider-specific error with details.
    #[error("Provider error ({provider}): {message}")]
    ProviderError {
        provider: &'static str,
        message: String,
        /// Optional HTTP status code
        status: Option<u16>,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl MailError {
    /// Create a provider-specific error.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: None,
        }
    }

    /// Create a provider error with HTTP status.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: Some(status),
        }
    }

    /// The underlying error text, without the category prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Configuration(message)
            | Self::InvalidAddress(message)
            | Self::BuildError(message)
            | Self::SendError(message)
            | Self::HttpError(message)
            | Self::JsonError(message) => message.clone(),
            Self::MissingField(_) => self.to_string(),
            Self::ProviderError { message, .. } => message.clone(),
        }
    }
}

#[cfg(feature = "sendgrid")]
impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for MailError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        Self::BuildError(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Self::SendError(err.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_names_the_provider() {
        let err = MailError::provider_with_status("sendgrid", "The from address does not match", 403);
        assert_eq!(
            err.to_string(),
            "Provider error (sendgrid): The from address does not match"
        );
        assert!(matches!(
            err,
            MailError::ProviderError {
                status: Some(403),
                ..
            }
        ));
    }

    #[test]
    fn send_error_keeps_transport_text() {
        let err = MailError::SendError("Connection refused".into());
        assert_eq!(err.to_string(), "Send error: Connection refused");
        assert_eq!(err.detail(), "Connection refused");
    }

    #[test]
    fn detail_drops_the_category() {
        let err = MailError::provider_with_status("sendgrid", "Mail sending is disabled", 403);
        assert_eq!(err.detail(), "Mail sending is disabled");

        let err = MailError::Configuration("invalid SMTP block".into());
        assert_eq!(err.detail(), "invalid SMTP block");

        let err = MailError::MissingField("from");
        assert_eq!(err.detail(), "Missing required field: from");
    }
}
