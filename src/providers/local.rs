//! Local mailer for development and testing.
//!
//! Captures emails in memory instead of delivering them, and can be told to
//! fail so error paths can be exercised without a network.
//!
//! ```rust,ignore
//! use mailrelay::providers::LocalMailer;
//!
//! let mailer = LocalMailer::new();
//! mailer.deliver(&email).await?;
//!
//! assert!(mailer.sent_to("user@example.com"));
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};
use crate::storage::{MemoryStorage, StoredEmail};

/// Local mailer that stores emails in memory.
///
/// Clones share storage and failure state.
#[derive(Clone, Default)]
pub struct LocalMailer {
    storage: Arc<MemoryStorage>,
    /// If set, deliver() will return this error.
    fail_with: Arc<RwLock<Option<String>>>,
}

impl LocalMailer {
    /// Create a new local mailer with fresh storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the underlying storage.
    pub fn storage(&self) -> Arc<MemoryStorage> {
        Arc::clone(&self.storage)
    }

    // =========================================================================
    // Failure Simulation
    // =========================================================================

    /// Make every subsequent delivery fail with a `SendError` carrying `message`.
    pub fn set_failure(&self, message: impl Into<String>) {
        *self.fail_with.write() = Some(message.into());
    }

    /// Clear the failure state.
    pub fn clear_failure(&self) {
        *self.fail_with.write() = None;
    }

    // =========================================================================
    // Email Access
    // =========================================================================

    /// Get all captured emails (newest first).
    pub fn emails(&self) -> Vec<StoredEmail> {
        self.storage.all()
    }

    /// Get the most recently sent email.
    pub fn last_email(&self) -> Option<StoredEmail> {
        self.storage.all().into_iter().next()
    }

    /// Get the count of sent emails.
    pub fn email_count(&self) -> usize {
        self.storage.count()
    }

    /// Check if any email was sent.
    pub fn has_emails(&self) -> bool {
        self.storage.count() > 0
    }

    /// Remove and return all captured emails.
    pub fn flush(&self) -> Vec<StoredEmail> {
        self.storage.flush()
    }

    /// Check if an email was sent to a specific address.
    pub fn sent_to(&self, email: &str) -> bool {
        self.storage.all().iter().any(|stored| {
            stored
                .email
                .to
                .iter()
                .any(|addr| addr.email.eq_ignore_ascii_case(email))
        })
    }
}

#[async_trait]
impl Mailer for LocalMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        if let Some(ref message) = *self.fail_with.read() {
            return Err(MailError::SendError(message.clone()));
        }

        let message_id = self.storage.push(email.clone());
        Ok(DeliveryResult::new(message_id))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_mailer() {
        let mailer = LocalMailer::new();

        let email = Email::new()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test Email")
            .body("Hello!");

        let result = mailer.deliver(&email).await.unwrap();
        assert!(!result.message_id.is_empty());

        let stored = mailer.storage().get(&result.message_id).unwrap();
        assert_eq!(stored.email.subject, "Test Email");
        assert!(mailer.sent_to("RECIPIENT@example.com"));
    }

    #[tokio::test]
    async fn test_can_fail() {
        let mailer = LocalMailer::new();
        mailer.set_failure("Simulated failure");

        let email = Email::new().subject("Test");
        let err = mailer.deliver(&email).await.unwrap_err();
        assert_eq!(err.to_string(), "Send error: Simulated failure");
        assert!(!mailer.has_emails());

        mailer.clear_failure();
        assert!(mailer.deliver(&email).await.is_ok());
        assert_eq!(mailer.email_count(), 1);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let mailer = LocalMailer::new();
        let cloned = mailer.clone();

        cloned.deliver(&Email::new().subject("One")).await.unwrap();
        assert_eq!(mailer.email_count(), 1);

        mailer.set_failure("down");
        assert!(cloned.deliver(&Email::new()).await.is_err());

        assert_eq!(mailer.flush().len(), 1);
        assert!(cloned.last_email().is_none());
    }
}
