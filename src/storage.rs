//! In-memory storage for captured emails.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::email::Email;

/// A captured email with metadata.
#[derive(Debug, Clone)]
pub struct StoredEmail {
    /// Unique identifier for this email.
    pub id: String,
    /// The email content.
    pub email: Email,
    /// When the email was captured.
    pub sent_at: DateTime<Utc>,
}

/// Thread-safe in-memory storage for emails, kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    emails: RwLock<Vec<StoredEmail>>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an email and return its ID.
    pub fn push(&self, email: Email) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.emails.write().push(StoredEmail {
            id: id.clone(),
            email,
            sent_at: Utc::now(),
        });
        id
    }

    /// Get an email by ID.
    pub fn get(&self, id: &str) -> Option<StoredEmail> {
        self.emails.read().iter().find(|e| e.id == id).cloned()
    }

    /// Get all stored emails, newest first.
    pub fn all(&self) -> Vec<StoredEmail> {
        self.emails.read().iter().rev().cloned().collect()
    }

    /// Get the count of stored emails.
    pub fn count(&self) -> usize {
        self.emails.read().len()
    }

    /// Clear all stored emails.
    pub fn clear(&self) {
        self.emails.write().clear();
    }

    /// Remove and return all stored emails, newest first.
    pub fn flush(&self) -> Vec<StoredEmail> {
        let mut drained = std::mem::take(&mut *self.emails.write());
        drained.reverse();
        drained
    }
}
