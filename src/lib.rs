//! # mailrelay
//!
//! Relay a single email through Gmail, SendGrid, or any SMTP server, chosen
//! per request.
//!
//! ## HTTP
//!
//! ```text
//! POST /send-email
//! {
//!   "to": "a@b.com",
//!   "subject": "Hi",
//!   "body": "line1\nline2",
//!   "config": {
//!     "EMAIL_SERVICE": "gmail",
//!     "GMAIL": { "user": "me@gmail.com", "appPassword": "abcd efgh ijkl mnop" }
//!   }
//! }
//!
//! 200 {"success": true, "message": "Email sent via Gmail"}
//! ```
//!
//! `EMAIL_SERVICE` is one of `gmail`, `sendgrid`, `smtp`; the matching
//! `GMAIL`, `SENDGRID` or `SMTP` block carries the credentials. The text body
//! is sent as-is alongside an HTML part with every newline turned into `<br>`.
//!
//! ## Library
//!
//! ```rust,ignore
//! use mailrelay::{Dispatcher, ProviderConfig, SendRequest, SmtpConfig};
//!
//! let dispatcher = Dispatcher::new();
//! let request = SendRequest::new(
//!     "a@b.com",
//!     "Hi",
//!     "line1\nline2",
//!     ProviderConfig::smtp(SmtpConfig {
//!         host: "smtp.example.com".into(),
//!         port: Some(587),
//!         secure: false,
//!         user: "u@example.com".into(),
//!         password: "p".into(),
//!     }),
//! );
//!
//! let result = dispatcher.dispatch(&request).await;
//! assert!(result.success);
//! ```
//!
//! ## Feature Flags
//!
//! - `smtp` - SMTP provider via lettre
//! - `gmail` - Gmail provider (implies `smtp`)
//! - `sendgrid` - SendGrid API provider
//! - `local` - LocalMailer and the [`testing`] stub transport
//! - `server` - axum HTTP surface and the `mailrelay` binary
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//!
//! ## Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `mailrelay_emails_total` | Counter | provider, status | Dispatched emails |
//! | `mailrelay_delivery_duration_seconds` | Histogram | provider | Delivery duration |

/// The version of the mailrelay crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod dispatch;
mod email;
mod error;
mod mailer;
mod request;

pub mod providers;

#[cfg(feature = "local")]
mod storage;

#[cfg(feature = "local")]
pub mod testing;

#[cfg(feature = "server")]
pub mod server;

pub use address::{Address, ToAddress};
pub use dispatch::{Dispatcher, MailerFactory, Outcome, ProviderFactory};
pub use email::{text_to_html, Email};
pub use error::MailError;
pub use mailer::{DeliveryResult, Mailer};
pub use request::{
    normalize_app_password, GmailConfig, Provider, ProviderConfig, ProviderKind, SendGridConfig,
    SendRequest, SendResult, SmtpConfig, UnknownService, INVALID_SERVICE_MESSAGE,
};

#[cfg(feature = "local")]
pub use storage::{MemoryStorage, StoredEmail};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Dispatcher, Email, MailError, Mailer, ProviderConfig, SendRequest, SendResult,
    };
}
