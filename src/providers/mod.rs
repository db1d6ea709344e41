//! Email provider implementations.
//!
//! Each provider implements the [`Mailer`](crate::Mailer) trait.
//!
//! | Provider | Feature Flag | Description |
//! |----------|-------------|-------------|
//! | [`GmailMailer`] | `gmail` | Gmail SMTP relay with app password |
//! | [`SendGridMailer`] | `sendgrid` | SendGrid v3 API |
//! | [`SmtpMailer`] | `smtp` | Any SMTP server via lettre |
//! | [`LocalMailer`] | `local` | In-memory capture for dev/testing |

#[cfg(feature = "smtp")]
mod smtp;
#[cfg(feature = "smtp")]
pub use smtp::{SmtpBuilder, SmtpMailer, TlsMode};

#[cfg(feature = "gmail")]
mod gmail;
#[cfg(feature = "gmail")]
pub use gmail::{GmailMailer, GMAIL_HOST, GMAIL_PORT};

#[cfg(feature = "sendgrid")]
mod sendgrid;
#[cfg(feature = "sendgrid")]
pub use sendgrid::SendGridMailer;

#[cfg(feature = "local")]
mod local;
#[cfg(feature = "local")]
pub use local::LocalMailer;
