//! Gmail provider: SMTP relay to `smtp.gmail.com` with an app password.
//!
//! ```rust,ignore
//! use mailrelay::providers::GmailMailer;
//!
//! // App passwords are shown by Google in groups of four; spaces are dropped.
//! let mailer = GmailMailer::new("me@gmail.com", "abcd efgh ijkl mnop")?;
//! ```

use async_trait::async_trait;

use super::smtp::{SmtpMailer, TlsMode};
use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};
use crate::request::normalize_app_password;

/// Gmail SMTP host.
pub const GMAIL_HOST: &str = "smtp.gmail.com";

/// Gmail implicit-TLS submission port.
pub const GMAIL_PORT: u16 = 465;

/// Gmail email provider.
pub struct GmailMailer {
    user: String,
    inner: SmtpMailer,
}

impl GmailMailer {
    /// Create a Gmail mailer authenticated as `user`.
    ///
    /// Whitespace anywhere in `app_password` is removed before use.
    pub fn new(user: impl Into<String>, app_password: &str) -> Result<Self, MailError> {
        let user = user.into();
        let password = normalize_app_password(app_password);

        let inner = SmtpMailer::new(GMAIL_HOST, GMAIL_PORT)
            .credentials(&user, &password)
            .tls(TlsMode::Tls)
            .provider_name("gmail")
            .build()?;

        Ok(Self { user, inner })
    }

    /// The authenticated account, also used as the sender address.
    pub fn user(&self) -> &str {
        &self.user
    }
}

#[async_trait]
impl Mailer for GmailMailer {
    async fn deliver(&self, email: &Email) -> Result<DeliveryResult, MailError> {
        self.inner.deliver(email).await
    }

    fn provider_name(&self) -> &'static str {
        "gmail"
    }
}
