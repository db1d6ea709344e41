//! Request dispatch: pick a provider, build its mailer, send, normalize.
//!
//! [`Dispatcher::dispatch`] never fails. Every problem ends up in the
//! returned [`SendResult`]; [`Dispatcher::send`] returns the richer
//! [`Outcome`] so the HTTP layer can tell a bad discriminator (400) from a
//! delivery failure.

use std::sync::Arc;

use tracing::Instrument;

#[cfg(feature = "metrics")]
use std::time::Instant;

use crate::address::Address;
use crate::email::Email;
use crate::error::MailError;
use crate::mailer::{DeliveryResult, Mailer};
use crate::request::{Provider, ProviderKind, SendRequest, SendResult};

/// Builds the mailer for a resolved provider.
///
/// This is the seam between dispatch and the transports: production uses
/// [`ProviderFactory`], tests substitute a stub.
pub trait MailerFactory: Send + Sync {
    fn create(&self, provider: &Provider) -> Result<Arc<dyn Mailer>, MailError>;
}

/// Builds real Gmail, SendGrid and SMTP mailers, fresh for every request.
#[derive(Debug, Clone, Default)]
pub struct ProviderFactory {
    #[cfg_attr(not(feature = "sendgrid"), allow(dead_code))]
    sendgrid_base_url: Option<String>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point SendGrid mailers at a different API root (for testing).
    pub fn sendgrid_base_url(mut self, url: impl Into<String>) -> Self {
        self.sendgrid_base_url = Some(url.into());
        self
    }
}

#[cfg(not(all(feature = "gmail", feature = "sendgrid", feature = "smtp")))]
fn feature_disabled(feature: &str) -> MailError {
    MailError::Configuration(format!(
        "EMAIL_SERVICE={feature} but the '{feature}' feature is not enabled"
    ))
}

impl MailerFactory for ProviderFactory {
    fn create(&self, provider: &Provider) -> Result<Arc<dyn Mailer>, MailError> {
        match provider {
            #[cfg(feature = "gmail")]
            Provider::Gmail(config) => Ok(Arc::new(crate::providers::GmailMailer::new(
                config.user.clone(),
                &config.app_password,
            )?)),
            #[cfg(not(feature = "gmail"))]
            Provider::Gmail(_) => Err(feature_disabled("gmail")),

            #[cfg(feature = "sendgrid")]
            Provider::SendGrid(config) => {
                let mut mailer = crate::providers::SendGridMailer::new(config.api_key.clone());
                if let Some(url) = &self.sendgrid_base_url {
                    mailer = mailer.base_url(url.clone());
                }
                Ok(Arc::new(mailer))
            }
            #[cfg(not(feature = "sendgrid"))]
            Provider::SendGrid(_) => Err(feature_disabled("sendgrid")),

            #[cfg(feature = "smtp")]
            Provider::Smtp(config) => {
                use crate::providers::{SmtpMailer, TlsMode};

                let mut builder = SmtpMailer::new(&config.host, config.port_or_default())
                    .tls(TlsMode::from_secure(config.secure));
                if !config.user.is_empty() {
                    builder = builder.credentials(&config.user, &config.password);
                }
                Ok(Arc::new(builder.build()?))
            }
            #[cfg(not(feature = "smtp"))]
            Provider::Smtp(_) => Err(feature_disabled("smtp")),
        }
    }
}

/// What happened to a request.
#[derive(Debug)]
pub enum Outcome {
    /// The provider accepted the message.
    Delivered {
        provider: ProviderKind,
        delivery: DeliveryResult,
    },
    /// `EMAIL_SERVICE` was missing or not a known provider. Nothing was sent.
    InvalidService { service: Option<String> },
    /// Building the mailer, validating the message, or sending failed.
    Failed {
        provider: ProviderKind,
        error: MailError,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }

    /// True when the request itself was malformed rather than undeliverable.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Outcome::InvalidService { .. })
    }

    pub fn to_result(&self) -> SendResult {
        match self {
            Outcome::Delivered { provider, .. } => SendResult::sent(*provider),
            Outcome::InvalidService { .. } => SendResult::invalid_service(),
            Outcome::Failed { error, .. } => SendResult::failed(error.detail()),
        }
    }
}

impl From<Outcome> for SendResult {
    fn from(outcome: Outcome) -> Self {
        outcome.to_result()
    }
}

/// Routes each [`SendRequest`] to the provider its config selects.
///
/// Holds no per-request state and can be shared behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    factory: Arc<dyn MailerFactory>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher backed by the real providers.
    pub fn new() -> Self {
        Self::with_factory(ProviderFactory::new())
    }

    pub fn with_factory(factory: impl MailerFactory + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Send `request` and return the uniform `{success, message}` result.
    pub async fn dispatch(&self, request: &SendRequest) -> SendResult {
        self.send(request).await.into()
    }

    /// Send `request` and classify what happened.
    pub async fn send(&self, request: &SendRequest) -> Outcome {
        let span = tracing::info_span!(
            "mailrelay.dispatch",
            service = %request.config.service_label().unwrap_or_default(),
            to = %request.to,
            subject = %request.subject,
            body_len = request.body.len(),
        );

        self.send_inner(request).instrument(span).await
    }

    async fn send_inner(&self, request: &SendRequest) -> Outcome {
        tracing::info!("Email request received");

        let Some(kind) = request.config.kind() else {
            tracing::warn!("Rejecting request: unrecognized EMAIL_SERVICE");
            return Outcome::InvalidService {
                service: request.config.service_label(),
            };
        };

        #[cfg(feature = "metrics")]
        let start = Instant::now();

        let result = self.deliver(kind, request).await;

        #[cfg(feature = "metrics")]
        {
            let duration = start.elapsed().as_secs_f64();
            let status = if result.is_ok() { "success" } else { "error" };
            metrics::counter!("mailrelay_emails_total", "provider" => kind.as_str(), "status" => status)
                .increment(1);
            metrics::histogram!("mailrelay_delivery_duration_seconds", "provider" => kind.as_str())
                .record(duration);
        }

        match result {
            Ok(delivery) => {
                tracing::info!(
                    provider = kind.as_str(),
                    message_id = %delivery.message_id,
                    "Email delivered"
                );
                Outcome::Delivered {
                    provider: kind,
                    delivery,
                }
            }
            Err(error) => {
                tracing::error!(provider = kind.as_str(), error = %error, "Email delivery failed");
                Outcome::Failed {
                    provider: kind,
                    error,
                }
            }
        }
    }

    async fn deliver(
        &self,
        kind: ProviderKind,
        request: &SendRequest,
    ) -> Result<DeliveryResult, MailError> {
        let provider = request.config.resolve(kind)?;
        let recipient = Address::parse(&request.to)?;

        let email = Email::new()
            .from(provider.sender())
            .to(recipient)
            .subject(&request.subject)
            .body(&request.body);
        email.validate()?;

        let mailer = self.factory.create(&provider)?;
        tracing::debug!(mailer = mailer.provider_name(), sender = provider.sender(), "Delivering email");

        mailer.deliver(&email).await
    }
}
