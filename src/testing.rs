//! Stub transport for exercising the dispatcher without a network.
//!
//! [`CapturingFactory`] records every provider the dispatcher resolves and
//! hands back a shared [`LocalMailer`], so tests can assert on both the
//! credentials that reached the transport and the message that was sent.
//!
//! ```rust,ignore
//! use mailrelay::testing::CapturingFactory;
//! use mailrelay::Dispatcher;
//!
//! let factory = CapturingFactory::new();
//! let dispatcher = Dispatcher::with_factory(factory.clone());
//!
//! dispatcher.dispatch(&request).await;
//!
//! assert_eq!(factory.providers().len(), 1);
//! assert!(factory.mailer().sent_to("a@b.com"));
//! ```

use parking_lot::RwLock;
use std::sync::Arc;

use crate::dispatch::MailerFactory;
use crate::error::MailError;
use crate::mailer::Mailer;
use crate::providers::LocalMailer;
use crate::request::Provider;

/// A [`MailerFactory`] that captures instead of delivering.
///
/// Clones share captured state.
#[derive(Clone, Default)]
pub struct CapturingFactory {
    mailer: LocalMailer,
    providers: Arc<RwLock<Vec<Provider>>>,
    build_failure: Arc<RwLock<Option<String>>>,
}

impl CapturingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mailer every `create` call returns.
    pub fn mailer(&self) -> &LocalMailer {
        &self.mailer
    }

    /// Providers passed to `create`, oldest first.
    pub fn providers(&self) -> Vec<Provider> {
        self.providers.read().clone()
    }

    /// The most recent provider passed to `create`.
    pub fn last_provider(&self) -> Option<Provider> {
        self.providers.read().last().cloned()
    }

    /// Make `create` fail with a configuration error carrying `message`.
    pub fn fail_build(&self, message: impl Into<String>) {
        *self.build_failure.write() = Some(message.into());
    }

    /// Make the returned mailer fail every send with `message`.
    pub fn fail_send(&self, message: impl Into<String>) {
        self.mailer.set_failure(message);
    }
}

impl MailerFactory for CapturingFactory {
    fn create(&self, provider: &Provider) -> Result<Arc<dyn Mailer>, MailError> {
        self.providers.write().push(provider.clone());

        if let Some(ref message) = *self.build_failure.read() {
            return Err(MailError::Configuration(message.clone()));
        }

        Ok(Arc::new(self.mailer.clone()))
    }
}
