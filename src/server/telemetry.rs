//! Tracing subscriber setup for the relay binary.

use tracing_subscriber::{prelude::*, EnvFilter};

use super::config::LogFormat;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(()) => tracing::debug!(?format, "Tracing initialized"),
        Err(_) => tracing::debug!("Tracing already initialized"),
    }
}
