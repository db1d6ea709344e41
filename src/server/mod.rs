//! HTTP surface: `POST /send-email`.
//!
//! ```rust,ignore
//! use mailrelay::server::{self, config::{FromEnv, ServerConfig}};
//! use mailrelay::Dispatcher;
//!
//! let config = ServerConfig::from_env()?;
//! server::serve(&config, Dispatcher::new()).await?;
//! ```
//!
//! Status codes:
//!
//! | Case | Status |
//! |------|--------|
//! | Sent | 200 |
//! | Unknown `EMAIL_SERVICE` | 400 |
//! | Body is not a valid request | 400 |
//! | Provider failed | 200, or 502 with [`FailureStatus::BadGateway`] |

pub mod config;
pub mod telemetry;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::dispatch::{Dispatcher, Outcome};
use crate::request::{SendRequest, SendResult};

use self::config::{FailureStatus, ServerConfig};

/// Shared state for routes.
#[derive(Clone)]
struct AppState {
    dispatcher: Arc<Dispatcher>,
    failure_status: FailureStatus,
}

/// Create the relay router.
pub fn router(dispatcher: Dispatcher, failure_status: FailureStatus) -> Router {
    let state = AppState {
        dispatcher: Arc::new(dispatcher),
        failure_status,
    };

    Router::new()
        .route("/send-email", post(send_email))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// POST /send-email - Relay one email through the configured provider.
async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> (StatusCode, Json<SendResult>) {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejecting malformed send request");
            return (
                StatusCode::BAD_REQUEST,
                Json(SendResult::failed(rejection.body_text())),
            );
        }
    };

    let outcome = state.dispatcher.send(&request).await;
    let status = status_for(&outcome, state.failure_status);
    (status, Json(outcome.into()))
}

/// Map a dispatch outcome to the response status.
pub fn status_for(outcome: &Outcome, failure_status: FailureStatus) -> StatusCode {
    match outcome {
        Outcome::Delivered { .. } => StatusCode::OK,
        Outcome::InvalidService { .. } => StatusCode::BAD_REQUEST,
        Outcome::Failed { .. } => failure_status.status_code(),
    }
}

/// Bind to the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServerConfig, dispatcher: Dispatcher) -> std::io::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let port = listener.local_addr()?.port();
    tracing::info!(address = %config.address(), "Server running on port {}", port);

    axum::serve(listener, router(dispatcher, config.failure_status))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
