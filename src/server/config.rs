//! Server configuration loaded from environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HOST` | `0.0.0.0` | Listen address |
//! | `PORT` | `3000` | Listen port |
//! | `STRICT_STATUS_CODES` | `false` | Answer delivery failures with 502 instead of 200 |
//! | `LOG_FORMAT` | `pretty` | `pretty` or `json` |

use axum::http::StatusCode;
use std::env;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> Result<bool, ConfigError> {
    let value = env_or_default(key, "false");
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!("expected a boolean, got '{}'", value),
        }),
    }
}

/// HTTP status used when a provider fails to deliver.
///
/// Delivery failures default to 200 with `success: false`; existing
/// clients only inspect the body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailureStatus {
    /// 200 OK; failure is only visible in the body.
    #[default]
    Ok,
    /// 502 Bad Gateway.
    BadGateway,
}

impl FailureStatus {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FailureStatus::Ok => StatusCode::OK,
            FailureStatus::BadGateway => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration for the HTTP relay
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub failure_status: FailureStatus,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", &DEFAULT_PORT.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            })?;

        let failure_status = if env_flag("STRICT_STATUS_CODES")? {
            FailureStatus::BadGateway
        } else {
            FailureStatus::Ok
        };

        let log_format = match env_or_default("LOG_FORMAT", "pretty")
            .to_ascii_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::ParseError {
                    key: "LOG_FORMAT".to_string(),
                    details: format!("expected 'pretty' or 'json', got '{}'", other),
                })
            }
        };

        Ok(Self {
            host,
            port,
            failure_status,
            log_format,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
            failure_status: FailureStatus::default(),
            log_format: LogFormat::default(),
        }
    }
}
