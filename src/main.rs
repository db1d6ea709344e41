//! mailrelay - Entry Point
//!
//! Serves `POST /send-email` on `$PORT` (default 3000).

use mailrelay::server::{
    self,
    config::{FromEnv, ServerConfig},
    telemetry,
};
use mailrelay::Dispatcher;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_tracing(config.log_format);

    server::serve(&config, Dispatcher::new()).await?;
    Ok(())
}
