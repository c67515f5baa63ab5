//! PS hub server - Binary Entry Point
//!
//! Reads configuration from the environment, installs logging and serves
//! until Ctrl-C.

use ps_hub::config::ServerConfig;
use ps_hub::error::Result;
use ps_hub::{server, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_logging(config.log_format);

    tracing::info!(version = ps_hub::VERSION, "starting {}", ps_hub::NAME);

    server::run(config).await
}
