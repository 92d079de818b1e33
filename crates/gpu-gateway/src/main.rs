//! `gpu-service` binary: load configuration from the environment and serve.

use anyhow::{Context, Result};
use gpu_gateway::{init_logging, GpuService, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    info!(version = gpu_gateway::VERSION, "GPU compute service initializing");

    let service = GpuService::new(config)?;
    service.start().await?;

    Ok(())
}
