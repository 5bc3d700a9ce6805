//! TelDrive command-line client entry point.

mod app;
mod cli;

use clap::Parser;
use teldrive_driver::{DriverConfig, TelDrive, default_config_path};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let path = cli.config.unwrap_or_else(default_config_path);
    let config = DriverConfig::load(&path)
        .map_err(|e| anyhow::anyhow!("loading {}: {e}", path.display()))?;
    tracing::debug!(api_host = %config.api_host, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut drive = TelDrive::new(&config)?;
        drive.init().await?;
        app::run(&drive, cli.command).await
    })
}
