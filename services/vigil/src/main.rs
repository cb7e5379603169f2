//! Vigil CLI
//!
//! Command-line interface for the endpoint health monitoring service.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use vigil::load_config;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Endpoint health monitoring and alerting service")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Status endpoint bind address (overrides config file)
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Status endpoint port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!("Loading configuration from {:?}", args.config);
    let mut config = load_config(&args.config)?;
    config.validate()?;

    if let Some(bind) = args.bind {
        config.dashboard.bind = bind;
    }
    if let Some(port) = args.port {
        config.dashboard.port = port;
    }

    tracing::info!("Starting vigil service");
    tracing::debug!(
        "Checks: {}, notifier: {}, policy: {:?}",
        config.checks.len(),
        config.notifier.type_name(),
        config.alerting.policy
    );

    vigil::run(config).await?;

    Ok(())
}
