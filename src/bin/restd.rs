//! gluster-block REST daemon

use clap::Parser;
use gluster_block_rest::{Config, RestServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "glusterblockrestd")]
#[command(about = "REST API daemon for gluster-block")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address for HTTP
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Path to the gluster-block binary
    #[arg(long)]
    cli_path: Option<String>,

    /// Enable TLS
    #[arg(long)]
    enable_tls: bool,

    /// TLS certificate (PEM)
    #[arg(long)]
    cert_file: Option<PathBuf>,

    /// TLS private key (PEM)
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // File and environment first, then CLI arguments on top
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if let Some(cli_path) = args.cli_path {
        config.cli_path = cli_path;
    }
    if args.enable_tls {
        config.tls.enabled = true;
    }
    if let Some(cert) = args.cert_file {
        config.tls.cert_file = Some(cert);
    }
    if let Some(key) = args.key_file {
        config.tls.key_file = Some(key);
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    RestServer::new(config).serve().await?;

    Ok(())
}
