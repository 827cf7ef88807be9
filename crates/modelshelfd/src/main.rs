//! modelshelf daemon - upload, browse and remove 3D models over HTTP.

use anyhow::Result;
use clap::Parser;
use modelshelfd::config::{Config, Overrides};
use modelshelfd::server;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "modelshelfd")]
#[command(about = "Model shelf - upload and view 3D models", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: /etc/modelshelf/config.toml)
    #[arg(short, long, env = "MODELSHELF_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, env = "MODELSHELF_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MODELSHELF_PORT")]
    port: Option<u16>,

    /// Directory holding uploaded models
    #[arg(long, env = "MODELSHELF_MODELS_DIR")]
    models_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("modelshelfd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load(),
    }
    .with_overrides(Overrides {
        bind: cli.bind,
        port: cli.port,
        models_dir: cli.models_dir,
    });

    info!(
        "Models in {}, thumbnails in {}",
        config.storage.models_dir.display(),
        config.storage.thumbs_dir.display()
    );

    server::run(&config).await
}
