use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use expiring_shortener::{config::Config, server};

/// URL shortener with expiring links.
#[derive(Parser)]
#[command(name = "expiring-shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_file(&cli.config)?;
    config.apply_env_overrides();

    init_tracing(&config.log_format);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration error: {e:#}");
        return Err(e);
    }
    config.print_summary();

    server::run(config).await
}

/// Installs the global subscriber; `RUST_LOG` overrides the `info` default.
fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
