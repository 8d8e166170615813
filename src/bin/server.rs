//! Log server binary

use clap::{Parser, Subcommand};
use proglog::{Config, Log, LogServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "proglog-server")]
#[command(about = "In-memory append-only commit log over HTTP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the log server
    Serve {
        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,

        /// Reject request bodies larger than this many bytes
        #[arg(long)]
        max_body_bytes: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            config,
            log_level,
            max_body_bytes,
        } => {
            // File first, CLI has priority
            let mut config = Config::load(config.as_deref())?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(level) = log_level {
                config.log_level = level;
            }
            if max_body_bytes.is_some() {
                config.max_body_bytes = max_body_bytes;
            }
            config.validate()?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| config.log_level.clone().into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            let log = Arc::new(Log::new());
            LogServer::new(config, log).serve().await?;
        }
    }

    Ok(())
}
