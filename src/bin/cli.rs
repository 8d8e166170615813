//! CLI for producing to and consuming from a log server

use clap::{Parser, Subcommand};
use proglog::LogClient;

#[derive(Parser)]
#[command(name = "proglog")]
#[command(about = "proglog commit log CLI")]
#[command(version)]
struct Cli {
    /// Server URL
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a record
    Produce {
        /// Record payload
        value: String,
    },

    /// Read the record at an offset
    Consume {
        /// Offset
        offset: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = LogClient::new(&cli.server);

    match cli.command {
        Commands::Produce { value } => {
            let offset = client.produce(value).await?;
            println!("offset: {}", offset);
        }

        Commands::Consume { offset } => {
            let record = client.consume(offset).await?;
            println!("offset: {}", record.offset);
            println!("value: {}", String::from_utf8_lossy(&record.value));
        }
    }

    Ok(())
}
