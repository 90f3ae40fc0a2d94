use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web3_compat::Connection;

mod commands;
mod config;
mod error;

use config::CliConfig;
use error::CliResult;

#[derive(Parser)]
#[command(name = "web3-compat")]
#[command(about = "Legacy-style Solana client commands over web3-compat")]
#[command(version)]
struct Cli {
    /// YAML config file with rpc_url, commitment and keypair_path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Solana RPC URL
    #[arg(short = 'u', long, global = true, env = "WEB3_COMPAT_RPC_URL")]
    rpc_url: Option<String>,

    /// Commitment level (processed, confirmed, finalized or a legacy alias)
    #[arg(long, global = true)]
    commitment: Option<String>,

    /// Fee payer keypair file
    #[arg(short, long, global = true)]
    keypair: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show an account balance
    Balance {
        /// Address to query, defaults to the keypair's address
        address: Option<String>,
    },

    /// Request lamports from the cluster faucet and wait until they land
    Airdrop {
        /// Amount in lamports
        lamports: u64,

        /// Recipient, defaults to the keypair's address
        #[arg(long)]
        to: Option<String>,
    },

    /// Transfer lamports from the keypair to a recipient
    Transfer {
        /// Recipient address
        to: String,

        /// Amount in lamports
        lamports: u64,

        /// Build a compiled v0 transaction instead of a legacy one
        #[arg(long)]
        v0: bool,
    },

    /// Show signature statuses
    Status {
        /// Transaction signatures
        #[arg(required = true)]
        signatures: Vec<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let config = file_config.merge(CliConfig {
        rpc_url: cli.rpc_url,
        commitment: cli.commitment,
        keypair_path: cli.keypair,
    });
    let connection = Connection::new(config.rpc_url(), config.connection_config());

    match cli.command {
        Commands::Balance { address } => {
            commands::balance::execute(&connection, &config, address).await
        }

        Commands::Airdrop { lamports, to } => {
            commands::airdrop::execute(&connection, &config, lamports, to).await
        }

        Commands::Transfer { to, lamports, v0 } => {
            commands::transfer::execute(&connection, &config, to, lamports, v0).await
        }

        Commands::Status { signatures } => {
            commands::status::execute(&connection, signatures).await
        }
    }
}
