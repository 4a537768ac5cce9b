mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use rps_core::{
    client::config::{ENV_CONTRACT, ENV_WALLET_URL, ENV_WEBSOCKET_SERVER},
    DeployConfig, GameError,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rps")]
#[command(about = "Rock-paper-scissors on chain: play, follow results, administer the game")]
#[command(version)]
struct Cli {
    /// Data directory for the session database
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Adapter contract address (overrides RPS_CONTRACT)
    #[arg(long, global = true)]
    contract: Option<String>,

    /// Wallet JSON-RPC endpoint (overrides RPS_WALLET_URL)
    #[arg(long, global = true)]
    wallet_url: Option<String>,

    /// Websocket endpoint for events (overrides RPS_WEBSOCKET_SERVER)
    #[arg(long, global = true)]
    ws_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and out with the wallet
    #[command(subcommand)]
    Session(commands::SessionCommands),

    /// Read the game and play moves
    #[command(subcommand)]
    Game(commands::GameCommands),

    /// Owner-only administration
    #[command(subcommand)]
    Admin(commands::AdminCommands),

    /// Deployment targets
    #[command(subcommand)]
    Deploy(commands::DeployCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "rps={},rps_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = CliConfig::default();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.contract = cli.contract;
    config.wallet_url = cli.wallet_url;
    config.websocket_url = cli.ws_url;

    // Execute command
    let result = run(cli.command, &config).await;

    if let Err(e) = result {
        match e {
            GameError::ProviderMissing => {
                eprintln!("Error: No wallet provider found");
                eprintln!(
                    "Set {} or pass --wallet-url to point at your wallet",
                    ENV_WALLET_URL
                );
            }
            GameError::NoAccountsAuthorized => {
                eprintln!("Error: The wallet has no accounts or refused access");
            }
            GameError::Config(msg) if msg.contains(ENV_CONTRACT) => {
                eprintln!("Error: {}", msg);
                eprintln!("Set {} or pass --contract <address>", ENV_CONTRACT);
            }
            GameError::Config(msg) if msg.contains("Websocket") => {
                eprintln!("Error: {}", msg);
                eprintln!("Set {} or pass --ws-url", ENV_WEBSOCKET_SERVER);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &CliConfig) -> rps_core::Result<()> {
    match command {
        Commands::Session(cmd) => commands::handle_session_command(cmd, config).await,
        Commands::Game(cmd) => commands::handle_game_command(cmd, &config.connect().await?).await,
        Commands::Admin(cmd) => {
            commands::handle_admin_command(cmd, &config.connect().await?).await
        }
        Commands::Deploy(cmd) => {
            commands::handle_deploy_command(cmd, &DeployConfig::from_env()).await
        }
    }
}
