use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use rps_core::{DeployConfig, Result};

#[derive(Subcommand)]
pub enum DeployCommands {
    /// List the configured deployment networks
    Networks,
    /// Check that a network is reachable and show the deployer account
    Check {
        /// Network name (defaults to the default network)
        network: Option<String>,
    },
}

pub async fn handle_deploy_command(cmd: DeployCommands, config: &DeployConfig) -> Result<()> {
    match cmd {
        DeployCommands::Networks => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Network", "RPC URL", "Chain ID", "Mnemonic"]);

            for (name, network) in &config.networks {
                let label = if *name == config.default_network {
                    format!("{} (default)", name)
                } else {
                    name.clone()
                };

                table.add_row(vec![
                    label,
                    network.url.clone().unwrap_or_else(|| "-".to_string()),
                    network
                        .chain_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    if network.mnemonic.is_some() { "set" } else { "missing" }.to_string(),
                ]);
            }

            println!("{}", table);
            println!("Solidity: {}", config.solidity);
            println!(
                "Explorer API key: {}",
                if config.explorer_api_key.is_some() { "set" } else { "missing" }
            );
        }

        DeployCommands::Check { network } => {
            let name = network.unwrap_or_else(|| config.default_network.clone());

            println!("Checking network '{}'...", name);
            let deployer = config.deployer(&name)?;
            let chain_id = config.check(&name).await?;

            println!("Network is ready.");
            println!("  Chain ID: {}", chain_id);
            println!("  Deployer: {:#x}", deployer);
        }
    }

    Ok(())
}
