use clap::Subcommand;
use dialoguer::Confirm;
use rps_core::{format_amount, parse_address, parse_amount, GameClient, Result};

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Change the bid required to play
    SetBid {
        /// Amount in wei, or in ether with an "ether" suffix (e.g. "0.01ether")
        amount: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Change the commission percentage
    SetCommission {
        /// Commission in percent
        percent: u8,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Point the adapter at a new game contract
    Upgrade {
        /// Address of the new game contract
        address: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_admin_command(cmd: AdminCommands, client: &GameClient) -> Result<()> {
    if !client.is_admin().await? {
        println!("Note: the stored session is not the contract owner.");
        println!("The contract will likely reject this call.");
    }

    match cmd {
        AdminCommands::SetBid { amount, yes } => {
            let bid = parse_amount(&amount)?;
            let prompt = format!("Set the bid to {} wei ({} ETH)?", bid, format_amount(bid));
            if !confirm(&prompt, yes)? {
                return Ok(());
            }

            let tx_hash = client.set_bid(bid).await?;
            println!("Bid updated.");
            println!("  Transaction: {:#x}", tx_hash);
        }

        AdminCommands::SetCommission { percent, yes } => {
            if !confirm(&format!("Set the commission to {}%?", percent), yes)? {
                return Ok(());
            }

            let tx_hash = client.set_commission(percent).await?;
            println!("Commission updated.");
            println!("  Transaction: {:#x}", tx_hash);
        }

        AdminCommands::Upgrade { address, yes } => {
            let address = parse_address(&address)?;
            let prompt = format!(
                "Point the adapter at {:#x}? Players will use the new game.",
                address
            );
            if !confirm(&prompt, yes)? {
                return Ok(());
            }

            let tx_hash = client.upgrade(address).await?;
            println!("Game contract upgraded.");
            println!("  Transaction: {:#x}", tx_hash);
        }
    }

    Ok(())
}

fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if !confirmed {
        println!("Cancelled.");
    }
    Ok(confirmed)
}
