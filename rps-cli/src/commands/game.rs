use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use rps_core::{format_amount, GameClient, MoveOption, Player, Result};

#[derive(Subcommand)]
pub enum GameCommands {
    /// Show bid, commission and the current game contract
    Dashboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a move, paying the current bid
    Play {
        /// rock, paper or scissors
        option: MoveOption,
    },
    /// Show the latest result
    Result,
    /// Show the players and the latest result
    Leaderboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the best players
    Best {
        /// Number of players to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Print every result as it is played, until Ctrl-C
    Watch,
}

pub async fn handle_game_command(cmd: GameCommands, client: &GameClient) -> Result<()> {
    match cmd {
        GameCommands::Dashboard { json } => {
            let dashboard = client.get_dashboard().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
                return Ok(());
            }

            println!("Dashboard:");
            println!(
                "  Bid: {} wei ({} ETH)",
                dashboard.bid,
                format_amount(dashboard.bid)
            );
            println!("  Commission: {}%", dashboard.commission);
            println!("  Game contract: {:#x}", dashboard.contract_address);
            if !dashboard.is_deployed() {
                println!();
                println!("No game contract deployed yet, showing default values.");
            }
        }

        GameCommands::Play { option } => {
            if client.current_account().await?.is_none() {
                println!("Not logged in, the wallet will pick the sender.");
            }

            println!("Playing {}...", option);
            let tx_hash = client.play(option).await?;
            println!("Move submitted!");
            println!("  Transaction: {:#x}", tx_hash);

            if let Ok(result) = client.get_result().await {
                println!("  Result: {}", result);
            }
        }

        GameCommands::Result => {
            let result = client.get_result().await?;
            if result.is_empty() {
                println!("No result yet.");
            } else {
                println!("{}", result);
            }
        }

        GameCommands::Leaderboard { json } => {
            let leaderboard = client.get_leaderboard().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&leaderboard)?);
                return Ok(());
            }

            print_players(&leaderboard.players);
            println!("Latest result: {}", leaderboard.result);
        }

        GameCommands::Best { limit } => {
            let players = client.get_best_players().await?;
            let players: Vec<Player> = players.into_iter().take(limit).collect();
            print_players(&players);
        }

        GameCommands::Watch => {
            println!("Watching for results, press Ctrl-C to stop...");
            let mut subscription = client.listen_played(|event| {
                println!("{:#x}: {}", event.player, event.result);
            })?;

            let interrupted = tokio::select! {
                closed = subscription.wait() => {
                    closed?;
                    false
                }
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    true
                }
            };

            if interrupted {
                subscription.cancel().await;
                println!("Stopped.");
            } else {
                println!("Event feed closed.");
            }
        }
    }

    Ok(())
}

fn print_players(players: &[Player]) {
    if players.is_empty() {
        println!("No players yet.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Wallet", "Wins"]);

    for (rank, player) in players.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            format!("{:#x}", player.wallet),
            player.wins.to_string(),
        ]);
    }

    println!("{}", table);
}
