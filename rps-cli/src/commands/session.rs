use crate::config::CliConfig;
use clap::Subcommand;
use rps_core::Result;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Request accounts from the wallet and remember the first one
    Login,
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Only `login` talks to the wallet and contract; the rest is local state.
pub async fn handle_session_command(cmd: SessionCommands, config: &CliConfig) -> Result<()> {
    let sessions = config.sessions().await?;

    match cmd {
        SessionCommands::Login => {
            let client = config.client(sessions)?;
            println!("Requesting accounts from the wallet...");
            let session = client.login().await?;

            println!("Logged in successfully!");
            println!("  Account: {:#x}", session.account);
            if session.is_admin {
                println!("  Role: admin (contract owner)");
            } else {
                println!("  Role: player");
            }
        }

        SessionCommands::Logout => {
            sessions.logout().await?;
            println!("Logged out.");
        }

        SessionCommands::Show { json } => {
            let session = sessions.session().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&session)?);
                return Ok(());
            }

            match session {
                Some(session) => {
                    println!("Session:");
                    println!("  Account: {:#x}", session.account);
                    println!("  Admin: {}", session.is_admin);
                }
                None => {
                    println!("Not logged in.");
                    println!("Log in with: rps session login");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_core::storage::SessionStore;
    use rps_core::Storage;

    fn offline_config(dir: &tempfile::TempDir) -> CliConfig {
        CliConfig {
            data_dir: dir.path().join("data"),
            contract: None,
            wallet_url: None,
            websocket_url: None,
        }
    }

    #[tokio::test]
    async fn test_logout_and_show_need_no_contract() {
        let dir = tempfile::tempdir().unwrap();
        let config = offline_config(&dir);
        {
            let storage = Storage::new(&config.db_path()).await.unwrap();
            SessionStore::new(&storage)
                .save_session("0x0A0a0a0A0a0a0a0A0A0a0a0a0a0A0A0a0A0A0a0A", true)
                .await
                .unwrap();
        }

        handle_session_command(SessionCommands::Show { json: true }, &config)
            .await
            .unwrap();
        handle_session_command(SessionCommands::Logout, &config)
            .await
            .unwrap();

        let sessions = config.sessions().await.unwrap();
        assert!(sessions.session().await.unwrap().is_none());
        assert!(!sessions.is_admin().await.unwrap());
    }
}
