use rps_core::{parse_address, ClientConfig, GameClient, Result, SessionManager, Storage};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub contract: Option<String>,
    pub wallet_url: Option<String>,
    pub websocket_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rps"),
            contract: None,
            wallet_url: None,
            websocket_url: None,
        }
    }
}

impl CliConfig {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("rps.db")
    }

    /// Environment first, command-line flags on top.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let contract = self.contract.as_deref().map(parse_address).transpose()?;
        let mut config = ClientConfig::from_env_with_contract(contract)?;

        if let Some(url) = &self.wallet_url {
            config.wallet_url = Some(url.clone());
        }
        if let Some(url) = &self.websocket_url {
            config.websocket_url = Some(url.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Session store alone; needs no contract or endpoints.
    pub async fn sessions(&self) -> Result<SessionManager> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let db_path = self.db_path();
        tracing::debug!("Using session database at {}", db_path.display());

        let storage = Arc::new(Storage::new(&db_path).await?);
        Ok(SessionManager::new(storage))
    }

    pub fn client(&self, sessions: SessionManager) -> Result<GameClient> {
        GameClient::connect(&self.client_config()?, sessions)
    }

    pub async fn connect(&self) -> Result<GameClient> {
        let sessions = self.sessions().await?;
        self.client(sessions)
    }
}
