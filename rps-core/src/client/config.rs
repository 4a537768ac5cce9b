use crate::error::{GameError, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_CONTRACT: &str = "RPS_CONTRACT";
pub const ENV_WALLET_URL: &str = "RPS_WALLET_URL";
pub const ENV_WEBSOCKET_SERVER: &str = "RPS_WEBSOCKET_SERVER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Address of the deployed adapter contract.
    pub contract_address: Address,
    /// JSON-RPC endpoint of the wallet that holds the user's keys.
    pub wallet_url: Option<String>,
    /// Streaming endpoint used only for event subscriptions.
    pub websocket_url: Option<String>,
}

impl ClientConfig {
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            wallet_url: None,
            websocket_url: None,
        }
    }

    pub fn with_wallet_url(mut self, url: impl Into<String>) -> Self {
        self.wallet_url = Some(url.into());
        self
    }

    pub fn with_websocket_url(mut self, url: impl Into<String>) -> Self {
        self.websocket_url = Some(url.into());
        self
    }

    /// Reads the configuration from the environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_contract(None)
    }

    /// Like [`ClientConfig::from_env`], with `contract` taking precedence over `RPS_CONTRACT`.
    pub fn from_env_with_contract(contract: Option<Address>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let contract_address = match contract {
            Some(address) => address,
            None => {
                let value = non_empty_var(ENV_CONTRACT)
                    .ok_or_else(|| GameError::config(format!("{} is not set", ENV_CONTRACT)))?;
                parse_address(&value)?
            }
        };

        Ok(Self {
            contract_address,
            wallet_url: non_empty_var(ENV_WALLET_URL),
            websocket_url: non_empty_var(ENV_WEBSOCKET_SERVER),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.contract_address.is_zero() {
            return Err(GameError::config("Contract address cannot be the zero address"));
        }

        if let Some(url) = &self.wallet_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(GameError::config(format!(
                    "Wallet URL must be http(s): {}",
                    url
                )));
            }
        }

        if let Some(url) = &self.websocket_url {
            if !(url.starts_with("ws://") || url.starts_with("wss://")) {
                return Err(GameError::config(format!(
                    "Websocket server URL must be ws(s): {}",
                    url
                )));
            }
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses a hex address in any letter casing.
pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| GameError::invalid_address(format!("{}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_ignores_case() {
        let lower = parse_address("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
        let mixed = parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        assert_eq!(lower, mixed);
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn test_validate() {
        let config = ClientConfig::new(Address::repeat_byte(0x11))
            .with_wallet_url("http://127.0.0.1:1248")
            .with_websocket_url("ws://127.0.0.1:8545");
        assert!(config.validate().is_ok());

        assert!(ClientConfig::new(Address::zero()).validate().is_err());

        let config = ClientConfig::new(Address::repeat_byte(0x11)).with_websocket_url("http://x");
        assert!(config.validate().is_err());
    }
}
