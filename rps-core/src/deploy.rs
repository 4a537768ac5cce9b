//! Deployment targets for the game contracts. Only deploy tooling reads this;
//! the runtime client never does.

use crate::error::{GameError, Result};
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known mnemonic of the local development node's funded accounts.
pub const LOCAL_MNEMONIC: &str = "test test test test test test test test test test test junk";
pub const LOCAL_URL: &str = "http://127.0.0.1:8545";
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

pub const ENV_NODE_URL: &str = "NODE_URL";
pub const ENV_MNEMONIC: &str = "METAMASK_SECRET";
pub const ENV_EXPLORER_API_KEY: &str = "API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub url: Option<String>,
    pub chain_id: Option<u64>,
    #[serde(skip_serializing)]
    pub mnemonic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    pub solidity: String,
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(skip_serializing)]
    pub explorer_api_key: Option<String>,
}

impl DeployConfig {
    /// Builds the configuration from the environment, honouring a `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut networks = BTreeMap::new();
        networks.insert(
            "local".to_string(),
            NetworkConfig {
                url: Some(LOCAL_URL.to_string()),
                chain_id: None,
                mnemonic: Some(LOCAL_MNEMONIC.to_string()),
            },
        );
        networks.insert(
            "sepolia".to_string(),
            NetworkConfig {
                url: var(ENV_NODE_URL),
                chain_id: Some(SEPOLIA_CHAIN_ID),
                mnemonic: var(ENV_MNEMONIC),
            },
        );

        Self {
            solidity: "0.8.20".to_string(),
            default_network: "local".to_string(),
            networks,
            explorer_api_key: var(ENV_EXPLORER_API_KEY),
        }
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(name)
            .ok_or_else(|| GameError::UnknownNetwork {
                name: name.to_string(),
            })
    }

    /// Checks that `name` can be deployed to: endpoint present and account derivable.
    pub fn validate(&self, name: &str) -> Result<()> {
        let network = self.network(name)?;

        match network.url.as_deref() {
            None => {
                return Err(GameError::config(format!(
                    "No RPC URL configured for network '{}' (set {})",
                    name, ENV_NODE_URL
                )))
            }
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                return Err(GameError::config(format!(
                    "RPC URL for network '{}' must be http(s): {}",
                    name, url
                )))
            }
            Some(_) => {}
        }

        self.signer(name)?;
        Ok(())
    }

    /// Deployer account: index 0 on the standard Ethereum derivation path.
    pub fn signer(&self, name: &str) -> Result<LocalWallet> {
        let network = self.network(name)?;
        let phrase = network.mnemonic.as_deref().ok_or_else(|| {
            GameError::config(format!(
                "No mnemonic configured for network '{}' (set {})",
                name, ENV_MNEMONIC
            ))
        })?;

        let wallet = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .index(0u32)
            .map_err(|e| GameError::config(format!("Invalid derivation index: {}", e)))?
            .build()
            .map_err(|e| GameError::config(format!("Invalid mnemonic: {}", e)))?;

        Ok(match network.chain_id {
            Some(chain_id) => wallet.with_chain_id(chain_id),
            None => wallet,
        })
    }

    pub fn deployer(&self, name: &str) -> Result<Address> {
        Ok(self.signer(name)?.address())
    }

    pub fn provider(&self, name: &str) -> Result<Provider<Http>> {
        let network = self.network(name)?;
        let url = network.url.as_deref().ok_or_else(|| {
            GameError::config(format!("No RPC URL configured for network '{}'", name))
        })?;

        Provider::<Http>::try_from(url)
            .map_err(|e| GameError::config(format!("Invalid RPC URL '{}': {}", url, e)))
    }

    /// Connects to the network and confirms it reports the configured chain id.
    pub async fn check(&self, name: &str) -> Result<u64> {
        self.validate(name)?;
        let provider = self.provider(name)?;

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| GameError::transport(e.to_string()))?
            .as_u64();

        if let Some(expected) = self.network(name)?.chain_id {
            if expected != chain_id {
                return Err(GameError::config(format!(
                    "Network '{}' reports chain id {}, expected {}",
                    name, chain_id, expected
                )));
            }
        }

        tracing::info!("Network '{}' reachable, chain id {}", name, chain_id);
        Ok(chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_local_network_defaults() {
        let config = DeployConfig::from_lookup(|_| None);
        assert_eq!(config.default_network, "local");
        assert_eq!(config.solidity, "0.8.20");
        assert!(config.explorer_api_key.is_none());
        assert!(config.validate("local").is_ok());

        assert_eq!(
            config.deployer("local").unwrap(),
            Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap()
        );
    }

    #[test]
    fn test_public_network_needs_environment() {
        let config = DeployConfig::from_lookup(|_| None);
        assert!(config.network("sepolia").is_ok());
        assert!(matches!(config.validate("sepolia"), Err(GameError::Config(_))));
        assert!(matches!(
            config.network("mainnet"),
            Err(GameError::UnknownNetwork { .. })
        ));

        let config = DeployConfig::from_lookup(|name| match name {
            ENV_NODE_URL => Some("https://sepolia.example.org/rpc".to_string()),
            ENV_MNEMONIC => Some(LOCAL_MNEMONIC.to_string()),
            ENV_EXPLORER_API_KEY => Some("KEY".to_string()),
            _ => None,
        });
        assert!(config.validate("sepolia").is_ok());
        assert_eq!(config.signer("sepolia").unwrap().chain_id(), SEPOLIA_CHAIN_ID);
        assert_eq!(config.explorer_api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let config = DeployConfig::from_lookup(|name| match name {
            ENV_EXPLORER_API_KEY => Some("KEY".to_string()),
            _ => None,
        });
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("junk"));
        assert!(!json.contains("KEY"));
        assert!(json.contains("sepolia"));
    }
}
