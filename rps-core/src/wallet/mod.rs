pub mod session;

pub use session::SessionManager;

use crate::error::{GameError, Result};
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, RpcError};
use ethers::types::Address;
use std::sync::Arc;

/// EIP-1193: the user rejected the request.
const USER_REJECTED: i64 = 4001;
/// JSON-RPC: method not found.
const METHOD_NOT_FOUND: i64 = -32601;

/// Agent holding the user's keys, able to hand out account identities.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>>;
}

/// Wallet reached over JSON-RPC, e.g. a desktop wallet or a dev node with unlocked accounts.
pub struct RpcWallet<M> {
    provider: Arc<M>,
}

impl<M: Middleware> RpcWallet<M> {
    pub fn new(provider: Arc<M>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Arc<M> {
        self.provider.clone()
    }
}

impl RpcWallet<Provider<Http>> {
    pub fn connect(url: &str) -> Result<Self> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| GameError::config(format!("Invalid wallet URL '{}': {}", url, e)))?;
        Ok(Self::new(Arc::new(provider)))
    }
}

#[async_trait]
impl<M: Middleware + 'static> WalletProvider for RpcWallet<M> {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let err = match self
            .provider
            .provider()
            .request::<_, Vec<Address>>("eth_requestAccounts", ())
            .await
        {
            Ok(accounts) => return Ok(accounts),
            Err(err) => err,
        };

        match err.as_error_response().map(|rpc| rpc.code) {
            Some(USER_REJECTED) => Err(GameError::NoAccountsAuthorized),
            Some(METHOD_NOT_FOUND) => {
                tracing::debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.provider
                    .get_accounts()
                    .await
                    .map_err(|e| GameError::transport(e.to_string()))
            }
            _ => Err(GameError::transport(err.to_string())),
        }
    }
}
