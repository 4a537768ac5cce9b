//! One call per user action against the game adapter.
//!
//! Every operation binds a fresh contract handle whose default sender is the
//! persisted account, so a login or logout takes effect on the next call.

pub mod config;

pub use config::{parse_address, ClientConfig};

use crate::contract::{
    Binder, ContractBinding, EventSource, EventSubscription, GameContract, WsEventSource,
};
use crate::error::{GameError, Result};
use crate::types::{Dashboard, Leaderboard, MoveOption, PlayedEvent, Player, Session};
use crate::wallet::{RpcWallet, SessionManager, WalletProvider};

use ethers::types::{Address, H256, U256};
use std::sync::Arc;

pub struct GameClient {
    sessions: SessionManager,
    wallet: Option<Arc<dyn WalletProvider>>,
    binder: Option<Arc<dyn Binder>>,
    events: Option<Arc<dyn EventSource>>,
}

impl GameClient {
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            sessions,
            wallet: None,
            binder: None,
            events: None,
        }
    }

    /// Wires the wallet endpoint and the websocket feed named in `config`.
    /// Missing endpoints only fail the operations that need them.
    pub fn connect(config: &ClientConfig, sessions: SessionManager) -> Result<Self> {
        config.validate()?;
        let mut client = Self::new(sessions);

        if let Some(url) = &config.wallet_url {
            let wallet = RpcWallet::connect(url)?;
            let binding = ContractBinding::new(wallet.provider(), config.contract_address);
            client = client
                .with_binder(Arc::new(binding))
                .with_wallet(Arc::new(wallet));
        }

        if let Some(url) = &config.websocket_url {
            client = client.with_events(Arc::new(WsEventSource::new(
                url.clone(),
                config.contract_address,
            )));
        }

        Ok(client)
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_binder(mut self, binder: Arc<dyn Binder>) -> Self {
        self.binder = Some(binder);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSource>) -> Self {
        self.events = Some(events);
        self
    }

    async fn contract(&self) -> Result<Arc<dyn GameContract>> {
        let binder = self.binder.as_ref().ok_or(GameError::ProviderMissing)?;
        let sender = self.sessions.current_account().await?;
        Ok(binder.bind(sender))
    }

    // Session
    pub async fn login(&self) -> Result<Session> {
        let contract = self.contract().await?;
        self.sessions
            .login(self.wallet.as_deref(), contract.as_ref())
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        self.sessions.logout().await
    }

    pub async fn current_account(&self) -> Result<Option<Address>> {
        self.sessions.current_account().await
    }

    pub async fn is_admin(&self) -> Result<bool> {
        self.sessions.is_admin().await
    }

    pub async fn session(&self) -> Result<Option<Session>> {
        self.sessions.session().await
    }

    // Reads
    pub async fn get_dashboard(&self) -> Result<Dashboard> {
        let contract = self.contract().await?;
        let address = contract.get_contract_address().await?;

        if address.is_zero() {
            tracing::debug!("No game contract deployed yet, using default dashboard");
            return Ok(Dashboard::undeployed(address));
        }

        let bid = contract.get_bid().await?;
        let commission = contract.get_commission().await?;

        Ok(Dashboard {
            bid,
            commission,
            contract_address: address,
        })
    }

    pub async fn get_result(&self) -> Result<String> {
        self.contract().await?.get_result().await
    }

    pub async fn get_leaderboard(&self) -> Result<Leaderboard> {
        self.contract().await?.leaderboard().await
    }

    pub async fn get_best_players(&self) -> Result<Vec<Player>> {
        self.contract().await?.get_leaderboard().await
    }

    // Admin writes, access control is enforced by the contract
    pub async fn upgrade(&self, new_contract: Address) -> Result<H256> {
        let tx_hash = self.contract().await?.upgrade(new_contract).await?;
        tracing::info!("Upgraded game contract to {:#x}", new_contract);
        Ok(tx_hash)
    }

    pub async fn set_commission(&self, commission: u8) -> Result<H256> {
        let tx_hash = self.contract().await?.set_commission(commission).await?;
        tracing::info!("Commission set to {}%", commission);
        Ok(tx_hash)
    }

    pub async fn set_bid(&self, bid: U256) -> Result<H256> {
        let tx_hash = self.contract().await?.set_bid(bid).await?;
        tracing::info!("Bid set to {} wei", bid);
        Ok(tx_hash)
    }

    // Game
    /// Pays exactly the bid read in this call.
    pub async fn play(&self, option: MoveOption) -> Result<H256> {
        let contract = self.contract().await?;
        let bid = contract.get_bid().await?;

        tracing::debug!("Playing {} with bid {} wei", option, bid);
        contract.play(option, bid).await
    }

    /// Calls `callback` with the result of every `Played` event from now on.
    pub fn listen_event<F>(&self, mut callback: F) -> Result<EventSubscription>
    where
        F: FnMut(String) + Send + 'static,
    {
        self.listen_played(move |event| callback(event.result))
    }

    pub fn listen_played<F>(&self, callback: F) -> Result<EventSubscription>
    where
        F: FnMut(PlayedEvent) + Send + 'static,
    {
        let source = self
            .events
            .clone()
            .ok_or_else(|| GameError::config("Websocket server URL is not configured"))?;

        Ok(EventSubscription::spawn(source, callback))
    }
}
