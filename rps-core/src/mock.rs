//! In-memory stand-ins for the wallet, the adapter contract and the event feed.

use crate::contract::{Binder, EventSource, GameContract};
use crate::error::{GameError, Result};
use crate::types::{GameEvent, MoveOption, Player};
use crate::wallet::WalletProvider;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct StaticWallet {
    accounts: Vec<Address>,
    rejects: bool,
}

impl StaticWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            rejects: false,
        }
    }

    /// Wallet whose user declines every access request.
    pub fn rejecting() -> Self {
        Self {
            accounts: Vec::new(),
            rejects: true,
        }
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if self.rejects {
            return Err(GameError::NoAccountsAuthorized);
        }
        Ok(self.accounts.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    SetBid(U256),
    SetCommission(u8),
    Upgrade(Address),
    Play(MoveOption),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransaction {
    pub hash: H256,
    pub sender: Option<Address>,
    pub call: MockCall,
    pub value: U256,
}

struct MockState {
    owner: Address,
    game: Address,
    bid: U256,
    commission: u8,
    result: String,
    players: Vec<Player>,
    transactions: Vec<MockTransaction>,
}

/// Adapter contract with owner-only administration and exact-bid play.
#[derive(Clone)]
pub struct MockContract {
    state: Arc<Mutex<MockState>>,
}

impl MockContract {
    /// Adapter with no game contract behind it yet.
    pub fn new(owner: Address) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                owner,
                game: Address::zero(),
                bid: U256::zero(),
                commission: 0,
                result: String::new(),
                players: Vec::new(),
                transactions: Vec::new(),
            })),
        }
    }

    pub fn with_game(self, game: Address, bid: U256, commission: u8) -> Self {
        {
            let mut state = self.state.lock();
            state.game = game;
            state.bid = bid;
            state.commission = commission;
        }
        self
    }

    pub fn with_leaderboard(self, players: Vec<Player>, result: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.players = players;
            state.result = result.to_string();
        }
        self
    }

    pub fn transactions(&self) -> Vec<MockTransaction> {
        self.state.lock().transactions.clone()
    }
}

impl Binder for MockContract {
    fn bind(&self, sender: Option<Address>) -> Arc<dyn GameContract> {
        Arc::new(MockHandle {
            state: self.state.clone(),
            sender,
        })
    }
}

struct MockHandle {
    state: Arc<Mutex<MockState>>,
    sender: Option<Address>,
}

impl MockHandle {
    fn record(&self, state: &mut MockState, call: MockCall, value: U256) -> H256 {
        let hash = H256::from_low_u64_be(state.transactions.len() as u64 + 1);
        state.transactions.push(MockTransaction {
            hash,
            sender: self.sender,
            call,
            value,
        });
        hash
    }

    fn admin_call(
        &self,
        call: MockCall,
        apply: impl FnOnce(&mut MockState) -> Result<()>,
    ) -> Result<H256> {
        let mut state = self.state.lock();
        if self.sender != Some(state.owner) {
            return Err(GameError::contract(
                "execution reverted: caller is not the owner",
            ));
        }
        apply(&mut *state)?;
        Ok(self.record(&mut *state, call, U256::zero()))
    }
}

fn require_game(state: &MockState) -> Result<()> {
    if state.game.is_zero() {
        return Err(GameError::contract("execution reverted: game not deployed"));
    }
    Ok(())
}

#[async_trait]
impl GameContract for MockHandle {
    async fn owner(&self) -> Result<Address> {
        Ok(self.state.lock().owner)
    }

    async fn get_bid(&self) -> Result<U256> {
        let state = self.state.lock();
        require_game(&state)?;
        Ok(state.bid)
    }

    async fn set_bid(&self, bid: U256) -> Result<H256> {
        self.admin_call(MockCall::SetBid(bid), |state| {
            require_game(state)?;
            state.bid = bid;
            Ok(())
        })
    }

    async fn get_commission(&self) -> Result<u8> {
        let state = self.state.lock();
        require_game(&state)?;
        Ok(state.commission)
    }

    async fn set_commission(&self, commission: u8) -> Result<H256> {
        self.admin_call(MockCall::SetCommission(commission), |state| {
            require_game(state)?;
            state.commission = commission;
            Ok(())
        })
    }

    async fn get_contract_address(&self) -> Result<Address> {
        Ok(self.state.lock().game)
    }

    async fn upgrade(&self, new_contract: Address) -> Result<H256> {
        self.admin_call(MockCall::Upgrade(new_contract), |state| {
            state.game = new_contract;
            Ok(())
        })
    }

    async fn play(&self, option: MoveOption, value: U256) -> Result<H256> {
        let mut state = self.state.lock();
        require_game(&state)?;

        if option == MoveOption::None {
            return Err(GameError::contract("execution reverted: invalid option"));
        }
        if value != state.bid {
            return Err(GameError::contract("execution reverted: incorrect bid"));
        }

        let player = self.sender.unwrap_or_default();
        state.result = format!("{:#x} played {}", player, option);
        Ok(self.record(&mut *state, MockCall::Play(option), value))
    }

    async fn get_result(&self) -> Result<String> {
        Ok(self.state.lock().result.clone())
    }

    async fn get_leaderboard(&self) -> Result<Vec<Player>> {
        Ok(self.state.lock().players.clone())
    }
}

/// Replays a fixed list of events, then either closes or stays open.
pub struct MockEventSource {
    events: Vec<GameEvent>,
    hold_open: bool,
    failure: Option<String>,
}

impl MockEventSource {
    pub fn new(events: Vec<GameEvent>) -> Self {
        Self {
            events,
            hold_open: false,
            failure: None,
        }
    }

    pub fn held_open(events: Vec<GameEvent>) -> Self {
        Self {
            hold_open: true,
            ..Self::new(events)
        }
    }

    /// Delivers `events`, then breaks with a transport error.
    pub fn failing(events: Vec<GameEvent>, reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::new(events)
        }
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn forward(&self, sink: mpsc::Sender<GameEvent>) -> Result<()> {
        for event in &self.events {
            if sink.send(event.clone()).await.is_err() {
                return Ok(());
            }
        }

        if let Some(reason) = &self.failure {
            return Err(GameError::transport(reason.clone()));
        }
        if self.hold_open {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}
