//! Client for the rock-paper-scissors game contract
//!
//! Logs a user in through a wallet provider, reads and administers the
//! adapter contract (bid, commission, leaderboard), submits moves and
//! follows `Played` events. Game rules and access control live on chain.

pub mod client;
pub mod contract;
pub mod deploy;
pub mod error;
pub mod storage;
pub mod types;
pub mod wallet;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use client::{parse_address, ClientConfig, GameClient};
pub use contract::{Binder, ContractBinding, EventSubscription, GameContract};
pub use deploy::DeployConfig;
pub use error::{GameError, Result};
pub use storage::Storage;
pub use types::{
    format_amount, parse_amount, Dashboard, GameEvent, Leaderboard, MoveOption, PlayedEvent,
    Player, Session,
};
pub use wallet::{RpcWallet, SessionManager, WalletProvider};

pub use ethers::types::{Address, H256, U256};
