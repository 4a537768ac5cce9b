//! Typed access to the deployed game adapter contract.
//!
//! Every remote method gets one async call on [`GameContract`]. A handle is
//! produced per operation by a [`Binder`], which fixes the contract address
//! and the default transaction sender.

pub mod binding;
pub mod events;

pub use binding::{ContractBinding, EthGameContract};
pub use events::{decode_log, EventSource, EventSubscription, WsEventSource};

use crate::error::Result;
use crate::types::{Leaderboard, MoveOption, Player};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::sync::Arc;

ethers::contract::abigen!(
    RpsAdapter,
    r#"[
        struct PlayerEntry { address wallet; uint32 wins; }
        function owner() view returns (address)
        function getBid() view returns (uint256)
        function setBid(uint256 newBid)
        function getCommission() view returns (uint8)
        function setCommission(uint8 newCommission)
        function getContractAddress() view returns (address)
        function upgrade(address newContract)
        function play(uint8 option) payable
        function getResult() view returns (string)
        function getLeaderboard() view returns (PlayerEntry[])
        event Played(address indexed player, string result)
    ]"#
);

#[async_trait]
pub trait GameContract: Send + Sync {
    async fn owner(&self) -> Result<Address>;

    async fn get_bid(&self) -> Result<U256>;

    /// Returns the hash of the mined transaction.
    async fn set_bid(&self, bid: U256) -> Result<H256>;

    async fn get_commission(&self) -> Result<u8>;

    async fn set_commission(&self, commission: u8) -> Result<H256>;

    /// Address of the game contract the adapter currently forwards to.
    async fn get_contract_address(&self) -> Result<Address>;

    async fn upgrade(&self, new_contract: Address) -> Result<H256>;

    /// Submits a move, attaching `value` wei as payment.
    async fn play(&self, option: MoveOption, value: U256) -> Result<H256>;

    async fn get_result(&self) -> Result<String>;

    async fn get_leaderboard(&self) -> Result<Vec<Player>>;

    /// Players and latest result. The default issues two independent reads,
    /// so the two halves may come from different contract states.
    async fn leaderboard(&self) -> Result<Leaderboard> {
        let players = self.get_leaderboard().await?;
        let result = self.get_result().await?;
        Ok(Leaderboard { players, result })
    }
}

pub trait Binder: Send + Sync {
    /// Builds a handle on the fixed contract address whose transactions are sent from `sender`.
    fn bind(&self, sender: Option<Address>) -> Arc<dyn GameContract>;
}
