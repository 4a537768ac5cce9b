use crate::client::ClientConfig;
use crate::contract::{Binder, GameContract, RpsAdapter};
use crate::error::{GameError, Result};
use crate::types::{Leaderboard, MoveOption, Player};

use async_trait::async_trait;
use ethers::abi::Detokenize;
use ethers::contract::{ContractCall, ContractError};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, BlockNumber, TransactionReceipt, H256, U256, U64};
use std::sync::Arc;

/// Fixed contract address plus the client used to reach it.
pub struct ContractBinding<M> {
    client: Arc<M>,
    address: Address,
}

impl<M: Middleware + 'static> ContractBinding<M> {
    pub fn new(client: Arc<M>, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> Arc<M> {
        self.client.clone()
    }
}

impl ContractBinding<Provider<Http>> {
    /// Binds through the wallet endpoint named in `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let url = config
            .wallet_url
            .as_deref()
            .ok_or(GameError::ProviderMissing)?;

        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| GameError::config(format!("Invalid wallet URL '{}': {}", url, e)))?;

        Ok(Self::new(Arc::new(provider), config.contract_address))
    }
}

impl<M: Middleware + 'static> Binder for ContractBinding<M> {
    fn bind(&self, sender: Option<Address>) -> Arc<dyn GameContract> {
        Arc::new(EthGameContract::new(
            self.address,
            self.client.clone(),
            sender,
        ))
    }
}

pub struct EthGameContract<M> {
    contract: RpsAdapter<M>,
    client: Arc<M>,
    sender: Option<Address>,
}

impl<M: Middleware + 'static> EthGameContract<M> {
    pub fn new(address: Address, client: Arc<M>, sender: Option<Address>) -> Self {
        Self {
            contract: RpsAdapter::new(address, client.clone()),
            client,
            sender,
        }
    }

    pub fn sender(&self) -> Option<Address> {
        self.sender
    }

    fn with_sender<D: Detokenize>(&self, call: ContractCall<M, D>) -> ContractCall<M, D> {
        match self.sender {
            Some(sender) => call.from(sender),
            None => call,
        }
    }

    async fn read<D>(&self, call: ContractCall<M, D>) -> Result<D>
    where
        D: Detokenize + Send + Sync,
    {
        self.with_sender(call).call().await.map_err(contract_error)
    }

    async fn submit<D>(&self, call: ContractCall<M, D>, label: &str) -> Result<H256>
    where
        D: Detokenize + Send + Sync,
    {
        let call = self.with_sender(call);
        let pending = call.send().await.map_err(contract_error)?;
        let tx_hash = pending.tx_hash();
        tracing::debug!("Submitted {} transaction {:#x}", label, tx_hash);

        let receipt = pending
            .await
            .map_err(|e| GameError::transport(e.to_string()))?;
        let receipt = confirmed(tx_hash, receipt)?;

        tracing::info!(
            "{} transaction {:#x} mined in block {:?}",
            label,
            receipt.transaction_hash,
            receipt.block_number
        );
        Ok(receipt.transaction_hash)
    }

    fn play_call(&self, option: MoveOption, value: U256) -> ContractCall<M, ()> {
        self.with_sender(self.contract.play(option.into()).value(value))
    }
}

/// A missing receipt means the node dropped the transaction; status 0 means it reverted.
fn confirmed(tx_hash: H256, receipt: Option<TransactionReceipt>) -> Result<TransactionReceipt> {
    let receipt =
        receipt.ok_or_else(|| GameError::TransactionDropped(format!("{:#x}", tx_hash)))?;

    if receipt.status == Some(U64::zero()) {
        return Err(GameError::contract(format!(
            "transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }
    Ok(receipt)
}

fn contract_error<M: Middleware>(err: ContractError<M>) -> GameError {
    GameError::contract(err.to_string())
}

fn to_players(raw: Vec<(Address, u32)>) -> Vec<Player> {
    raw.into_iter()
        .map(|(wallet, wins)| Player { wallet, wins })
        .collect()
}

#[async_trait]
impl<M: Middleware + 'static> GameContract for EthGameContract<M> {
    async fn owner(&self) -> Result<Address> {
        self.read(self.contract.owner()).await
    }

    async fn get_bid(&self) -> Result<U256> {
        self.read(self.contract.get_bid()).await
    }

    async fn set_bid(&self, bid: U256) -> Result<H256> {
        self.submit(self.contract.set_bid(bid), "setBid").await
    }

    async fn get_commission(&self) -> Result<u8> {
        self.read(self.contract.get_commission()).await
    }

    async fn set_commission(&self, commission: u8) -> Result<H256> {
        self.submit(self.contract.set_commission(commission), "setCommission")
            .await
    }

    async fn get_contract_address(&self) -> Result<Address> {
        self.read(self.contract.get_contract_address()).await
    }

    async fn upgrade(&self, new_contract: Address) -> Result<H256> {
        self.submit(self.contract.upgrade(new_contract), "upgrade")
            .await
    }

    async fn play(&self, option: MoveOption, value: U256) -> Result<H256> {
        self.submit(self.play_call(option, value), "play").await
    }

    async fn get_result(&self) -> Result<String> {
        self.read(self.contract.get_result()).await
    }

    async fn get_leaderboard(&self) -> Result<Vec<Player>> {
        let raw = self.read(self.contract.get_leaderboard()).await?;
        Ok(to_players(raw))
    }

    /// Both reads are pinned to the same block, so players and result agree.
    async fn leaderboard(&self) -> Result<Leaderboard> {
        let block = self
            .client
            .get_block_number()
            .await
            .map_err(|e| GameError::transport(e.to_string()))?;

        let raw = self
            .read(self.contract.get_leaderboard().block(BlockNumber::Number(block)))
            .await?;
        let result = self
            .read(self.contract.get_result().block(BlockNumber::Number(block)))
            .await?;

        tracing::debug!("Read leaderboard at block {}", block);
        Ok(Leaderboard {
            players: to_players(raw),
            result,
        })
    }
}
