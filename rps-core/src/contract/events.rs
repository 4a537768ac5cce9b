use crate::contract::PlayedFilter;
use crate::error::{GameError, Result};
use crate::types::{GameEvent, PlayedEvent};

use async_trait::async_trait;
use ethers::contract::parse_log;
use ethers::providers::{Middleware, Provider, Ws};
use ethers::types::{Address, BlockNumber, Filter, Log};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events buffered between the transport and the callback before the
/// transport is made to wait.
const EVENT_BUFFER: usize = 64;

/// Push-based feed of contract events, on a transport separate from the wallet.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Sends decoded events into `sink` in arrival order until the transport
    /// closes or the receiving side goes away. A full `sink` holds the
    /// transport back rather than dropping events.
    async fn forward(&self, sink: mpsc::Sender<GameEvent>) -> Result<()>;
}

/// Websocket log subscription on the game contract, starting at the latest block.
pub struct WsEventSource {
    url: String,
    contract_address: Address,
}

impl WsEventSource {
    pub fn new(url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            url: url.into(),
            contract_address,
        }
    }
}

#[async_trait]
impl EventSource for WsEventSource {
    async fn forward(&self, sink: mpsc::Sender<GameEvent>) -> Result<()> {
        let provider = Provider::<Ws>::connect(self.url.as_str())
            .await
            .map_err(|e| GameError::transport(format!("Failed to connect to {}: {}", self.url, e)))?;

        let filter = Filter::new()
            .address(self.contract_address)
            .from_block(BlockNumber::Latest);

        let mut stream = provider
            .subscribe_logs(&filter)
            .await
            .map_err(|e| GameError::transport(format!("Failed to subscribe to logs: {}", e)))?;

        tracing::info!(
            "Subscribed to events of {:#x} via {}",
            self.contract_address,
            self.url
        );

        while let Some(log) = stream.next().await {
            if sink.send(decode_log(log)).await.is_err() {
                break;
            }
        }

        Ok(())
    }
}

/// Decodes a raw log against the `Played` schema; anything else is `Unrecognized`.
pub fn decode_log(log: Log) -> GameEvent {
    let signature = log.topics.first().copied();
    let block_number = log.block_number.map(|n| n.as_u64());
    let transaction_hash = log.transaction_hash;

    match parse_log::<PlayedFilter>(log) {
        Ok(played) => GameEvent::Played(PlayedEvent {
            player: played.player,
            result: played.result,
            block_number,
            transaction_hash,
        }),
        Err(e) => {
            tracing::warn!("Ignoring undecodable log {:?}: {}", signature, e);
            GameEvent::Unrecognized { signature }
        }
    }
}

/// Handle on a running event listener. Dropping it stops delivery.
pub struct EventSubscription {
    handle: Option<JoinHandle<Result<()>>>,
}

impl EventSubscription {
    pub(crate) fn spawn<F>(source: Arc<dyn EventSource>, mut on_played: F) -> Self
    where
        F: FnMut(PlayedEvent) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
            let feed = source.forward(tx);
            tokio::pin!(feed);
            let mut feeding = true;
            let mut outcome = Ok(());

            loop {
                tokio::select! {
                    res = &mut feed, if feeding => {
                        feeding = false;
                        match res {
                            Ok(()) => tracing::debug!("Event feed closed"),
                            Err(e) => {
                                tracing::warn!("Event subscription ended: {}", e);
                                outcome = Err(e);
                            }
                        }
                    }
                    event = rx.recv() => match event {
                        Some(GameEvent::Played(played)) => on_played(played),
                        Some(GameEvent::Unrecognized { signature }) => {
                            tracing::debug!("Skipping unrecognized event {:?}", signature);
                        }
                        None => break,
                    }
                }
            }

            outcome
        });

        Self {
            handle: Some(handle),
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stops delivery and waits for the listener task to go away.
    pub async fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }

    /// Lets the listener run for the rest of the process.
    pub fn detach(mut self) {
        self.handle.take();
    }

    /// Waits until the feed closes and every received event was delivered,
    /// then reports how the feed ended. Safe to abandon midway: the listener
    /// keeps running and can still be cancelled.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };
        let finished = handle.await;
        self.handle = None;
        finished.map_err(|e| GameError::internal(format!("Event listener failed: {}", e)))?
    }

    pub async fn join(mut self) -> Result<()> {
        self.wait().await
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use ethers::contract::EthEvent;
    use ethers::types::{Bytes, H256};

    fn played_log(player: Address, result: &str) -> Log {
        Log {
            address: Address::repeat_byte(0x11),
            topics: vec![PlayedFilter::signature(), H256::from(player)],
            data: Bytes::from(encode(&[Token::String(result.to_string())])),
            block_number: Some(7u64.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_played_log() {
        let player = Address::repeat_byte(0xaa);
        match decode_log(played_log(player, "You won!")) {
            GameEvent::Played(event) => {
                assert_eq!(event.player, player);
                assert_eq!(event.result, "You won!");
                assert_eq!(event.block_number, Some(7));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_other_schema() {
        let mut log = played_log(Address::repeat_byte(0xaa), "You won!");
        log.topics[0] = H256::repeat_byte(0x01);
        assert_eq!(
            decode_log(log),
            GameEvent::Unrecognized {
                signature: Some(H256::repeat_byte(0x01))
            }
        );

        // right signature, missing indexed topic
        let mut log = played_log(Address::repeat_byte(0xaa), "You won!");
        log.topics.truncate(1);
        assert!(matches!(decode_log(log), GameEvent::Unrecognized { .. }));
    }
}
