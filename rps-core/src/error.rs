use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("No wallet provider found")]
    ProviderMissing,

    #[error("Wallet not found or not allowed")]
    NoAccountsAuthorized,

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Transaction dropped before it was mined: {0}")]
    TransactionDropped(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown network: {name}")]
    UnknownNetwork { name: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::Contract(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for GameError {
    fn from(err: dialoguer::Error) -> Self {
        GameError::Dialog(err.to_string())
    }
}
