use crate::error::{GameError, Result};
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bid shown while no game contract is deployed behind the adapter: 0.01 ether in wei.
pub const DEFAULT_BID_WEI: u64 = 10_000_000_000_000_000;

/// Commission percentage shown while no game contract is deployed.
pub const DEFAULT_COMMISSION: u8 = 10;

/// Parses an amount given either in wei ("10000") or in ether ("0.01 ether", "0.01eth").
pub fn parse_amount(value: &str) -> Result<U256> {
    let value = value.trim().to_ascii_lowercase();
    let ether = value
        .strip_suffix("ether")
        .or_else(|| value.strip_suffix("eth"))
        .map(str::trim);

    match ether {
        Some(amount) => ethers::utils::parse_ether(amount)
            .map_err(|e| GameError::config(format!("Invalid ether amount '{}': {}", amount, e))),
        None => U256::from_dec_str(&value)
            .map_err(|e| GameError::config(format!("Invalid wei amount '{}': {}", value, e))),
    }
}

/// Formats wei as ether for display.
pub fn format_amount(wei: U256) -> String {
    ethers::utils::format_ether(wei)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account: Address,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Bid in wei.
    pub bid: U256,
    pub commission: u8,
    pub contract_address: Address,
}

impl Dashboard {
    /// Placeholder values for an adapter that has no game contract yet.
    pub fn undeployed(contract_address: Address) -> Self {
        Self {
            bid: U256::from(DEFAULT_BID_WEI),
            commission: DEFAULT_COMMISSION,
            contract_address,
        }
    }

    pub fn is_deployed(&self) -> bool {
        !self.contract_address.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub wallet: Address,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub players: Vec<Player>,
    pub result: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum MoveOption {
    None = 0,
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

impl From<MoveOption> for u8 {
    fn from(option: MoveOption) -> Self {
        option as u8
    }
}

impl TryFrom<u8> for MoveOption {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MoveOption::None),
            1 => Ok(MoveOption::Rock),
            2 => Ok(MoveOption::Paper),
            3 => Ok(MoveOption::Scissors),
            other => Err(GameError::InvalidMove(format!("{} is out of range 0-3", other))),
        }
    }
}

impl FromStr for MoveOption {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(MoveOption::None),
            "rock" | "1" => Ok(MoveOption::Rock),
            "paper" | "2" => Ok(MoveOption::Paper),
            "scissors" | "3" => Ok(MoveOption::Scissors),
            _ => Err(GameError::InvalidMove(s.to_string())),
        }
    }
}

impl fmt::Display for MoveOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveOption::None => "none",
            MoveOption::Rock => "rock",
            MoveOption::Paper => "paper",
            MoveOption::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedEvent {
    pub player: Address,
    pub result: String,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<H256>,
}

/// A log emitted by the game contract, decoded against the known event set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Played(PlayedEvent),
    /// Log that did not match any known event schema.
    Unrecognized { signature: Option<H256> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_option_parsing() {
        assert_eq!("Rock".parse::<MoveOption>().unwrap(), MoveOption::Rock);
        assert_eq!(" scissors ".parse::<MoveOption>().unwrap(), MoveOption::Scissors);
        assert_eq!("2".parse::<MoveOption>().unwrap(), MoveOption::Paper);
        assert!("lizard".parse::<MoveOption>().is_err());

        assert_eq!(u8::from(MoveOption::None), 0);
        assert_eq!(MoveOption::try_from(3).unwrap(), MoveOption::Scissors);
        assert!(matches!(
            MoveOption::try_from(4),
            Err(GameError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12345").unwrap(), U256::from(12_345u64));
        assert_eq!(parse_amount("0.01 ether").unwrap(), U256::from(DEFAULT_BID_WEI));
        assert_eq!(parse_amount("1ETH").unwrap(), U256::exp10(18));
        assert!(parse_amount("lots").is_err());
        assert!(parse_amount("1.5").is_err());
    }

    #[test]
    fn test_undeployed_dashboard() {
        let dashboard = Dashboard::undeployed(Address::zero());
        assert_eq!(dashboard.bid, ethers::utils::parse_ether("0.01").unwrap());
        assert_eq!(dashboard.commission, 10);
        assert!(!dashboard.is_deployed());
    }
}
