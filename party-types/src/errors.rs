use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum MatchError {
    #[error("signal {signal} is not accepted during {phase:?}")]
    InvalidTransition { phase: Phase, signal: String },
    #[error("player name must not be empty")]
    EmptyPlayerName,
    #[error("the roster can only change before a match starts")]
    RosterLocked,
    #[error("player {player_id} not found")]
    UnknownPlayer { player_id: String },
    #[error("the drawer cannot be marked as a guesser")]
    DrawerCannotGuess,
    #[error("prompt choice {index} out of range ({available} offered)")]
    InvalidPromptChoice { index: usize, available: usize },
    #[error("word bank {bank_id} not found")]
    BankNotFound { bank_id: String },
    #[error("word bank name must not be empty")]
    EmptyBankName,
    #[error("invalid match configuration: {reason}")]
    InvalidConfig { reason: String },
}
