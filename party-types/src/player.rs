use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl Player {
    /// Create a player with a fresh id and a zero score
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
        }
    }
}

/// One line of a leaderboard, ranked 1-based with ties sharing a rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Standing {
    pub rank: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}
