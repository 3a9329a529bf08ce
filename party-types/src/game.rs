use crate::{MatchId, PlayerId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::player::{Player, Standing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    /// The three buckets a balanced prompt offer draws from, in offer order
    pub const TARGETED: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Bucket a prompt is filed under when partitioning a pool.
    /// Custom words fill the easy bucket.
    pub fn bucket(self) -> Difficulty {
        match self {
            Difficulty::Custom => Difficulty::Easy,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Prompt {
    pub word: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Prompt {
    pub fn new(word: impl Into<String>, category: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            word: word.into(),
            category: category.into(),
            difficulty,
        }
    }
}

/// Where the active prompt pool came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PoolOrigin {
    Generated,
    Bank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Phase {
    Setup,            // Roster building
    Loading,          // Waiting for the prompt batch
    PreTurn,          // Hand the device to the drawer
    ChoosingPrompt,   // Drawer picks one of three prompts
    Drawing,          // Countdown running
    ConfirmingScore,  // Countdown stopped, guessers being marked
    PostTurn,         // Turn resolved, history appended
    RoundLeaderboard, // Every player has drawn once this round
    GameOver,
}

impl Phase {
    /// Phases belonging to a running match, where "end early" is accepted
    pub fn is_in_match(self) -> bool {
        !matches!(self, Phase::Setup | Phase::GameOver)
    }

    /// Phases in which a drawer exists and `current_player_index` is meaningful
    pub fn has_drawer(self) -> bool {
        matches!(
            self,
            Phase::PreTurn
                | Phase::ChoosingPrompt
                | Phase::Drawing
                | Phase::ConfirmingScore
                | Phase::PostTurn
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TurnContext {
    pub current_player_index: usize,
    pub current_prompt: Option<Prompt>,
    pub prompt_choices: Vec<Prompt>,
    pub timer: u32,
    pub round: u32,
    pub max_rounds: u32,
}

impl TurnContext {
    pub fn new(max_rounds: u32, turn_seconds: u32) -> Self {
        Self {
            current_player_index: 0,
            current_prompt: None,
            prompt_choices: Vec::new(),
            timer: turn_seconds,
            round: 1,
            max_rounds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryEntry {
    pub player_name: String,
    pub word: String,
    pub was_correct: bool,
    pub winners: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchState {
    pub id: MatchId,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub turn: TurnContext,
    pub history: Vec<HistoryEntry>,
    pub selected_guessers: Vec<PlayerId>,
    pub prompt_pool: Vec<Prompt>,
    pub pool_origin: PoolOrigin,
    pub countdown_epoch: u32,
}

impl MatchState {
    pub fn new(id: MatchId, max_rounds: u32, turn_seconds: u32) -> Self {
        Self {
            id,
            phase: Phase::Setup,
            players: Vec::new(),
            turn: TurnContext::new(max_rounds, turn_seconds),
            history: Vec::new(),
            selected_guessers: Vec::new(),
            prompt_pool: Vec::new(),
            pool_origin: PoolOrigin::Generated,
            countdown_epoch: 0,
        }
    }

    /// The player currently drawing, if the phase has one
    pub fn drawer(&self) -> Option<&Player> {
        if !self.phase.has_drawer() {
            return None;
        }
        self.players.get(self.turn.current_player_index)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_selected(&self, player_id: PlayerId) -> bool {
        self.selected_guessers.contains(&player_id)
    }

    /// Players ordered by score, highest first. Ties keep roster order and share a rank.
    pub fn standings(&self) -> Vec<Standing> {
        let mut ordered: Vec<&Player> = self.players.iter().collect();
        // sort_by is stable, so equal scores stay in roster order
        ordered.sort_by(|a, b| b.score.cmp(&a.score));

        let mut standings = Vec::with_capacity(ordered.len());
        let mut rank = 0;
        let mut previous_score = None;
        for (position, player) in ordered.into_iter().enumerate() {
            if previous_score != Some(player.score) {
                rank = position as u32 + 1;
                previous_score = Some(player.score);
            }
            standings.push(Standing {
                rank,
                player_id: player.id,
                name: player.name.clone(),
                score: player.score,
            });
        }
        standings
    }

    /// Every player sharing the top score. Empty when there are no players.
    pub fn leaders(&self) -> Vec<&Player> {
        let Some(top) = self.players.iter().map(|p| p.score).max() else {
            return Vec::new();
        };
        self.players.iter().filter(|p| p.score == top).collect()
    }
}
