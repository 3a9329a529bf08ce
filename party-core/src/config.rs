use party_types::MatchError;

use crate::HintTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub max_rounds: u32,
    pub turn_seconds: u32,
    pub speed_bonus_seconds: u32, // Seconds remaining at or above which guessers earn +1
    pub min_players: usize,
    pub prompt_headroom: usize,
    pub hints: HintTable,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            turn_seconds: 60,
            speed_bonus_seconds: 30,
            min_players: 2,
            prompt_headroom: 6,
            hints: HintTable::default(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_rounds == 0 {
            return Err(MatchError::InvalidConfig {
                reason: "max_rounds must be positive".to_string(),
            });
        }
        if self.turn_seconds == 0 {
            return Err(MatchError::InvalidConfig {
                reason: "turn_seconds must be positive".to_string(),
            });
        }
        if self.min_players < 2 {
            return Err(MatchError::InvalidConfig {
                reason: "a match needs at least 2 players".to_string(),
            });
        }
        Ok(())
    }

    /// Size of the generated prompt batch: three offers per turn plus headroom
    pub fn prompt_batch_size(&self, player_count: usize) -> usize {
        self.max_rounds as usize * player_count * 3 + self.prompt_headroom
    }
}
