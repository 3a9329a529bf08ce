use party_types::{Difficulty, HistoryEntry, Player, PlayerId, Prompt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub player_id: PlayerId,
    pub points: u32,
}

/// Everything a resolved turn changes: who gains what, and the history line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnScore {
    pub deltas: Vec<ScoreDelta>,
    pub entry: HistoryEntry,
    pub speed_bonus: bool,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Points a correct guess is worth. A missing prompt scores as easy.
    pub fn base_points(difficulty: Option<Difficulty>) -> u32 {
        match difficulty.unwrap_or(Difficulty::Easy) {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Custom => 2,
        }
    }

    /// Speed bonus is judged on time remaining, not time elapsed
    pub fn is_speed_bonus(timer: u32, speed_bonus_seconds: u32) -> bool {
        timer >= speed_bonus_seconds
    }

    /// Score a confirmed turn.
    ///
    /// The drawer earns `base_points` only when at least one guesser was
    /// selected. Each selected guesser earns `base_points`, plus one when
    /// the turn resolved inside the speed bonus window. Winners are listed
    /// in roster order regardless of selection order.
    pub fn score_turn(
        players: &[Player],
        drawer_index: usize,
        prompt: Option<&Prompt>,
        timer: u32,
        selected: &[PlayerId],
        speed_bonus_seconds: u32,
    ) -> TurnScore {
        let base = Self::base_points(prompt.map(|p| p.difficulty));
        let speed_bonus = Self::is_speed_bonus(timer, speed_bonus_seconds);
        let drawer = players.get(drawer_index);

        let guessers: Vec<&Player> = players
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != drawer_index && selected.contains(&p.id))
            .map(|(_, p)| p)
            .collect();

        let mut deltas = Vec::with_capacity(guessers.len() + 1);
        if !guessers.is_empty() {
            if let Some(drawer) = drawer {
                deltas.push(ScoreDelta {
                    player_id: drawer.id,
                    points: base,
                });
            }
        }
        for guesser in &guessers {
            deltas.push(ScoreDelta {
                player_id: guesser.id,
                points: base + u32::from(speed_bonus),
            });
        }

        let entry = HistoryEntry {
            player_name: drawer.map(|d| d.name.clone()).unwrap_or_default(),
            word: prompt.map(|p| p.word.clone()).unwrap_or_default(),
            was_correct: !guessers.is_empty(),
            winners: guessers.iter().map(|g| g.name.clone()).collect(),
        };

        TurnScore {
            deltas,
            entry,
            speed_bonus: speed_bonus && !guessers.is_empty(),
        }
    }

    /// History line for a turn that ran out of time or was skipped
    pub fn unsolved_entry(drawer: Option<&Player>, prompt: Option<&Prompt>) -> HistoryEntry {
        HistoryEntry {
            player_name: drawer.map(|d| d.name.clone()).unwrap_or_default(),
            word: prompt.map(|p| p.word.clone()).unwrap_or_default(),
            was_correct: false,
            winners: Vec::new(),
        }
    }

    /// Apply deltas to the roster. Scores only ever grow.
    pub fn apply(players: &mut [Player], deltas: &[ScoreDelta]) {
        for delta in deltas {
            if let Some(player) = players.iter_mut().find(|p| p.id == delta.player_id) {
                player.score = player.score.saturating_add(delta.points);
            }
        }
    }
}
