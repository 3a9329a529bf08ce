use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{BankId, Difficulty};

/// A user-editable word collection split into difficulty lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordBank {
    pub id: BankId,
    pub name: String,
    pub easy: Vec<String>,
    pub medium: Vec<String>,
    pub hard: Vec<String>,
}

impl WordBank {
    pub fn words(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy | Difficulty::Custom => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn words_mut(&mut self, difficulty: Difficulty) -> &mut Vec<String> {
        match difficulty {
            Difficulty::Easy | Difficulty::Custom => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    pub fn word_count(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }
}

/// Which collaborator feeds the prompt pool at match start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum WordSource {
    #[default]
    Ai,
    Custom,
}

impl WordSource {
    pub fn as_str(self) -> &'static str {
        match self {
            WordSource::Ai => "ai",
            WordSource::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "ai" => Some(WordSource::Ai),
            "custom" => Some(WordSource::Custom),
            _ => None,
        }
    }
}
