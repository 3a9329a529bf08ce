use std::collections::HashSet;

use party_types::{BankId, Difficulty, MatchError, Prompt, WordBank};
use tracing::{debug, info};
use uuid::Uuid;

pub const CLASSIC_BANK_ID: &str = "classic-pack";
pub const CLASSIC_BANK_NAME: &str = "Classic Pack";

const CLASSIC_EASY: &[&str] = &[
    "cat", "dog", "sun", "tree", "house", "fish", "car", "apple", "ball", "star", "moon", "hat",
];
const CLASSIC_MEDIUM: &[&str] = &[
    "guitar", "rainbow", "bicycle", "castle", "pirate", "snowman", "dragon", "robot", "volcano",
    "camera", "umbrella", "penguin",
];
const CLASSIC_HARD: &[&str] = &[
    "lighthouse", "time machine", "skyscraper", "photosynthesis", "black hole", "traffic jam",
    "jellyfish", "earthquake", "submarine", "constellation",
];

/// The built-in bank used when nothing has been saved yet
pub fn classic_pack() -> WordBank {
    let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
    WordBank {
        id: CLASSIC_BANK_ID.to_string(),
        name: CLASSIC_BANK_NAME.to_string(),
        easy: owned(CLASSIC_EASY),
        medium: owned(CLASSIC_MEDIUM),
        hard: owned(CLASSIC_HARD),
    }
}

/// Parse user-entered words: one per line or comma separated.
/// Blank entries and `#` comments are skipped, duplicates dropped case-insensitively.
pub fn parse_word_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// The editable collection of word banks plus the current selection.
/// A selection of `None`, or an id with no bank, is the empty sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankCatalog {
    banks: Vec<WordBank>,
    selected: Option<BankId>,
}

impl Default for BankCatalog {
    fn default() -> Self {
        Self {
            banks: vec![classic_pack()],
            selected: Some(CLASSIC_BANK_ID.to_string()),
        }
    }
}

impl BankCatalog {
    /// Build a catalog from stored parts. An unknown selection falls back to the first bank.
    pub fn new(banks: Vec<WordBank>, selected: Option<BankId>) -> Self {
        let selected = match selected {
            Some(id) if banks.iter().any(|b| b.id == id) => Some(id),
            _ => banks.first().map(|b| b.id.clone()),
        };
        Self { banks, selected }
    }

    pub fn banks(&self) -> &[WordBank] {
        &self.banks
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get(&self, bank_id: &str) -> Option<&WordBank> {
        self.banks.iter().find(|b| b.id == bank_id)
    }

    pub fn active(&self) -> Option<&WordBank> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Create an empty bank and select it
    pub fn create(&mut self, name: &str) -> Result<BankId, MatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchError::EmptyBankName);
        }
        let id = Uuid::new_v4().to_string();
        self.banks.push(WordBank {
            id: id.clone(),
            name: name.to_string(),
            easy: Vec::new(),
            medium: Vec::new(),
            hard: Vec::new(),
        });
        self.selected = Some(id.clone());
        info!("Created word bank '{}' ({})", name, id);
        Ok(id)
    }

    pub fn select(&mut self, bank_id: &str) -> Result<(), MatchError> {
        if self.get(bank_id).is_none() {
            return Err(not_found(bank_id));
        }
        self.selected = Some(bank_id.to_string());
        Ok(())
    }

    /// Delete a bank. Returns `Ok(false)` without changing anything when it
    /// is the last one left. Deleting the active bank selects the first
    /// remaining bank.
    pub fn delete(&mut self, bank_id: &str) -> Result<bool, MatchError> {
        let index = self
            .banks
            .iter()
            .position(|b| b.id == bank_id)
            .ok_or_else(|| not_found(bank_id))?;

        if self.banks.len() <= 1 {
            debug!("Refusing to delete the last word bank {}", bank_id);
            return Ok(false);
        }

        let removed = self.banks.remove(index);
        if self.selected.as_deref() == Some(bank_id) {
            self.selected = self.banks.first().map(|b| b.id.clone());
        }
        info!("Deleted word bank '{}' ({})", removed.name, removed.id);
        Ok(true)
    }

    pub fn rename(&mut self, bank_id: &str, name: &str) -> Result<(), MatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchError::EmptyBankName);
        }
        let bank = self.get_mut(bank_id)?;
        bank.name = name.to_string();
        Ok(())
    }

    /// Replace one difficulty list with words parsed from `text`.
    /// `Custom` edits the easy list. Returns the number of words kept.
    pub fn set_words(
        &mut self,
        bank_id: &str,
        difficulty: Difficulty,
        text: &str,
    ) -> Result<usize, MatchError> {
        let words = parse_word_list(text);
        let count = words.len();
        let bank = self.get_mut(bank_id)?;
        *bank.words_mut(difficulty) = words;
        Ok(count)
    }

    /// Words available for a match from the active bank
    pub fn usable_word_count(&self) -> usize {
        self.active().map_or(0, WordBank::word_count)
    }

    /// The active bank as a prompt pool, easy list first, then medium, then
    /// hard. Category is the bank name. Every word is tagged `Custom`, so
    /// bank words score the custom tier and fill the easy bucket.
    pub fn active_pool(&self) -> Vec<Prompt> {
        let Some(bank) = self.active() else {
            return Vec::new();
        };
        Difficulty::TARGETED
            .iter()
            .flat_map(|difficulty| {
                bank.words(*difficulty).iter().map(move |word| {
                    Prompt::new(word.clone(), bank.name.clone(), Difficulty::Custom)
                })
            })
            .collect()
    }

    fn get_mut(&mut self, bank_id: &str) -> Result<&mut WordBank, MatchError> {
        self.banks
            .iter_mut()
            .find(|b| b.id == bank_id)
            .ok_or_else(|| not_found(bank_id))
    }
}

fn not_found(bank_id: &str) -> MatchError {
    MatchError::BankNotFound {
        bank_id: bank_id.to_string(),
    }
}
