use party_types::Difficulty;
use serde::{Deserialize, Serialize};

/// Seconds-remaining thresholds for one difficulty. A reveal happens once
/// the timer is at or below its threshold; `None` never reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintThresholds {
    pub length_mask: Option<u32>,
    pub first_letter: Option<u32>,
    pub middle_letter: Option<u32>,
    pub last_letter: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintTable {
    pub easy: HintThresholds,
    pub medium: HintThresholds,
    pub hard: HintThresholds,
}

impl Default for HintTable {
    fn default() -> Self {
        Self {
            easy: HintThresholds {
                length_mask: Some(30),
                first_letter: Some(20),
                middle_letter: Some(10),
                last_letter: None,
            },
            medium: HintThresholds {
                length_mask: Some(45),
                first_letter: Some(35),
                middle_letter: Some(15),
                last_letter: None,
            },
            hard: HintThresholds {
                length_mask: Some(60),
                first_letter: Some(45),
                middle_letter: Some(30),
                last_letter: Some(15),
            },
        }
    }
}

impl HintTable {
    /// Custom prompts use the medium row
    pub fn thresholds(&self, difficulty: Difficulty) -> &HintThresholds {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium | Difficulty::Custom => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn show_length_mask(&self, difficulty: Difficulty, timer: u32) -> bool {
        reached(self.thresholds(difficulty).length_mask, timer)
    }

    pub fn reveal(&self, word: &str, difficulty: Difficulty, timer: u32) -> Vec<HintLetter> {
        let thresholds = self.thresholds(difficulty);
        let chars: Vec<char> = word.chars().collect();
        let len = chars.len();

        let mut revealed = Vec::with_capacity(3);
        if len > 0 {
            if reached(thresholds.first_letter, timer) {
                revealed.push(0);
            }
            if reached(thresholds.middle_letter, timer) {
                revealed.push(len / 2);
            }
            if reached(thresholds.last_letter, timer) {
                revealed.push(len - 1);
            }
        }

        chars
            .into_iter()
            .enumerate()
            .map(|(i, ch)| HintLetter {
                ch,
                shown: ch != ' ' && revealed.contains(&i),
            })
            .collect()
    }

    pub fn hint(&self, word: &str, difficulty: Difficulty, timer: u32) -> Hint {
        Hint {
            show_length: self.show_length_mask(difficulty, timer),
            letters: self.reveal(word, difficulty, timer),
        }
    }
}

fn reached(threshold: Option<u32>, timer: u32) -> bool {
    threshold.is_some_and(|at| timer <= at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintLetter {
    pub ch: char,
    pub shown: bool,
}

impl HintLetter {
    /// Spaces render as gaps, never as letters
    pub fn is_separator(&self) -> bool {
        self.ch == ' '
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub show_length: bool,
    pub letters: Vec<HintLetter>,
}

impl Hint {
    /// What guessers see: `_` for hidden letters, revealed letters as-is,
    /// spaces kept as gaps. `None` while the length is still masked.
    pub fn masked(&self) -> Option<String> {
        if !self.show_length {
            return None;
        }
        Some(
            self.letters
                .iter()
                .map(|l| {
                    if l.is_separator() {
                        ' '
                    } else if l.shown {
                        l.ch
                    } else {
                        '_'
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_positions(letters: &[HintLetter]) -> Vec<usize> {
        letters
            .iter()
            .enumerate()
            .filter(|(_, l)| l.shown)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_easy_thresholds() {
        let table = HintTable::default();

        assert!(!table.show_length_mask(Difficulty::Easy, 31));
        assert!(table.show_length_mask(Difficulty::Easy, 30));

        assert!(shown_positions(&table.reveal("apple", Difficulty::Easy, 21)).is_empty());
        assert_eq!(shown_positions(&table.reveal("apple", Difficulty::Easy, 20)), vec![0]);
        assert_eq!(shown_positions(&table.reveal("apple", Difficulty::Easy, 10)), vec![0, 2]);
        // Easy never reveals the last letter
        assert_eq!(shown_positions(&table.reveal("apple", Difficulty::Easy, 0)), vec![0, 2]);
    }

    #[test]
    fn test_medium_thresholds() {
        let table = HintTable::default();

        assert!(!table.show_length_mask(Difficulty::Medium, 46));
        assert!(table.show_length_mask(Difficulty::Medium, 45));
        assert!(shown_positions(&table.reveal("guitar", Difficulty::Medium, 36)).is_empty());
        assert_eq!(shown_positions(&table.reveal("guitar", Difficulty::Medium, 35)), vec![0]);
        assert_eq!(shown_positions(&table.reveal("guitar", Difficulty::Medium, 15)), vec![0, 3]);
    }

    #[test]
    fn test_hard_thresholds() {
        let table = HintTable::default();

        assert!(table.show_length_mask(Difficulty::Hard, 60));
        assert!(shown_positions(&table.reveal("volcano", Difficulty::Hard, 46)).is_empty());
        assert_eq!(shown_positions(&table.reveal("volcano", Difficulty::Hard, 45)), vec![0]);
        assert_eq!(shown_positions(&table.reveal("volcano", Difficulty::Hard, 30)), vec![0, 3]);
        assert_eq!(shown_positions(&table.reveal("volcano", Difficulty::Hard, 15)), vec![0, 3, 6]);
    }

    #[test]
    fn test_custom_uses_medium_row() {
        let table = HintTable::default();
        assert_eq!(table.thresholds(Difficulty::Custom), table.thresholds(Difficulty::Medium));
    }

    #[test]
    fn test_spaces_are_never_shown() {
        let table = HintTable::default();
        // "ice cream": len 9, middle index 4 is 'c'; index 3 is the space
        let letters = table.reveal("ice cream", Difficulty::Hard, 0);
        assert!(letters[3].is_separator());
        assert!(!letters[3].shown);
        assert_eq!(shown_positions(&letters), vec![0, 4, 8]);

        // "a b": middle index 1 is a space and stays hidden
        let letters = table.reveal("a b", Difficulty::Hard, 0);
        assert_eq!(shown_positions(&letters), vec![0, 2]);
    }

    #[test]
    fn test_masked_rendering() {
        let table = HintTable::default();
        let hint = table.hint("ice cream", Difficulty::Hard, 30);
        assert_eq!(hint.masked().as_deref(), Some("i__ c____"));

        let hidden = table.hint("ice cream", Difficulty::Easy, 59);
        assert_eq!(hidden.masked(), None);
    }

    #[test]
    fn test_single_letter_and_empty_words() {
        let table = HintTable::default();
        let letters = table.reveal("x", Difficulty::Hard, 0);
        assert_eq!(shown_positions(&letters), vec![0]);
        assert!(table.reveal("", Difficulty::Hard, 0).is_empty());
    }
}
