use party_types::{Difficulty, PoolOrigin, Prompt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of prompts offered to the drawer each turn
pub const CHOICES_PER_TURN: usize = 3;

/// Source of uniform indices for prompt sampling
pub trait PromptPicker {
    /// Return an index in `0..len`. Never called with `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// `rand`-backed picker used outside of tests
#[derive(Debug, Clone)]
pub struct RandomPicker<R = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> PromptPicker for RandomPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Build the three-prompt offer for a turn.
///
/// A small curated pool (three entries or fewer) is offered as-is, in pool
/// order, repeating from the start if it holds fewer than three. Otherwise
/// one prompt is drawn from each of the easy, medium and hard buckets, and
/// an empty bucket falls back to a draw from the whole pool. An empty pool
/// yields no choices.
pub fn choose_prompts(
    pool: &[Prompt],
    origin: PoolOrigin,
    picker: &mut impl PromptPicker,
) -> Vec<Prompt> {
    if pool.is_empty() {
        return Vec::new();
    }

    if origin == PoolOrigin::Bank && pool.len() <= CHOICES_PER_TURN {
        return pool.iter().cycle().take(CHOICES_PER_TURN).cloned().collect();
    }

    Difficulty::TARGETED
        .iter()
        .map(|target| {
            let bucket: Vec<&Prompt> = pool
                .iter()
                .filter(|p| p.difficulty.bucket() == *target)
                .collect();
            if bucket.is_empty() {
                pool[picker.pick(pool.len())].clone()
            } else {
                bucket[picker.pick(bucket.len())].clone()
            }
        })
        .collect()
}

const FALLBACK_WORDS: &[(&str, &str, Difficulty)] = &[
    ("cat", "Animals", Difficulty::Easy),
    ("sun", "Nature", Difficulty::Easy),
    ("house", "Places", Difficulty::Easy),
    ("apple", "Food", Difficulty::Easy),
    ("guitar", "Music", Difficulty::Medium),
    ("rainbow", "Nature", Difficulty::Medium),
    ("bicycle", "Transport", Difficulty::Medium),
    ("snowman", "Winter", Difficulty::Medium),
    ("lighthouse", "Places", Difficulty::Hard),
    ("time machine", "Science Fiction", Difficulty::Hard),
    ("photosynthesis", "Science", Difficulty::Hard),
    ("traffic jam", "Transport", Difficulty::Hard),
];

/// Static prompts used whenever generation fails or returns nothing
pub fn fallback_prompts() -> Vec<Prompt> {
    FALLBACK_WORDS
        .iter()
        .map(|(word, category, difficulty)| Prompt::new(*word, *category, *difficulty))
        .collect()
}
