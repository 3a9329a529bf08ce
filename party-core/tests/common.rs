#![allow(dead_code)]

use party_core::{MatchConfig, MatchEvent, MatchEventHandler, PromptPicker, TurnScheduler};
use party_types::{Difficulty, Phase, Player, Prompt, PromptPlan, Signal};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted indices, then keeps picking the first entry
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    picks: VecDeque<usize>,
}

impl ScriptedPicker {
    pub fn new(picks: &[usize]) -> Self {
        Self {
            picks: picks.iter().copied().collect(),
        }
    }
}

impl PromptPicker for ScriptedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}

pub type TestScheduler = TurnScheduler<ScriptedPicker>;

/// Two prompts per difficulty, easy first
pub fn create_test_pool() -> Vec<Prompt> {
    vec![
        Prompt::new("cat", "Animals", Difficulty::Easy),
        Prompt::new("sun", "Nature", Difficulty::Easy),
        Prompt::new("guitar", "Music", Difficulty::Medium),
        Prompt::new("rainbow", "Nature", Difficulty::Medium),
        Prompt::new("lighthouse", "Places", Difficulty::Hard),
        Prompt::new("volcano", "Nature", Difficulty::Hard),
    ]
}

/// Creates a scheduler in `Setup` with the given roster
pub fn create_scheduler(names: &[&str], max_rounds: u32) -> TestScheduler {
    let config = MatchConfig {
        max_rounds,
        ..MatchConfig::default()
    };
    let mut scheduler = TurnScheduler::with_picker(config, ScriptedPicker::default())
        .expect("default config is valid");
    for name in names {
        scheduler
            .handle(Signal::AddPlayer {
                name: name.to_string(),
            })
            .expect("roster is open in setup");
    }
    scheduler
}

/// Creates a standard two player, one round match
pub fn create_standard_scheduler() -> TestScheduler {
    create_scheduler(&["Alice", "Bob"], 1)
}

/// Drives the scheduler forward until it reaches `target`.
/// Drawing turns are skipped unless the target is `ConfirmingScore`.
pub fn advance_to_phase(scheduler: &mut TestScheduler, target: Phase) {
    for _ in 0..1000 {
        let phase = scheduler.state().phase;
        if phase == target {
            return;
        }
        let signal = match phase {
            Phase::Setup => Signal::StartMatch {
                plan: PromptPlan::Generated,
            },
            Phase::Loading => Signal::PromptsLoaded {
                prompts: create_test_pool(),
            },
            Phase::PreTurn => Signal::Ready,
            Phase::ChoosingPrompt => Signal::ChoosePrompt { index: 0 },
            Phase::Drawing if target == Phase::ConfirmingScore => Signal::MarkCorrect,
            Phase::Drawing => Signal::Skip,
            Phase::ConfirmingScore => Signal::SubmitScore,
            Phase::PostTurn => Signal::NextTurn,
            Phase::RoundLeaderboard => Signal::ContinueFromLeaderboard,
            Phase::GameOver => panic!("match ended before reaching {:?}", target),
        };
        scheduler
            .handle(signal)
            .unwrap_or_else(|e| panic!("advancing from {:?} failed: {}", phase, e));
    }
    panic!("never reached {:?}", target);
}

/// Sends `count` ticks tagged with the live countdown epoch
pub fn tick_n(scheduler: &mut TestScheduler, count: u32) {
    for _ in 0..count {
        let epoch = scheduler.state().countdown_epoch;
        scheduler.handle(Signal::Tick { epoch }).unwrap();
    }
}

/// Plays the current turn from `Drawing`: waits `elapsed` seconds, then
/// confirms the named guessers. An empty list skips the turn.
pub fn resolve_turn(scheduler: &mut TestScheduler, elapsed: u32, guessers: &[&str]) {
    assert_eq!(scheduler.state().phase, Phase::Drawing);
    tick_n(scheduler, elapsed);

    if guessers.is_empty() {
        scheduler.handle(Signal::Skip).unwrap();
        return;
    }

    scheduler.handle(Signal::MarkCorrect).unwrap();
    for name in guessers {
        let player_id = get_player_by_name(scheduler, name)
            .unwrap_or_else(|| panic!("no player named {}", name))
            .id;
        scheduler
            .handle(Signal::ToggleGuesser { player_id })
            .unwrap();
    }
    scheduler.handle(Signal::SubmitScore).unwrap();
}

pub fn get_player_by_name<'a>(scheduler: &'a TestScheduler, name: &str) -> Option<&'a Player> {
    scheduler.state().players.iter().find(|p| p.name == name)
}

pub fn score_of(scheduler: &TestScheduler, name: &str) -> u32 {
    get_player_by_name(scheduler, name).map_or(0, |p| p.score)
}

pub fn assert_phase(scheduler: &TestScheduler, expected: Phase) {
    assert_eq!(
        scheduler.state().phase,
        expected,
        "Expected phase {:?}, got {:?}",
        expected,
        scheduler.state().phase
    );
}

/// Event collector for testing event emissions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<MatchEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<MatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_event(&self) -> Option<MatchEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn count_matching(&self, check_fn: impl Fn(&MatchEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&MatchEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl MatchEventHandler for EventCollector {
    fn handle_event(&mut self, event: MatchEvent) {
        self.events.lock().unwrap().push(event);
    }
}
