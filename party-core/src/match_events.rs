use party_types::{HistoryEntry, MatchId, Phase, PlayerId, Prompt};

use crate::ScoreDelta;

#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    MatchStarted {
        match_id: MatchId,
        player_count: usize,
        max_rounds: u32,
    },
    PhaseChanged {
        match_id: MatchId,
        from: Phase,
        to: Phase,
    },
    PromptChosen {
        match_id: MatchId,
        drawer: PlayerId,
        prompt: Prompt,
    },
    TurnCompleted {
        match_id: MatchId,
        entry: HistoryEntry,
        deltas: Vec<ScoreDelta>,
        timed_out: bool,
    },
    RoundCompleted {
        match_id: MatchId,
        round: u32,
    },
    MatchEnded {
        match_id: MatchId,
        early: bool,
    },
}

impl MatchEvent {
    pub fn match_id(&self) -> MatchId {
        match self {
            MatchEvent::MatchStarted { match_id, .. } => *match_id,
            MatchEvent::PhaseChanged { match_id, .. } => *match_id,
            MatchEvent::PromptChosen { match_id, .. } => *match_id,
            MatchEvent::TurnCompleted { match_id, .. } => *match_id,
            MatchEvent::RoundCompleted { match_id, .. } => *match_id,
            MatchEvent::MatchEnded { match_id, .. } => *match_id,
        }
    }
}

/// Event handler trait for observing match progress
pub trait MatchEventHandler: Send + Sync {
    fn handle_event(&mut self, event: MatchEvent);
}

/// Simple event bus for distributing match events
pub struct MatchEventBus {
    handlers: Vec<Box<dyn MatchEventHandler>>,
}

impl MatchEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn MatchEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: MatchEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for MatchEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MatchEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
