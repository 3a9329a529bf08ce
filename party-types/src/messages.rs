use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{PlayerId, Prompt};

/// How the prompt pool for a new match is obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PromptPlan {
    /// Ask the prompt generator for a batch sized to the match
    Generated,
    /// Use the words of the selected bank
    Bank { prompts: Vec<Prompt> },
}

/// Every input the turn scheduler reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Signal {
    AddPlayer { name: String },
    RemovePlayer { player_id: PlayerId },
    StartMatch { plan: PromptPlan },
    PromptsLoaded { prompts: Vec<Prompt> },
    Ready,
    ChoosePrompt { index: usize },
    Tick { epoch: u32 },
    MarkCorrect,
    Skip,
    ToggleGuesser { player_id: PlayerId },
    CancelConfirm,
    SubmitScore,
    NextTurn,
    ContinueFromLeaderboard,
    EndEarly,
    NewMatch,
    Exit,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::AddPlayer { .. } => "AddPlayer",
            Signal::RemovePlayer { .. } => "RemovePlayer",
            Signal::StartMatch { .. } => "StartMatch",
            Signal::PromptsLoaded { .. } => "PromptsLoaded",
            Signal::Ready => "Ready",
            Signal::ChoosePrompt { .. } => "ChoosePrompt",
            Signal::Tick { .. } => "Tick",
            Signal::MarkCorrect => "MarkCorrect",
            Signal::Skip => "Skip",
            Signal::ToggleGuesser { .. } => "ToggleGuesser",
            Signal::CancelConfirm => "CancelConfirm",
            Signal::SubmitScore => "SubmitScore",
            Signal::NextTurn => "NextTurn",
            Signal::ContinueFromLeaderboard => "ContinueFromLeaderboard",
            Signal::EndEarly => "EndEarly",
            Signal::NewMatch => "NewMatch",
            Signal::Exit => "Exit",
        }
    }
}
