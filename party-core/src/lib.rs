pub mod config;
pub mod hint_reveal;
pub mod match_events;
pub mod prompt_selection;
pub mod scheduler;
pub mod scoring;
pub mod sketch;
pub mod word_bank;

// Re-export main components
pub use config::*;
pub use hint_reveal::*;
pub use match_events::*;
pub use prompt_selection::*;
pub use scheduler::*;
pub use scoring::*;
pub use sketch::*;
pub use word_bank::*;
