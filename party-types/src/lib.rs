pub mod bank;
pub mod errors;
pub mod game;
pub mod messages;
pub mod player;

// Re-export all types
pub use bank::*;
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use player::*;

pub type MatchId = uuid::Uuid;
pub type PlayerId = uuid::Uuid;
pub type BankId = String;
