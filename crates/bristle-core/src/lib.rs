pub mod error;
pub mod keywords;
pub mod types;

pub use error::{BristleError, BristleResult};
pub use types::{
    CheckKind, EngineStats, ScoreResult, SenderProfile, DEFAULT_BOT_THRESHOLD, HISTORY_CAP,
    LOOKS_HUMAN,
};
