pub mod anomaly;
pub mod checks;
pub mod config;
pub mod engine;
pub mod features;
mod textstat;

pub use config::ScoreConfig;
pub use engine::{classify, ScoreEngine};
