pub mod config;
pub mod techniques;

pub use config::HumanizerConfig;
pub use techniques::{Humanizer, Technique};
