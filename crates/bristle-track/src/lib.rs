pub mod tracker;

pub use tracker::{fingerprint, BehaviorTracker};
