use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Ring capacity for per-sender timestamp/length history. Every windowed
/// check reads at most the last 5-10 entries.
pub const HISTORY_CAP: usize = 50;

pub const DEFAULT_BOT_THRESHOLD: f64 = 0.6;

/// Sentinel reason when no check fires.
pub const LOOKS_HUMAN: &str = "looks_human";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderProfile {
    pub sender_id: String,
    pub message_count: u64,
    pub timestamps: VecDeque<f64>,
    pub message_lengths: VecDeque<usize>,
    pub content_fingerprints: HashSet<String>,
    pub created_at: f64,
}

impl SenderProfile {
    pub fn new(sender_id: &str, now: f64) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            message_count: 0,
            timestamps: VecDeque::with_capacity(HISTORY_CAP),
            message_lengths: VecDeque::with_capacity(HISTORY_CAP),
            content_fingerprints: HashSet::new(),
            created_at: now,
        }
    }

    /// One observation: bump the counter, push both sequences, drop the
    /// oldest pair past HISTORY_CAP so they stay exactly parallel.
    pub fn record_message(&mut self, now: f64, char_count: usize) {
        self.message_count += 1;
        self.timestamps.push_back(now);
        self.message_lengths.push_back(char_count);
        if self.timestamps.len() > HISTORY_CAP {
            self.timestamps.pop_front();
            self.message_lengths.pop_front();
        }
    }

    /// Inserts a precomputed content fingerprint; true when unseen before.
    pub fn record_fingerprint(&mut self, fingerprint: String) -> bool {
        self.content_fingerprints.insert(fingerprint)
    }

    pub fn last_seen(&self) -> Option<f64> {
        self.timestamps.back().copied()
    }

    pub fn distinct_fingerprints(&self) -> usize {
        self.content_fingerprints.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    RapidFire,
    Repetitive,
    GenericTemplate,
    UnusualCaps,
    EmojiSpam,
    UrlBombing,
    StatisticalAnomaly,
}

impl CheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::RapidFire => "rapid_fire",
            CheckKind::Repetitive => "repetitive",
            CheckKind::GenericTemplate => "generic_template",
            CheckKind::UnusualCaps => "unusual_caps",
            CheckKind::EmojiSpam => "emoji_spam",
            CheckKind::UrlBombing => "url_bombing",
            CheckKind::StatisticalAnomaly => "statistical_anomaly",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl ScoreResult {
    pub fn looks_human() -> Self {
        Self {
            score: 0.0,
            reasons: vec![LOOKS_HUMAN.to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub senders: usize,
    pub messages_observed: u64,
    pub flagged: u64,
    pub training_samples: usize,
    pub detector_ready: bool,
    pub started_at: DateTime<Utc>,
}
