use crate::anomaly::{AnomalyGate, NoveltyDetector};
use crate::checks;
use crate::config::ScoreConfig;
use crate::features;
use bristle_core::{CheckKind, EngineStats, ScoreResult};
use bristle_track::BehaviorTracker;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// `score >= threshold` means the sender is treated as a bot.
pub fn classify(score: f64, threshold: f64) -> bool {
    score >= threshold
}

/// Owns the sender map, the detector state, and the running counters.
/// Scoring never fails outward: detector trouble degrades to rule-only
/// results.
pub struct ScoreEngine {
    tracker: BehaviorTracker,
    cfg: ScoreConfig,
    gate: Mutex<AnomalyGate>,
    messages_observed: AtomicU64,
    flagged: AtomicU64,
    started_at: DateTime<Utc>,
}

impl ScoreEngine {
    pub fn new(cfg: ScoreConfig) -> Self {
        let gate = AnomalyGate::new(cfg.feature_buffer_cap, cfg.anomaly_min_samples);
        Self {
            tracker: BehaviorTracker::new(),
            cfg,
            gate: Mutex::new(gate),
            messages_observed: AtomicU64::new(0),
            flagged: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScoreConfig::default())
    }

    /// Records the observation and scores it. Empty sender ids and empty
    /// texts still count as observations but score as the deterministic
    /// minimal result.
    pub fn observe_and_score(&self, sender_id: &str, text: &str, now: f64) -> ScoreResult {
        self.messages_observed.fetch_add(1, Ordering::Relaxed);

        if sender_id.is_empty() || text.is_empty() {
            self.tracker.ingest(sender_id, text, now);
            debug!(sender = %sender_id, "empty input, minimal score");
            return ScoreResult::looks_human();
        }

        let (profile, _was_new) = self.tracker.ingest(sender_id, text, now);

        let mut score = 0.0;
        let mut reasons = Vec::new();
        for hit in checks::run_rule_checks(&profile, text, &self.cfg) {
            debug!(
                sender = %sender_id,
                check = hit.kind.label(),
                evidence = %hit.evidence,
                "check triggered"
            );
            score += hit.weight;
            reasons.push(hit.kind.label().to_string());
        }

        let fv = features::extract(&profile, text);
        {
            let mut gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
            gate.record(&fv);
            if let NoveltyDetector::Ready(model) = gate.detector() {
                match model.score(&fv) {
                    Ok(magnitude) if magnitude > self.cfg.anomaly_threshold => {
                        let add = (magnitude * self.cfg.anomaly_scale).min(self.cfg.anomaly_cap);
                        debug!(sender = %sender_id, magnitude, add, "feature vector is anomalous");
                        score += add;
                        reasons.push(CheckKind::StatisticalAnomaly.label().to_string());
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(sender = %sender_id, error = %e, "anomaly scoring failed, rule-only result");
                    }
                }
            }
        }

        let score = score.clamp(0.0, 1.0);
        if classify(score, self.cfg.bot_threshold) {
            self.flagged.fetch_add(1, Ordering::Relaxed);
        }
        if reasons.is_empty() {
            reasons.push(bristle_core::LOOKS_HUMAN.to_string());
        }

        info!(
            sender = %sender_id,
            score,
            reasons = %reasons.join(" | "),
            "message scored"
        );

        ScoreResult { score, reasons }
    }

    /// Threshold comparison against the configured bot threshold.
    pub fn classify(&self, score: f64) -> bool {
        classify(score, self.cfg.bot_threshold)
    }

    /// Explicit maintenance operation: fit the novelty baseline over the
    /// accumulated buffer. True when the detector became (or stayed)
    /// ready.
    pub fn refit_detector(&self) -> bool {
        let mut gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        match gate.refit() {
            Ok(true) => {
                info!(samples = gate.training_samples(), "novelty baseline fitted");
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(error = %e, "detector refit failed");
                false
            }
        }
    }

    pub fn detector_ready(&self) -> bool {
        self.gate.lock().unwrap_or_else(|e| e.into_inner()).is_ready()
    }

    /// Drops all per-sender state, the training buffer, and the counters.
    pub fn reset(&self) {
        self.tracker.reset();
        self.gate.lock().unwrap_or_else(|e| e.into_inner()).reset();
        self.messages_observed.store(0, Ordering::Relaxed);
        self.flagged.store(0, Ordering::Relaxed);
        info!("engine reset");
    }

    /// Evicts senders idle longer than `ttl_secs`.
    pub fn evict(&self, ttl_secs: f64, now: f64) -> usize {
        self.tracker.evict(ttl_secs, now)
    }

    pub fn stats(&self) -> EngineStats {
        let gate = self.gate.lock().unwrap_or_else(|e| e.into_inner());
        EngineStats {
            senders: self.tracker.sender_count(),
            messages_observed: self.messages_observed.load(Ordering::Relaxed),
            flagged: self.flagged.load(Ordering::Relaxed),
            training_samples: gate.training_samples(),
            detector_ready: gate.is_ready(),
            started_at: self.started_at,
        }
    }

    pub fn tracker(&self) -> &BehaviorTracker {
        &self.tracker
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.cfg
    }
}
