use bristle_core::SenderProfile;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

/// First 8 hex characters of the xxh3 digest of the lower-cased text.
/// Detects repeated message bodies without keeping the text around.
pub fn fingerprint(text: &str) -> String {
    let digest = xxh3_64(text.to_lowercase().as_bytes());
    let mut hex = format!("{digest:016x}");
    hex.truncate(8);
    hex
}

/// Per-sender rolling history. Single source of truth for everything the
/// scoring checks read; each profile mutates under its map entry lock.
pub struct BehaviorTracker {
    profiles: Arc<DashMap<String, SenderProfile>>,
}

impl BehaviorTracker {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(DashMap::new()),
        }
    }

    /// Records one observation for `sender_id`, creating the profile on
    /// first sight, and returns a snapshot of the updated state.
    pub fn observe(&self, sender_id: &str, text: &str, now: f64) -> SenderProfile {
        let mut entry = self
            .profiles
            .entry(sender_id.to_string())
            .or_insert_with(|| {
                debug!(sender = %sender_id, "new sender profile");
                SenderProfile::new(sender_id, now)
            });
        entry.record_message(now, text.chars().count());
        entry.clone()
    }

    /// Fingerprints `text` and records it on the sender's profile; true
    /// when the fingerprint was not seen before from this sender. A sender
    /// that was never observed records nothing.
    pub fn fingerprint_and_record(&self, sender_id: &str, text: &str) -> bool {
        match self.profiles.get_mut(sender_id) {
            Some(mut profile) => profile.record_fingerprint(fingerprint(text)),
            None => false,
        }
    }

    /// `observe` + `fingerprint_and_record` under one entry lock, so the
    /// returned snapshot already includes the current message's
    /// fingerprint.
    pub fn ingest(&self, sender_id: &str, text: &str, now: f64) -> (SenderProfile, bool) {
        let mut entry = self
            .profiles
            .entry(sender_id.to_string())
            .or_insert_with(|| {
                debug!(sender = %sender_id, "new sender profile");
                SenderProfile::new(sender_id, now)
            });
        entry.record_message(now, text.chars().count());
        let was_new = entry.record_fingerprint(fingerprint(text));
        (entry.clone(), was_new)
    }

    pub fn get(&self, sender_id: &str) -> Option<SenderProfile> {
        self.profiles.get(sender_id).map(|p| p.clone())
    }

    pub fn sender_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn reset(&self) {
        self.profiles.clear();
        info!("tracker reset");
    }

    /// Drops profiles idle longer than `ttl_secs`; returns how many.
    pub fn evict(&self, ttl_secs: f64, now: f64) -> usize {
        let before = self.profiles.len();
        self.profiles.retain(|_, profile| match profile.last_seen() {
            Some(t) => now - t <= ttl_secs,
            None => false,
        });
        let evicted = before - self.profiles.len();
        if evicted > 0 {
            info!(evicted, ttl_secs, "idle sender profiles evicted");
        }
        evicted
    }
}

impl Default for BehaviorTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bristle_core::HISTORY_CAP;

    #[test]
    fn fingerprint_is_short_hex_and_case_insensitive() {
        let fp = fingerprint("Hello THERE");
        assert_eq!(fp.len(), 8);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, fingerprint("hello there"));
        assert_ne!(fp, fingerprint("hello their"));
    }

    #[test]
    fn observe_creates_profile_lazily() {
        let tracker = BehaviorTracker::new();
        assert!(tracker.get("u1").is_none());

        let profile = tracker.observe("u1", "hey", 42.0);
        assert_eq!(profile.sender_id, "u1");
        assert_eq!(profile.message_count, 1);
        assert_eq!(profile.created_at, 42.0);
        assert_eq!(tracker.sender_count(), 1);
    }

    #[test]
    fn observe_keeps_count_and_sequences_in_step() {
        let tracker = BehaviorTracker::new();
        for i in 0..7 {
            tracker.observe("u1", "some message", i as f64);
        }
        let profile = tracker.get("u1").unwrap();
        assert_eq!(profile.message_count, 7);
        assert_eq!(profile.timestamps.len(), 7);
        assert_eq!(profile.message_lengths.len(), 7);
    }

    #[test]
    fn history_is_ring_bounded() {
        let tracker = BehaviorTracker::new();
        for i in 0..(HISTORY_CAP + 10) {
            tracker.observe("u1", "x", i as f64);
        }
        let profile = tracker.get("u1").unwrap();
        assert_eq!(profile.message_count, (HISTORY_CAP + 10) as u64);
        assert_eq!(profile.timestamps.len(), HISTORY_CAP);
        assert_eq!(profile.message_lengths.len(), HISTORY_CAP);
    }

    #[test]
    fn fingerprint_and_record_reports_novelty() {
        let tracker = BehaviorTracker::new();
        tracker.observe("u1", "buy now", 0.0);
        assert!(tracker.fingerprint_and_record("u1", "buy now"));
        assert!(!tracker.fingerprint_and_record("u1", "buy now"));
        assert!(!tracker.fingerprint_and_record("u1", "BUY NOW"));
        assert!(tracker.fingerprint_and_record("u1", "something else"));
    }

    #[test]
    fn fingerprint_for_unknown_sender_records_nothing() {
        let tracker = BehaviorTracker::new();
        assert!(!tracker.fingerprint_and_record("ghost", "hello"));
        assert!(tracker.get("ghost").is_none());
    }

    #[test]
    fn ingest_snapshot_includes_current_fingerprint() {
        let tracker = BehaviorTracker::new();
        let (profile, was_new) = tracker.ingest("u1", "first message", 1.0);
        assert!(was_new);
        assert_eq!(profile.message_count, 1);
        assert_eq!(profile.distinct_fingerprints(), 1);

        let (profile, was_new) = tracker.ingest("u1", "first message", 2.0);
        assert!(!was_new);
        assert_eq!(profile.message_count, 2);
        assert_eq!(profile.distinct_fingerprints(), 1);
    }

    #[test]
    fn evict_drops_idle_profiles_only() {
        let tracker = BehaviorTracker::new();
        tracker.observe("old", "hi", 0.0);
        tracker.observe("fresh", "hi", 100.0);

        let evicted = tracker.evict(50.0, 120.0);
        assert_eq!(evicted, 1);
        assert!(tracker.get("old").is_none());
        assert!(tracker.get("fresh").is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let tracker = BehaviorTracker::new();
        tracker.observe("a", "hi", 0.0);
        tracker.observe("b", "hi", 0.0);
        tracker.reset();
        assert_eq!(tracker.sender_count(), 0);
    }
}
