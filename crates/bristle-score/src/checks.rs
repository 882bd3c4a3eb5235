use crate::config::ScoreConfig;
use crate::textstat;
use bristle_core::{keywords, CheckKind, SenderProfile};

#[derive(Debug, Clone)]
pub struct CheckHit {
    pub kind: CheckKind,
    pub weight: f64,
    pub evidence: String,
}

/// Runs every rule check against the updated profile and the current
/// text. Order here fixes the reason ordering in the final result.
pub fn run_rule_checks(profile: &SenderProfile, text: &str, cfg: &ScoreConfig) -> Vec<CheckHit> {
    let mut hits = Vec::new();
    let text_lower = text.to_lowercase();

    if let Some(hit) = check_rapid_fire(profile, cfg) {
        hits.push(hit);
    }
    if let Some(hit) = check_repetitive(profile, cfg) {
        hits.push(hit);
    }
    if let Some(hit) = check_generic_template(&text_lower, cfg) {
        hits.push(hit);
    }
    if let Some(hit) = check_unusual_caps(text, cfg) {
        hits.push(hit);
    }
    if let Some(hit) = check_emoji_spam(text, cfg) {
        hits.push(hit);
    }
    if let Some(hit) = check_url_bombing(text, cfg) {
        hits.push(hit);
    }

    hits
}

fn check_rapid_fire(profile: &SenderProfile, cfg: &ScoreConfig) -> Option<CheckHit> {
    let n = profile.timestamps.len();
    if n < 5 {
        return None;
    }

    let span = profile.timestamps[n - 1] - profile.timestamps[n - 5];
    if span < cfg.rapid_fire_span {
        return Some(CheckHit {
            kind: CheckKind::RapidFire,
            weight: cfg.rapid_fire_weight,
            evidence: format!("last 5 messages within {:.2} time units", span),
        });
    }

    None
}

fn check_repetitive(profile: &SenderProfile, cfg: &ScoreConfig) -> Option<CheckHit> {
    if profile.message_count < cfg.repetitive_min_samples {
        return None;
    }

    // ratio is against the full count, not the ring window
    let distinct = profile.distinct_fingerprints();
    let expected = cfg.repetitive_ratio * profile.message_count as f64;
    if (distinct as f64) < expected {
        return Some(CheckHit {
            kind: CheckKind::Repetitive,
            weight: cfg.repetitive_weight,
            evidence: format!(
                "{} distinct bodies across {} messages",
                distinct, profile.message_count
            ),
        });
    }

    None
}

fn check_generic_template(text_lower: &str, cfg: &ScoreConfig) -> Option<CheckHit> {
    let matched = keywords::matched(text_lower, &cfg.template_keywords);
    if matched.len() >= cfg.template_min_matches {
        return Some(CheckHit {
            kind: CheckKind::GenericTemplate,
            weight: cfg.template_weight,
            evidence: format!("template phrases: {}", matched.join(", ")),
        });
    }

    None
}

fn check_unusual_caps(text: &str, cfg: &ScoreConfig) -> Option<CheckHit> {
    let chars = textstat::char_count(text);
    let ratio = textstat::uppercase_count(text) as f64 / chars.max(1) as f64;
    if ratio > cfg.caps_ratio_threshold {
        return Some(CheckHit {
            kind: CheckKind::UnusualCaps,
            weight: cfg.caps_weight,
            evidence: format!("uppercase ratio {:.2}", ratio),
        });
    }

    None
}

fn check_emoji_spam(text: &str, cfg: &ScoreConfig) -> Option<CheckHit> {
    let chars = textstat::char_count(text);
    let ratio = textstat::emoji_count(text) as f64 / chars.max(1) as f64;
    if ratio > cfg.emoji_ratio_threshold {
        return Some(CheckHit {
            kind: CheckKind::EmojiSpam,
            weight: cfg.emoji_weight,
            evidence: format!("emoji ratio {:.2}", ratio),
        });
    }

    None
}

fn check_url_bombing(text: &str, cfg: &ScoreConfig) -> Option<CheckHit> {
    let count = textstat::url_count(text);
    if count > cfg.url_count_threshold {
        return Some(CheckHit {
            kind: CheckKind::UrlBombing,
            weight: cfg.url_weight,
            evidence: format!("{} links in one message", count),
        });
    }

    None
}
