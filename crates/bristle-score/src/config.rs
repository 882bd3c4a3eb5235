use serde::Deserialize;

/// Check weights, thresholds, and the template keyword list. Every field
/// has a default, so an empty `[score]` section is the stock engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreConfig {
    #[serde(default = "default_rapid_fire_span")]
    pub rapid_fire_span: f64,
    #[serde(default = "default_rapid_fire_weight")]
    pub rapid_fire_weight: f64,

    #[serde(default = "default_repetitive_ratio")]
    pub repetitive_ratio: f64,
    #[serde(default = "default_repetitive_min_samples")]
    pub repetitive_min_samples: u64,
    #[serde(default = "default_repetitive_weight")]
    pub repetitive_weight: f64,

    #[serde(default = "default_template_keywords")]
    pub template_keywords: Vec<String>,
    #[serde(default = "default_template_min_matches")]
    pub template_min_matches: usize,
    #[serde(default = "default_template_weight")]
    pub template_weight: f64,

    #[serde(default = "default_caps_ratio_threshold")]
    pub caps_ratio_threshold: f64,
    #[serde(default = "default_caps_weight")]
    pub caps_weight: f64,

    #[serde(default = "default_emoji_ratio_threshold")]
    pub emoji_ratio_threshold: f64,
    #[serde(default = "default_emoji_weight")]
    pub emoji_weight: f64,

    #[serde(default = "default_url_count_threshold")]
    pub url_count_threshold: usize,
    #[serde(default = "default_url_weight")]
    pub url_weight: f64,

    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,
    #[serde(default = "default_anomaly_scale")]
    pub anomaly_scale: f64,
    #[serde(default = "default_anomaly_cap")]
    pub anomaly_cap: f64,
    #[serde(default = "default_anomaly_min_samples")]
    pub anomaly_min_samples: usize,
    #[serde(default = "default_feature_buffer_cap")]
    pub feature_buffer_cap: usize,

    #[serde(default = "default_bot_threshold")]
    pub bot_threshold: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            rapid_fire_span: default_rapid_fire_span(),
            rapid_fire_weight: default_rapid_fire_weight(),
            repetitive_ratio: default_repetitive_ratio(),
            repetitive_min_samples: default_repetitive_min_samples(),
            repetitive_weight: default_repetitive_weight(),
            template_keywords: default_template_keywords(),
            template_min_matches: default_template_min_matches(),
            template_weight: default_template_weight(),
            caps_ratio_threshold: default_caps_ratio_threshold(),
            caps_weight: default_caps_weight(),
            emoji_ratio_threshold: default_emoji_ratio_threshold(),
            emoji_weight: default_emoji_weight(),
            url_count_threshold: default_url_count_threshold(),
            url_weight: default_url_weight(),
            anomaly_threshold: default_anomaly_threshold(),
            anomaly_scale: default_anomaly_scale(),
            anomaly_cap: default_anomaly_cap(),
            anomaly_min_samples: default_anomaly_min_samples(),
            feature_buffer_cap: default_feature_buffer_cap(),
            bot_threshold: default_bot_threshold(),
        }
    }
}

fn default_rapid_fire_span() -> f64 {
    10.0
}
fn default_rapid_fire_weight() -> f64 {
    0.25
}
fn default_repetitive_ratio() -> f64 {
    0.3
}
fn default_repetitive_min_samples() -> u64 {
    4
}
fn default_repetitive_weight() -> f64 {
    0.20
}
fn default_template_keywords() -> Vec<String> {
    [
        "check out my profile",
        "subscribe now",
        "link in bio",
        "follow for more",
        "dm me",
        "click here",
        "only fans",
        "🔥🔥🔥",
        "💯💯💯",
        "👀👀👀",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_template_min_matches() -> usize {
    3
}
fn default_template_weight() -> f64 {
    0.15
}
fn default_caps_ratio_threshold() -> f64 {
    0.4
}
fn default_caps_weight() -> f64 {
    0.15
}
fn default_emoji_ratio_threshold() -> f64 {
    0.3
}
fn default_emoji_weight() -> f64 {
    0.10
}
fn default_url_count_threshold() -> usize {
    3
}
fn default_url_weight() -> f64 {
    0.10
}
fn default_anomaly_threshold() -> f64 {
    0.5
}
fn default_anomaly_scale() -> f64 {
    0.1
}
fn default_anomaly_cap() -> f64 {
    0.15
}
fn default_anomaly_min_samples() -> usize {
    10
}
fn default_feature_buffer_cap() -> usize {
    100
}
fn default_bot_threshold() -> f64 {
    0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_check_table() {
        let cfg = ScoreConfig::default();
        assert_eq!(cfg.rapid_fire_weight, 0.25);
        assert_eq!(cfg.repetitive_weight, 0.20);
        assert_eq!(cfg.template_weight, 0.15);
        assert_eq!(cfg.caps_weight, 0.15);
        assert_eq!(cfg.emoji_weight, 0.10);
        assert_eq!(cfg.url_weight, 0.10);
        assert_eq!(cfg.template_keywords.len(), 10);
        assert_eq!(cfg.bot_threshold, 0.6);
    }

    #[test]
    fn rule_weights_sum_within_unit_interval() {
        let cfg = ScoreConfig::default();
        let rule_total = cfg.rapid_fire_weight
            + cfg.repetitive_weight
            + cfg.template_weight
            + cfg.caps_weight
            + cfg.emoji_weight
            + cfg.url_weight;
        assert!(rule_total <= 1.0 + 1e-9);
    }
}
