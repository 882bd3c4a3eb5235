use bristle_humanize::HumanizerConfig;
use bristle_reply::ReplyConfig;
use bristle_score::ScoreConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Top-level TOML layout: `[score]`, `[humanizer]`, `[reply]` sections,
/// every field optional. An empty or absent file is the default engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BristleConfig {
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub humanizer: HumanizerConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
}

impl BristleConfig {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(path).exists() {
            debug!(path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default_engine() {
        let cfg: BristleConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.score.bot_threshold, 0.6);
        assert_eq!(cfg.humanizer.typo_probability, 0.1);
        assert_eq!(cfg.reply.default_category, "smalltalk");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let cfg: BristleConfig = toml::from_str(
            r#"
            [score]
            bot_threshold = 0.5
            url_count_threshold = 1

            [humanizer]
            typo_probability = 0.4
            "#,
        )
        .unwrap();
        assert_eq!(cfg.score.bot_threshold, 0.5);
        assert_eq!(cfg.score.url_count_threshold, 1);
        assert_eq!(cfg.score.rapid_fire_weight, 0.25);
        assert_eq!(cfg.humanizer.typo_probability, 0.4);
        assert_eq!(cfg.humanizer.filler_probability, 0.3);
    }

    #[test]
    fn reply_categories_can_be_replaced() {
        let cfg: BristleConfig = toml::from_str(
            r#"
            [reply]
            default_category = "only"

            [[reply.categories]]
            name = "only"
            keywords = ["ping"]
            messages = ["pong"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.reply.categories.len(), 1);
        assert_eq!(cfg.reply.categories[0].messages, vec!["pong"]);
        assert_eq!(cfg.reply.default_category, "only");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = BristleConfig::from_file("/no/such/bristle.toml").unwrap();
        assert_eq!(cfg.score.bot_threshold, 0.6);
    }
}
