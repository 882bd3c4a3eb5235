use serde::Deserialize;
use std::collections::HashMap;

/// One reply category: detection keywords plus the canned messages cycled
/// or sampled for it. Table order is detection priority.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
    #[serde(default = "default_category_name")]
    pub default_category: String,
    /// Persona name to humanize intensity, the probability a composed
    /// reply goes through a humanization pass.
    #[serde(default = "default_personas")]
    pub personas: HashMap<String, f64>,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            default_category: default_category_name(),
            personas: default_personas(),
            fallback_reply: default_fallback_reply(),
        }
    }
}

fn category(name: &str, keywords: &[&str], messages: &[&str]) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        messages: messages.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        category(
            "greeting",
            &["hello", "hi", "hey", "morning", "evening"],
            &[
                "Hey! Good to hear from you.",
                "Hi there, how's your day going?",
                "Hey, what's up?",
            ],
        ),
        category(
            "support",
            &["help", "problem", "issue", "broken", "error", "stuck"],
            &[
                "Sorry you're running into that. Can you tell me a bit more?",
                "Let me take a look, what exactly happened?",
                "That sounds annoying. Walk me through it?",
            ],
        ),
        category(
            "pricing",
            &["price", "cost", "subscribe", "plan", "trial", "upgrade"],
            &[
                "The current plans are listed on the pricing page, want a quick summary?",
                "There's a free tier, paid plans start pretty low.",
                "Happy to go over the plans with you.",
            ],
        ),
        category(
            "smalltalk",
            &[],
            &[
                "Not much here, what about you?",
                "Same old, same old. You?",
                "All good on my end.",
            ],
        ),
    ]
}

fn default_category_name() -> String {
    "smalltalk".to_string()
}

fn default_personas() -> HashMap<String, f64> {
    [
        ("friendly", 0.85),
        ("professional", 0.7),
        ("casual", 0.9),
        ("humorous", 0.95),
        ("sympathetic", 0.8),
    ]
    .iter()
    .map(|(name, intensity)| (name.to_string(), *intensity))
    .collect()
}

fn default_fallback_reply() -> String {
    "Hey! Thanks for reaching out. What's up?".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_documented_table() {
        let cfg = ReplyConfig::default();
        assert_eq!(cfg.categories.len(), 4);
        assert_eq!(cfg.categories[0].name, "greeting");
        assert_eq!(cfg.default_category, "smalltalk");
        assert_eq!(cfg.personas.len(), 5);
        assert_eq!(cfg.personas["friendly"], 0.85);
        assert_eq!(cfg.personas["humorous"], 0.95);
        assert!(!cfg.fallback_reply.is_empty());
    }

    #[test]
    fn every_default_category_has_messages() {
        for category in ReplyConfig::default().categories {
            assert!(!category.messages.is_empty(), "{}", category.name);
        }
    }
}
