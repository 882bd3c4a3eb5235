use crate::config::ReplyConfig;
use bristle_core::{keywords, BristleError, BristleResult};
use rand::Rng;

struct Slot {
    name: String,
    keywords: Vec<String>,
    messages: Vec<String>,
    cursor: usize,
}

/// Ordered reply categories with a sequential cursor per category. Table
/// order doubles as detection priority.
pub struct ReplyBook {
    slots: Vec<Slot>,
    default_category: String,
}

impl ReplyBook {
    pub fn from_config(cfg: &ReplyConfig) -> BristleResult<Self> {
        if cfg.categories.is_empty() {
            return Err(BristleError::Reply("no reply categories configured".to_string()));
        }
        let mut slots: Vec<Slot> = Vec::with_capacity(cfg.categories.len());
        for category in &cfg.categories {
            if slots.iter().any(|s| s.name == category.name) {
                return Err(BristleError::Reply(format!(
                    "duplicate reply category {:?}",
                    category.name
                )));
            }
            if category.messages.is_empty() {
                return Err(BristleError::Reply(format!(
                    "reply category {:?} has no messages",
                    category.name
                )));
            }
            slots.push(Slot {
                name: category.name.clone(),
                keywords: category.keywords.clone(),
                messages: category.messages.clone(),
                cursor: 0,
            });
        }
        if !slots.iter().any(|s| s.name == cfg.default_category) {
            return Err(BristleError::Reply(format!(
                "default category {:?} is not in the table",
                cfg.default_category
            )));
        }
        Ok(Self {
            slots,
            default_category: cfg.default_category.clone(),
        })
    }

    /// First category in table order with at least one keyword hit in the
    /// lower-cased text, otherwise the configured default.
    pub fn detect_category(&self, text: &str) -> &str {
        let text_lower = text.to_lowercase();
        for slot in &self.slots {
            if keywords::count_hits(&text_lower, &slot.keywords) > 0 {
                return &slot.name;
            }
        }
        &self.default_category
    }

    /// Next message in the category's fixed order; the cursor wraps
    /// silently. Unknown categories yield nothing.
    pub fn next_message(&mut self, category: &str) -> Option<&str> {
        let slot = self.slots.iter_mut().find(|s| s.name == category)?;
        if slot.messages.is_empty() {
            return None;
        }
        let idx = slot.cursor;
        slot.cursor = (idx + 1) % slot.messages.len();
        slot.messages.get(idx).map(|m| m.as_str())
    }

    pub fn random_message<R: Rng>(&self, rng: &mut R, category: &str) -> Option<&str> {
        let slot = self.slots.iter().find(|s| s.name == category)?;
        if slot.messages.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..slot.messages.len());
        Some(slot.messages[idx].as_str())
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }
}
