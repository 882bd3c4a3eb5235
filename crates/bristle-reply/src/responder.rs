use crate::book::ReplyBook;
use crate::config::ReplyConfig;
use bristle_core::BristleResult;
use bristle_humanize::Humanizer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::debug;

const FALLBACK_PERSONA: &str = "friendly";
const FALLBACK_INTENSITY: f64 = 0.85;

/// Detects a category for the incoming text, picks a canned reply, and
/// passes it through the humanizer with the persona's intensity as the
/// probability.
pub struct Responder {
    book: ReplyBook,
    humanizer: Humanizer,
    personas: HashMap<String, f64>,
    fallback_reply: String,
    rng: StdRng,
}

impl Responder {
    pub fn new(cfg: &ReplyConfig, humanizer: Humanizer) -> BristleResult<Self> {
        Ok(Self {
            book: ReplyBook::from_config(cfg)?,
            humanizer,
            personas: cfg.personas.clone(),
            fallback_reply: cfg.fallback_reply.clone(),
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    /// Reproducible variant; pair it with `Humanizer::seeded`.
    pub fn seeded(cfg: &ReplyConfig, humanizer: Humanizer, seed: u64) -> BristleResult<Self> {
        let mut responder = Self::new(cfg, humanizer)?;
        responder.rng = StdRng::seed_from_u64(seed);
        Ok(responder)
    }

    /// Random pick from the detected category.
    pub fn respond(&mut self, incoming: &str, persona: &str) -> String {
        let category = self.book.detect_category(incoming).to_string();
        let reply = self
            .book
            .random_message(&mut self.rng, &category)
            .map(str::to_string);
        self.compose(reply, &category, persona)
    }

    /// Sequential pick, cycling the detected category's messages in order.
    pub fn respond_in_order(&mut self, incoming: &str, persona: &str) -> String {
        let category = self.book.detect_category(incoming).to_string();
        let reply = self.book.next_message(&category).map(str::to_string);
        self.compose(reply, &category, persona)
    }

    fn compose(&mut self, reply: Option<String>, category: &str, persona: &str) -> String {
        let reply = reply.unwrap_or_else(|| self.fallback_reply.clone());
        let intensity = self.intensity(persona);
        if self.rng.random::<f64>() < intensity {
            let out = self.humanizer.apply(&reply);
            debug!(category, persona, "reply humanized");
            out
        } else {
            debug!(category, persona, "reply sent verbatim");
            reply
        }
    }

    fn intensity(&self, persona: &str) -> f64 {
        match self.personas.get(persona) {
            Some(intensity) => *intensity,
            None => self
                .personas
                .get(FALLBACK_PERSONA)
                .copied()
                .unwrap_or(FALLBACK_INTENSITY),
        }
    }

    pub fn book(&self) -> &ReplyBook {
        &self.book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bristle_humanize::HumanizerConfig;

    fn muted_humanizer(seed: u64) -> Humanizer {
        // identity humanizer: every probability gate closed
        let cfg = HumanizerConfig {
            typo_probability: 0.0,
            caps_variance_probability: 0.0,
            filler_probability: 0.0,
            question_soften_probability: 0.0,
            reaction_probability: 0.0,
            ..HumanizerConfig::default()
        };
        Humanizer::seeded(cfg, seed)
    }

    fn pinned_personas(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, intensity)| (name.to_string(), *intensity))
            .collect()
    }

    #[test]
    fn zero_intensity_persona_returns_raw_reply() {
        let cfg = ReplyConfig {
            personas: pinned_personas(&[("stone", 0.0)]),
            ..ReplyConfig::default()
        };
        let greetings: Vec<String> = cfg.categories[0].messages.clone();
        for seed in 0..10 {
            let mut responder =
                Responder::seeded(&cfg, muted_humanizer(seed), seed).unwrap();
            let out = responder.respond("hello friend", "stone");
            assert!(greetings.iter().any(|m| *m == out));
        }
    }

    #[test]
    fn unknown_persona_falls_back_to_friendly() {
        let cfg = ReplyConfig {
            personas: pinned_personas(&[("friendly", 0.0)]),
            ..ReplyConfig::default()
        };
        let greetings: Vec<String> = cfg.categories[0].messages.clone();
        for seed in 0..10 {
            let mut responder =
                Responder::seeded(&cfg, muted_humanizer(seed), seed).unwrap();
            let out = responder.respond("hi over there", "martian");
            assert!(greetings.iter().any(|m| *m == out));
        }
    }

    #[test]
    fn missing_friendly_entry_uses_the_built_in_intensity() {
        let cfg = ReplyConfig {
            personas: pinned_personas(&[("other", 0.5)]),
            ..ReplyConfig::default()
        };
        let responder = Responder::seeded(&cfg, muted_humanizer(0), 0).unwrap();
        assert_eq!(responder.intensity("ghost"), FALLBACK_INTENSITY);
        assert_eq!(responder.intensity("other"), 0.5);
    }

    #[test]
    fn respond_in_order_cycles_the_detected_category() {
        let cfg = ReplyConfig {
            personas: pinned_personas(&[("stone", 0.0)]),
            ..ReplyConfig::default()
        };
        let greetings: Vec<String> = cfg.categories[0].messages.clone();
        let mut responder = Responder::seeded(&cfg, muted_humanizer(1), 1).unwrap();

        let mut seen = Vec::new();
        for _ in 0..greetings.len() + 1 {
            seen.push(responder.respond_in_order("hello", "stone"));
        }
        assert_eq!(seen[..greetings.len()], greetings[..]);
        assert_eq!(seen[greetings.len()], greetings[0]);
    }

    #[test]
    fn seeded_responders_reproduce() {
        let cfg = ReplyConfig::default();
        let mut a = Responder::seeded(&cfg, Humanizer::seeded(HumanizerConfig::default(), 7), 7)
            .unwrap();
        let mut b = Responder::seeded(&cfg, Humanizer::seeded(HumanizerConfig::default(), 7), 7)
            .unwrap();
        for text in ["hello", "my plan costs what", "nothing in particular"] {
            assert_eq!(a.respond(text, "casual"), b.respond(text, "casual"));
        }
    }

    #[test]
    fn respond_is_total_for_any_persona_and_text() {
        let cfg = ReplyConfig::default();
        let mut responder =
            Responder::seeded(&cfg, Humanizer::seeded(HumanizerConfig::default(), 3), 3).unwrap();
        for text in ["", "help me out", "???"] {
            for persona in ["friendly", "unknown", ""] {
                let out = responder.respond(text, persona);
                assert!(!out.is_empty());
            }
        }
    }
}
