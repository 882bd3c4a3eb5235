use crate::config::HumanizerConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// One perturbation pass per call. Every technique is total: when the
/// probability gate fails or the text offers no insertion point, the
/// input comes back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    TypoInjection,
    CapitalizationVariance,
    FillerInsertion,
    PunctuationSoftening,
    ReactionPrefixing,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::TypoInjection,
        Technique::CapitalizationVariance,
        Technique::FillerInsertion,
        Technique::PunctuationSoftening,
        Technique::ReactionPrefixing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Technique::TypoInjection => "typo_injection",
            Technique::CapitalizationVariance => "capitalization_variance",
            Technique::FillerInsertion => "filler_insertion",
            Technique::PunctuationSoftening => "punctuation_softening",
            Technique::ReactionPrefixing => "reaction_prefixing",
        }
    }

    pub fn apply<R: Rng>(&self, rng: &mut R, cfg: &HumanizerConfig, text: &str) -> String {
        match self {
            Technique::TypoInjection => typo_injection(rng, cfg, text),
            Technique::CapitalizationVariance => capitalization_variance(rng, cfg, text),
            Technique::FillerInsertion => filler_insertion(rng, cfg, text),
            Technique::PunctuationSoftening => punctuation_softening(rng, cfg, text),
            Technique::ReactionPrefixing => reaction_prefixing(rng, cfg, text),
        }
    }
}

fn coin<R: Rng>(rng: &mut R, probability: f64) -> bool {
    rng.random::<f64>() < probability
}

/// Shifts one character of one word by a single code point. Only words of
/// at least three characters qualify.
fn typo_injection<R: Rng>(rng: &mut R, cfg: &HumanizerConfig, text: &str) -> String {
    if !coin(rng, cfg.typo_probability) {
        return text.to_string();
    }
    let mut words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    let eligible: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.chars().count() >= 3)
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return text.to_string();
    }

    let word_idx = eligible[rng.random_range(0..eligible.len())];
    let chars: Vec<char> = words[word_idx].chars().collect();
    let pos = rng.random_range(0..chars.len());
    let delta: i32 = if coin(rng, 0.5) { 1 } else { -1 };
    words[word_idx] = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if i != pos {
                return c;
            }
            // surrogate-range and out-of-range shifts keep the original
            (c as u32)
                .checked_add_signed(delta)
                .and_then(char::from_u32)
                .unwrap_or(c)
        })
        .collect();
    words.join(" ")
}

/// Lower-cases the first letter of each sentence independently.
fn capitalization_variance<R: Rng>(rng: &mut R, cfg: &HumanizerConfig, text: &str) -> String {
    let sentences: Vec<String> = text
        .split(". ")
        .map(|s| {
            if !coin(rng, cfg.caps_variance_probability) || s.is_empty() {
                return s.to_string();
            }
            let mut rest = s.chars();
            match rest.next() {
                Some(first) => first.to_lowercase().chain(rest).collect(),
                None => s.to_string(),
            }
        })
        .collect();
    sentences.join(". ")
}

fn filler_insertion<R: Rng>(rng: &mut R, cfg: &HumanizerConfig, text: &str) -> String {
    if !coin(rng, cfg.filler_probability) || cfg.fillers.is_empty() {
        return text.to_string();
    }
    let filler = &cfg.fillers[rng.random_range(0..cfg.fillers.len())];
    let mut sentences: Vec<String> = text.split(". ").map(str::to_string).collect();
    let idx = rng.random_range(0..sentences.len());
    sentences[idx] = format!("{filler}, {}", sentences[idx]);
    sentences.join(". ")
}

fn punctuation_softening<R: Rng>(rng: &mut R, cfg: &HumanizerConfig, text: &str) -> String {
    let text = text.replace("!!!", "!!");
    if text.ends_with('?') && coin(rng, cfg.question_soften_probability) {
        let mut out = text;
        out.pop();
        out.push_str("..");
        return out;
    }
    text
}

fn reaction_prefixing<R: Rng>(rng: &mut R, cfg: &HumanizerConfig, text: &str) -> String {
    if !coin(rng, cfg.reaction_probability) || cfg.reactions.is_empty() {
        return text.to_string();
    }
    let reaction = &cfg.reactions[rng.random_range(0..cfg.reactions.len())];
    format!("{reaction}, {text}")
}

/// Applies one uniformly chosen technique per call.
pub struct Humanizer {
    rng: StdRng,
    cfg: HumanizerConfig,
}

impl Humanizer {
    pub fn new(cfg: HumanizerConfig) -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
            cfg,
        }
    }

    /// Reproducible variant for tests and replay runs.
    pub fn seeded(cfg: HumanizerConfig, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            cfg,
        }
    }

    pub fn apply(&mut self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let technique = Technique::ALL[self.rng.random_range(0..Technique::ALL.len())];
        let out = technique.apply(&mut self.rng, &self.cfg, text);
        debug!(technique = technique.label(), changed = out != text, "humanization pass");
        out
    }

    pub fn config(&self) -> &HumanizerConfig {
        &self.cfg
    }
}
