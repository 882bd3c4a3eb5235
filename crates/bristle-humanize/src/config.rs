use serde::Deserialize;

/// Probabilities and vocabularies for the perturbation techniques. Each
/// probability gates its technique independently; the capitalization one
/// is drawn once per sentence.
#[derive(Debug, Clone, Deserialize)]
pub struct HumanizerConfig {
    #[serde(default = "default_typo_probability")]
    pub typo_probability: f64,
    #[serde(default = "default_caps_variance_probability")]
    pub caps_variance_probability: f64,
    #[serde(default = "default_filler_probability")]
    pub filler_probability: f64,
    #[serde(default = "default_question_soften_probability")]
    pub question_soften_probability: f64,
    #[serde(default = "default_reaction_probability")]
    pub reaction_probability: f64,
    #[serde(default = "default_fillers")]
    pub fillers: Vec<String>,
    #[serde(default = "default_reactions")]
    pub reactions: Vec<String>,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            typo_probability: default_typo_probability(),
            caps_variance_probability: default_caps_variance_probability(),
            filler_probability: default_filler_probability(),
            question_soften_probability: default_question_soften_probability(),
            reaction_probability: default_reaction_probability(),
            fillers: default_fillers(),
            reactions: default_reactions(),
        }
    }
}

fn default_typo_probability() -> f64 {
    0.1
}
fn default_caps_variance_probability() -> f64 {
    0.3
}
fn default_filler_probability() -> f64 {
    0.3
}
fn default_question_soften_probability() -> f64 {
    0.3
}
fn default_reaction_probability() -> f64 {
    0.2
}
fn default_fillers() -> Vec<String> {
    ["btw", "honestly", "like", "you know", "i mean", "tbh"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_reactions() -> Vec<String> {
    ["haha", "lol", "omg", "wtf", "wow", "lmao"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
