use crate::textstat;
use bristle_core::SenderProfile;
use std::collections::HashSet;

pub const FEATURE_DIM: usize = 8;

/// Time denominators get this; ratio denominators use `char_count + 1`.
const TIME_EPS: f64 = 1e-6;

/// One message's behavioral footprint, derived from the sender's profile
/// after the current observation has been recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub velocity: f64,
    pub length_deviation: f64,
    pub caps_ratio: f64,
    pub punct_ratio: f64,
    pub emoji_ratio: f64,
    pub url_count: f64,
    pub distinct_word_ratio: f64,
    pub timing_ratio: f64,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; FEATURE_DIM] {
        [
            self.velocity,
            self.length_deviation,
            self.caps_ratio,
            self.punct_ratio,
            self.emoji_ratio,
            self.url_count,
            self.distinct_word_ratio,
            self.timing_ratio,
        ]
    }
}

pub fn extract(profile: &SenderProfile, text: &str) -> FeatureVector {
    let chars = textstat::char_count(text);
    let ratio_denom = (chars + 1) as f64;

    // inverse mean inter-arrival over the last 5 observations
    let velocity = if profile.timestamps.len() > 1 {
        let recent: Vec<f64> = profile
            .timestamps
            .iter()
            .rev()
            .take(5)
            .rev()
            .copied()
            .collect();
        let intervals: Vec<f64> = recent.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        1.0 / (mean + TIME_EPS)
    } else {
        0.0
    };

    // deviation of the current length from the sender's history
    let length_deviation = if profile.message_lengths.is_empty() {
        0.0
    } else {
        let lengths: Vec<f64> = profile.message_lengths.iter().map(|&l| l as f64).collect();
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let std = if lengths.len() > 1 {
            let var = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
            var.sqrt()
        } else {
            0.0
        };
        (chars as f64 - mean).abs() / (std + 1.0)
    };

    let caps_ratio = textstat::uppercase_count(text) as f64 / ratio_denom;
    let punct_ratio = textstat::punctuation_count(text) as f64 / ratio_denom;
    let emoji_ratio = textstat::emoji_count(text) as f64 / ratio_denom;
    let url_count = textstat::url_count(text) as f64;

    let words: Vec<&str> = text.split_whitespace().collect();
    let distinct: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let distinct_word_ratio = distinct.len() as f64 / (words.len() + 1) as f64;

    // most recent gap against the historical mean gap
    let timing_ratio = if profile.timestamps.len() > 1 {
        let n = profile.timestamps.len();
        let recent_interval = profile.timestamps[n - 1] - profile.timestamps[n - 2];
        let all: Vec<f64> = profile.timestamps.iter().copied().collect();
        let intervals: Vec<f64> = all.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        recent_interval / (mean + TIME_EPS)
    } else {
        0.0
    };

    FeatureVector {
        velocity,
        length_deviation,
        caps_ratio,
        punct_ratio,
        emoji_ratio,
        url_count,
        distinct_word_ratio,
        timing_ratio,
    }
}
