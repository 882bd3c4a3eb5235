//! Character-level measurements shared by the rule checks and the feature
//! extractor. The two callers divide by different denominators, so only
//! raw counts live here.

use regex::Regex;
use std::sync::OnceLock;

static EMOJI: OnceLock<Regex> = OnceLock::new();
static URL: OnceLock<Regex> = OnceLock::new();

/// Emoticons, symbols/pictographs, and transport blocks.
fn emoji_pattern() -> &'static Regex {
    EMOJI.get_or_init(|| {
        Regex::new(r"[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}]").unwrap()
    })
}

fn url_pattern() -> &'static Regex {
    URL.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

const PUNCTUATION: &str = "!?.,-;:";

pub(crate) fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn uppercase_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_uppercase()).count()
}

pub(crate) fn punctuation_count(text: &str) -> usize {
    text.chars().filter(|c| PUNCTUATION.contains(*c)).count()
}

pub(crate) fn emoji_count(text: &str) -> usize {
    emoji_pattern().find_iter(text).count()
}

pub(crate) fn url_count(text: &str) -> usize {
    url_pattern().find_iter(text).count()
}
