//! Substring keyword scanning shared by the scoring engine's template
//! check and the reply module's category detection.

/// Number of `keywords` present in `text_lower` (each counted once,
/// regardless of how often it occurs). Callers pass already lower-cased
/// text; keywords are matched verbatim.
pub fn count_hits(text_lower: &str, keywords: &[String]) -> usize {
    keywords.iter().filter(|kw| text_lower.contains(kw.as_str())).count()
}

/// The subset of `keywords` present in `text_lower`, in list order.
pub fn matched<'a>(text_lower: &str, keywords: &'a [String]) -> Vec<&'a str> {
    keywords
        .iter()
        .filter(|kw| text_lower.contains(kw.as_str()))
        .map(|kw| kw.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_each_keyword_once() {
        let keywords = kws(&["click here", "dm me"]);
        assert_eq!(count_hits("click here now, click here fast", &keywords), 1);
        assert_eq!(count_hits("click here and dm me", &keywords), 2);
        assert_eq!(count_hits("nothing relevant", &keywords), 0);
    }

    #[test]
    fn matched_preserves_list_order() {
        let keywords = kws(&["subscribe now", "link in bio", "dm me"]);
        let hits = matched("dm me for the link in bio", &keywords);
        assert_eq!(hits, vec!["link in bio", "dm me"]);
    }

    #[test]
    fn empty_text_matches_nothing() {
        let keywords = kws(&["dm me"]);
        assert_eq!(count_hits("", &keywords), 0);
        assert!(matched("", &keywords).is_empty());
    }
}
