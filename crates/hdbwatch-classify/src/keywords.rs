/// Minimum word length (exclusive) for a title word to count as a keyword.
const MIN_KEYWORD_LEN: usize = 4;
const MAX_KEYWORDS: usize = 10;

/// Lower-cased title words longer than four characters, at most ten.
#[must_use]
pub fn extract_keywords(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_LEN)
        .take(MAX_KEYWORDS)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_words_are_dropped() {
        assert_eq!(
            extract_keywords("New BTO launch in Punggol"),
            vec!["launch", "punggol"]
        );
    }

    #[test]
    fn capped_at_ten() {
        let title = "alpha bravo charlie delta echoes foxtrot golfer hotel india juliet kilos limas";
        assert_eq!(extract_keywords(title).len(), 10);
    }

    #[test]
    fn empty_title_has_no_keywords() {
        assert!(extract_keywords("").is_empty());
    }
}
