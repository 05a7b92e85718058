//! Canonical token stream shared by classifier training and queries.

/// Merge window used when none is configured: one token per word.
pub const DEFAULT_WINDOW: usize = 1;

/// Tokenize `text` into lowercase ASCII-alphanumeric tokens.
///
/// The text is split on whitespace (any newline style included) and every
/// `window` consecutive words are concatenated into one token before all
/// non-alphanumeric characters are stripped. Words that clean down to nothing
/// are dropped, so punctuation-only input yields no tokens. A window of `0`
/// is treated as `1`.
pub fn tokenize(text: &str, window: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(window.max(1))
        .map(|group| clean(group.iter().flat_map(|word| word.chars())))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Collapse `text` into a single cleaned string (all tokens concatenated).
pub fn fold(text: &str) -> String {
    clean(text.chars())
}

fn clean(chars: impl Iterator<Item = char>) -> String {
    chars
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        assert_eq!(tokenize("foObAr", 1), vec!["foobar"]);
        assert_eq!(tokenize("h3lL0W0rlD", 1), vec!["h3ll0w0rld"]);
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(tokenize("hello world.", 1), vec!["hello", "world"]);
        assert_eq!(tokenize("hello,world/", 1), vec!["helloworld"]);
        assert_eq!(tokenize("hello, World!", 1), tokenize("HELLO WORLD", 1));
    }

    #[test]
    fn test_newline_styles() {
        for text in ["hello\nworld", "hello\r\nworld", "hello\rworld"] {
            assert_eq!(tokenize(text, 1), vec!["hello", "world"]);
            assert_eq!(fold(text), "helloworld");
        }
    }

    #[test]
    fn test_window_merges_words() {
        assert_eq!(tokenize("hello WORLD", 2), vec!["helloworld"]);
        assert_eq!(tokenize("hello WORLD", 1), vec!["hello", "world"]);
        assert_eq!(tokenize("hello\nworld", 2), tokenize("helloworld", 1));
        assert_eq!(tokenize("a b c", 2), vec!["ab", "c"]);
    }

    #[test]
    fn test_zero_window_behaves_like_one() {
        assert_eq!(tokenize("a b", 0), tokenize("a b", 1));
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert!(tokenize("", 1).is_empty());
        assert!(tokenize("  \r\n\t ", 2).is_empty());
        assert!(tokenize("-- * --", 1).is_empty());
        assert_eq!(fold(""), "");
    }

    #[test]
    fn test_tokens_are_ascii_alphanumeric() {
        let text = "Copyright (c) 2024 — Ünïcode & Co.\n\tPermission is granted: \"AS IS\".";
        for token in tokenize(text, 1) {
            assert!(!token.is_empty());
            assert!(token
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }
}
