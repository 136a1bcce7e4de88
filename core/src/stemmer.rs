//! Naive suffix-stripping stemmer covering common Portuguese and English endings.
//!
//! It favours recall: related forms collapse onto one root even when the root
//! is not a real word, and some unrelated words over-stem onto the same key.

/// Checked in order; the first suffix that fits wins.
pub const SUFFIXES: &[&str] = &[
    "mente", "ção", "ões", "ando", "endo", "indo", "ado", "ido", "ing", "tion", "sion", "ness",
    "ment", "able", "ible", "ful", "less", "ly",
];

/// Strip the first matching suffix, keeping at least four characters of stem.
///
/// `word` is expected to be lowercase already.
pub fn stem(word: &str) -> String {
    let len = word.chars().count();
    for suffix in SUFFIXES {
        if len > suffix.chars().count() + 3 {
            if let Some(root) = word.strip_suffix(suffix) {
                return root.to_string();
            }
        }
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_english_suffixes() {
        assert_eq!(stem("running"), "runn");
        assert_eq!(stem("development"), "develop");
        assert_eq!(stem("darkness"), "dark");
        assert_eq!(stem("quickly"), "quick");
    }

    #[test]
    fn strips_portuguese_suffixes() {
        assert_eq!(stem("rapidamente"), "rapida");
        assert_eq!(stem("informação"), "informa");
        assert_eq!(stem("trabalhando"), "trabalh");
        assert_eq!(stem("claramente"), "clara");
    }

    #[test]
    fn short_words_are_untouched() {
        // "nation" is only six characters, "tion" needs more than seven
        assert_eq!(stem("nation"), "nation");
        assert_eq!(stem("only"), "only");
        assert_eq!(stem("engine"), "engine");
    }

    #[test]
    fn length_guard_is_strict() {
        assert_eq!(stem("making"), "making");
        assert_eq!(stem("walking"), "walk");
    }
}
