//! # Text Normalizer
//!
//! Cleans social-media text before extraction: hashtags, mentions, emoji and other
//! symbols are removed, whitespace is collapsed. Letters (accented ones included),
//! digits and basic punctuation are kept.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HASHTAG_REGEX: Regex = Regex::new(r"#\w+").expect("Hashtag pattern should be valid");
    static ref MENTION_REGEX: Regex = Regex::new(r"@\w+").expect("Mention pattern should be valid");
    static ref DISALLOWED_CHARS_REGEX: Regex = Regex::new(r#"[^\w\s.,!?;:()\-'"]"#)
        .expect("Character whitelist pattern should be valid");
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

/// Normalize a piece of text into a single line.
///
/// The function is idempotent: `normalize(&normalize(t)) == normalize(t)`.
///
/// ```rust
/// use recipe_importer::text_normalizer::normalize;
///
/// assert_eq!(normalize("🍰 Gâteau   au chocolat #dessert @chef"), "Gâteau au chocolat");
/// ```
pub fn normalize(text: &str) -> String {
    let cleaned = strip_symbols(text);
    WHITESPACE_REGEX
        .replace_all(&cleaned, " ")
        .trim()
        .to_string()
}

/// Normalize each line separately, keeping line breaks.
///
/// Used where patterns must stop at the end of a line.
pub fn normalize_preserving_lines(text: &str) -> String {
    text.lines()
        .map(normalize)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_symbols(text: &str) -> String {
    let text = text.replace(['\u{2019}', '\u{2018}'], "'");
    let text = HASHTAG_REGEX.replace_all(&text, " ");
    let text = MENTION_REGEX.replace_all(&text, " ");
    DISALLOWED_CHARS_REGEX.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_hashtags_mentions_and_emoji() {
        assert_eq!(
            normalize("Trop bon 😍🔥 #recette #food @maman"),
            "Trop bon"
        );
    }

    #[test]
    fn test_keeps_accents_and_punctuation() {
        assert_eq!(
            normalize("  Crème fraîche (épaisse), d'accord ?  "),
            "Crème fraîche (épaisse), d'accord ?"
        );
    }

    #[test]
    fn test_maps_typographic_apostrophe() {
        assert_eq!(normalize("de l’huile d’olive"), "de l'huile d'olive");
    }

    #[test]
    fn test_collapses_newlines() {
        assert_eq!(normalize("a\n\n  b\tc"), "a b c");
    }

    #[test]
    fn test_preserving_lines() {
        assert_eq!(
            normalize_preserving_lines("200g de farine 🌾\n#bio 3 oeufs"),
            "200g de farine\n3 oeufs"
        );
    }

    #[test]
    fn test_idempotent_on_tricky_input() {
        for text in ["#🍰cake", "a#b c", "# x", "@@x y", "¡¿hola?!", ""] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once, "input: {:?}", text);
        }
    }
}
