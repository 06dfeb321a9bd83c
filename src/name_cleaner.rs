//! Product-name cleaning: articles off, display casing on.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    static ref PARTITIVE_PREFIX_REGEX: Regex =
        Regex::new(r"^(?:de\s+la\s+|de\s+l'|du\s+|des\s+|de\s+|d')")
            .expect("Partitive prefix pattern should be valid");
    static ref DETERMINER_PREFIX_REGEX: Regex = Regex::new(
        r"^(?:un\s+peu\s+d(?:e\s+|')|quelques\s+|les\s+|le\s+|la\s+|l'|une\s+|un\s+)"
    )
    .expect("Determiner prefix pattern should be valid");
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").expect("Whitespace pattern should be valid");
}

/// Characters trimmed from both ends of a product name
const BOUNDARY_PUNCTUATION: &[char] = &['.', ',', ';', ':', '-', '\'', '"', '!', '?'];

/// Connector words that stay lowercase wherever they appear
const LOWERCASE_CONNECTORS: &[&str] = &["et", "ou", "à", "au", "aux"];

/// Clean a raw product phrase into a display name.
///
/// Leading articles and partitives are removed, whitespace is collapsed and each word
/// is capitalized, except connectors ("et", "à", ...) and "de"/"d'" inside the name.
/// When cleaning leaves fewer than two characters, the trimmed input is returned.
///
/// ```rust
/// use recipe_importer::name_cleaner::clean_product_name;
///
/// assert_eq!(clean_product_name("de la crème fraîche"), "Crème Fraîche");
/// assert_eq!(clean_product_name("gousses d'ail"), "Gousses d'Ail");
/// assert_eq!(clean_product_name("sel et poivre"), "Sel et Poivre");
/// ```
pub fn clean_product_name(raw: &str) -> String {
    let original = raw.trim();
    let lowered = original.to_lowercase();
    if lowered.chars().count() < 2 {
        return original.to_string();
    }

    let stripped = strip_articles(&lowered);
    if stripped.is_empty() {
        return original.to_string();
    }

    let cleaned = capitalize_words(&stripped);
    if cleaned.chars().count() < 2 {
        return original.to_string();
    }

    trace!(raw = %raw, cleaned = %cleaned, "Cleaned product name");
    cleaned
}

/// Trim and strip leading articles until nothing changes
fn strip_articles(text: &str) -> String {
    let mut current = collapse(text);
    loop {
        let trimmed = current.trim_matches(|c: char| c.is_whitespace() || BOUNDARY_PUNCTUATION.contains(&c));
        let without_partitive = PARTITIVE_PREFIX_REGEX.replace(trimmed, "");
        let without_determiner = DETERMINER_PREFIX_REGEX.replace(&without_partitive, "");
        let next = collapse(&without_determiner);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn collapse(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

fn capitalize_words(text: &str) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let inner = i > 0 && i < last;
            if LOWERCASE_CONNECTORS.contains(word) || (inner && *word == "de") {
                word.to_string()
            } else if let Some(rest) = word.strip_prefix("d'").filter(|_| i > 0) {
                format!("d'{}", capitalize(rest))
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first letter. Letters without a single-character uppercase form
/// ("ß", ligatures) are left as they are so that cleaning stays idempotent.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) if single.to_lowercase().eq(std::iter::once(first)) => {
            std::iter::once(single).chain(chars).collect()
        }
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_partitives_and_determiners() {
        assert_eq!(clean_product_name("du beurre"), "Beurre");
        assert_eq!(clean_product_name("de l'huile d'olive"), "Huile d'Olive");
        assert_eq!(clean_product_name("des oeufs"), "Oeufs");
        assert_eq!(clean_product_name("un peu de sel"), "Sel");
        assert_eq!(clean_product_name("de la farine"), "Farine");
        assert_eq!(clean_product_name("les pommes de terre"), "Pommes de Terre");
    }

    #[test]
    fn test_connectors_stay_lowercase() {
        assert_eq!(clean_product_name("crème à l'ancienne"), "Crème à L'ancienne");
        assert_eq!(clean_product_name("sel ou poivre"), "Sel ou Poivre");
        // "de" at the end of the name is capitalized
        assert_eq!(clean_product_name("pomme de"), "Pomme De");
    }

    #[test]
    fn test_trims_punctuation_and_whitespace() {
        assert_eq!(clean_product_name("  - farine   de   blé.  "), "Farine de Blé");
    }

    #[test]
    fn test_short_or_empty_results_return_original() {
        assert_eq!(clean_product_name("x"), "x");
        assert_eq!(clean_product_name("d'"), "d'");
        assert_eq!(clean_product_name(".."), "..");
        assert_eq!(clean_product_name(""), "");
    }

    #[test]
    fn test_letters_without_single_uppercase_are_kept() {
        assert_eq!(clean_product_name("ßahne"), "ßahne");
        assert_eq!(clean_product_name("ﬁlet de boeuf"), "ﬁlet de Boeuf");
        for raw in ["ßahne", "ﬁlet de boeuf"] {
            let once = clean_product_name(raw);
            assert_eq!(clean_product_name(&once), once, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in ["du beurre doux", "gousses d'ail", "  de la   crème  ", "de l'", "les"] {
            let once = clean_product_name(raw);
            assert_eq!(clean_product_name(&once), once, "input: {:?}", raw);
        }
    }
}
