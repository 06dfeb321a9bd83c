//! Pattern scan used when no ingredient anchor is present in the text.
//!
//! Spoken transcriptions rarely contain an "ingrédients :" heading, so ingredients are
//! picked out of running prose: quantities with units, counted pieces, counted
//! vegetables, partitive phrases and "on va utiliser / il faut" phrases. The two loose
//! scans are gated by [`looks_like_ingredient`].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::classifiers::looks_like_ingredient;

/// One detection scan
struct DetectionPattern {
    name: &'static str,
    regex: Regex,
    /// Capture group holding the candidate (0 for the whole match)
    group: usize,
    /// Whether candidates must pass `looks_like_ingredient`
    gated: bool,
}

impl DetectionPattern {
    fn new(name: &'static str, pattern: &str, group: usize, gated: bool) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("Detection pattern should be valid"),
            group,
            gated,
        }
    }
}

const QUANTITY_PREFIX: &str = r"(?:des?\s+|du\s+|de\s+la\s+|de\s+l'|quelques?\s+|un\s+peu\s+d(?:e\s+|'))?";

lazy_static! {
    static ref DETECTION_PATTERNS: Vec<DetectionPattern> = vec![
        DetectionPattern::new(
            "quantity_unit",
            r"(?i)\d+(?:[.,]\d+)?\s*(?:g|kg|ml|cl|l|cuillères?|cuilleres?|tasses?|pincées?)\s+(?:de\s+|d')[^,.\n]{3,60}",
            0,
            false,
        ),
        DetectionPattern::new(
            "counted_pieces",
            r"(?i)\d+(?:[.,]\d+)?\s+(?:gousses?|cuisses?|blancs?|filets?|tranches?)\s+(?:d'|de\s+)?[^,.\n]{3,40}",
            0,
            false,
        ),
        DetectionPattern::new(
            "counted_vegetables",
            r"(?i)\d+(?:[.,]\d+)?\s+(?:œufs?|oeufs?|carottes?|oignons?|tomates?|pommes?\s+de\s+terre|patates?|courgettes?|aubergines?)\b",
            0,
            false,
        ),
        DetectionPattern::new(
            "partitive",
            r"(?i)\b(?:du\s+|de\s+la\s+|de\s+l'|des\s+)[^,.\n]{3,40}",
            0,
            true,
        ),
        DetectionPattern::new(
            "action_phrase",
            &format!(
                r"(?i)(?:on\s+va\s+|on\s+|nous\s+allons\s+)?(?:utiliser|prendre|mettre|ajouter|avoir\s+besoin\s+d(?:e|'))\s*({}[^,.\n]{{3,40}})",
                QUANTITY_PREFIX
            ),
            1,
            true,
        ),
        DetectionPattern::new(
            "need_phrase",
            &format!(
                r"(?i)(?:il\s+(?:nous\s+|vous\s+)?faut|faudra)\s+({}[^,.\n]{{3,40}})",
                QUANTITY_PREFIX
            ),
            1,
            true,
        ),
    ];
}

/// Scan `text` for ingredient-like fragments.
///
/// `text` should be normalized line by line; the loose patterns stop at line ends.
/// Results are in scan order and may contain duplicates.
pub fn detect_ingredients(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    for pattern in DETECTION_PATTERNS.iter() {
        for captures in pattern.regex.captures_iter(text) {
            let Some(m) = captures.get(pattern.group) else {
                continue;
            };
            let candidate = m.as_str().trim();
            if candidate.is_empty() {
                continue;
            }
            if pattern.gated && !looks_like_ingredient(candidate) {
                trace!(pattern = pattern.name, candidate = %candidate, "Rejected loose candidate");
                continue;
            }
            trace!(pattern = pattern.name, candidate = %candidate, "Detected ingredient candidate");
            found.push(candidate.to_string());
        }
    }

    found
}
