//! # Section Extractor
//!
//! Locates the ingredients block and the instructions block in loosely structured
//! recipe text.
//!
//! ## Ingredients
//!
//! Anchors are tried in priority order ("ingrédients", "il faut", "vous aurez besoin",
//! "pour cette recette", "liste des courses", "il vous faut"). The first match of an
//! anchor opens a window that runs to the next blank line, section heading, `#` or the
//! end of the text. Window lines are cleaned and split into candidates. When no anchor
//! produces a usable candidate, [`auto_detection`] scans the whole text.
//!
//! ## Instructions
//!
//! Step keywords ("étapes", "préparation", ...) are tried in order; the first capture
//! long enough wins, with whole-text and short-capture fallbacks.

pub mod auto_detection;
pub mod classifiers;

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::text_normalizer::{normalize, normalize_preserving_lines};
use classifiers::{food_items_in, is_full_sentence, is_instruction_line};

const INGREDIENT_ANCHORS: &[&str] = &[
    r"ingr[ée]dients?",
    r"il\s+faut",
    r"vous\s+aurez\s+besoin(?:\s+de)?",
    r"pour\s+cette\s+recette",
    r"liste\s+des\s+courses",
    r"il\s+vous\s+faut",
];

const STEP_KEYWORDS: &[&str] = &[
    r"étapes?",
    r"préparation",
    r"instructions?",
    r"recette",
    r"procédure",
    r"réalisation",
    r"commencez\s+par",
    r"d'abord",
    r"ensuite",
];

lazy_static! {
    static ref ANCHOR_REGEXES: Vec<Regex> = INGREDIENT_ANCHORS
        .iter()
        .map(|anchor| {
            Regex::new(&format!(
                r"(?is)\b{}\s*:?\s*(.*?)(?:\n[ \t]*\n|préparation\s*:|recette\s*:|instructions?\s*:|étapes?\s*:|#|\z)",
                anchor
            ))
            .expect("Ingredient anchor pattern should be valid")
        })
        .collect();
    static ref STEP_REGEXES: Vec<Regex> = STEP_KEYWORDS
        .iter()
        .map(|keyword| {
            Regex::new(&format!(
                r"(?is)\b{}\b[:\s]*(.+?)(?:ingr[ée]dients?|#|\z)",
                keyword
            ))
            .expect("Step keyword pattern should be valid")
        })
        .collect();
    static ref BULLET_REGEX: Regex =
        Regex::new(r"^[-*•·–—]+\s*").expect("Bullet pattern should be valid");
    static ref SUB_HEADING_REGEX: Regex =
        Regex::new(r"^[\p{L}\s]+\s*:$").expect("Sub-heading pattern should be valid");
    static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(r"\([^)]*\)").expect("Parenthetical pattern should be valid");
    static ref CONJUNCTION_REGEX: Regex =
        Regex::new(r"(?i)\s+et\s+").expect("Conjunction pattern should be valid");
}

/// Extract ingredient phrases with the default thresholds
pub fn extract_ingredients(text: &str) -> Vec<String> {
    extract_ingredients_with_config(text, &ParserConfig::default())
}

/// Extract ingredient phrases: anchored windows first, automatic detection otherwise.
///
/// The result holds normalized phrases in discovery order, without exact duplicates,
/// and at most `config.max_ingredients` entries.
pub fn extract_ingredients_with_config(text: &str, config: &ParserConfig) -> Vec<String> {
    let start_time = Instant::now();

    let mut ingredients = Vec::new();
    for (index, anchor) in ANCHOR_REGEXES.iter().enumerate() {
        let Some(window) = anchor.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };

        let candidates = collect_window_candidates(window.as_str());
        ingredients = finalize_candidates(candidates, config);
        if !ingredients.is_empty() {
            debug!(
                anchor = INGREDIENT_ANCHORS[index],
                count = ingredients.len(),
                "Ingredients found under anchor"
            );
            break;
        }
        trace!(anchor = INGREDIENT_ANCHORS[index], "Anchor window held no usable line");
    }

    if ingredients.is_empty() {
        debug!("No usable ingredient anchor, falling back to automatic detection");
        let detected = auto_detection::detect_ingredients(&normalize_preserving_lines(text));
        ingredients = finalize_candidates(detected, config);
    }

    crate::observability::record_text_processing_metrics(
        "extract_ingredients",
        start_time.elapsed(),
        text.len(),
        text.lines().count(),
        ingredients.len(),
    );

    ingredients
}

/// Extract the instructions text with the default thresholds
pub fn extract_instructions(text: &str) -> String {
    extract_instructions_with_config(text, &ParserConfig::default())
}

/// Extract the instructions text.
///
/// Returns the first step-keyword capture longer than `config.min_instruction_length`.
/// Otherwise returns the start of the whole normalized text when it is long enough,
/// then the first short capture, then an empty string.
pub fn extract_instructions_with_config(text: &str, config: &ParserConfig) -> String {
    let start_time = Instant::now();
    let mut short_candidate: Option<String> = None;

    let mut instructions = None;
    for (index, step_regex) in STEP_REGEXES.iter().enumerate() {
        let Some(capture) = step_regex.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };

        let candidate = normalize(capture.as_str());
        if candidate.chars().count() > config.min_instruction_length {
            debug!(keyword = STEP_KEYWORDS[index], "Instructions found under step keyword");
            instructions = Some(candidate);
            break;
        }
        if short_candidate.is_none() && !candidate.is_empty() {
            short_candidate = Some(candidate);
        }
    }

    let instructions = instructions.unwrap_or_else(|| {
        let whole = normalize(text);
        if whole.chars().count() > config.min_fallback_text_length {
            debug!("No step keyword capture long enough, using the start of the text");
            whole.chars().take(config.fallback_instruction_chars).collect()
        } else {
            short_candidate.unwrap_or_default()
        }
    });

    crate::observability::record_text_processing_metrics(
        "extract_instructions",
        start_time.elapsed(),
        text.len(),
        text.lines().count(),
        usize::from(!instructions.is_empty()),
    );

    instructions
}

/// Turn the lines of an anchor window into raw candidates
fn collect_window_candidates(window: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    for raw_line in window.lines() {
        let line = raw_line.trim();
        if line.chars().count() < 2 {
            continue;
        }

        let line = BULLET_REGEX.replace(line, "");
        let line = line.trim();
        if SUB_HEADING_REGEX.is_match(line) {
            trace!(line = %line, "Skipping sub-heading");
            continue;
        }

        let line = PARENTHETICAL_REGEX.replace_all(line, "");
        let line = line.trim();
        if line.chars().count() < 2 {
            continue;
        }

        if is_instruction_line(line) {
            let items = food_items_in(line);
            trace!(line = %line, items = ?items, "Instruction line inside ingredient block");
            candidates.extend(items);
            continue;
        }

        candidates.extend(split_line(line));
    }

    candidates
}

/// Split an ingredient line on commas, else on the conjunction "et"
fn split_line(line: &str) -> Vec<String> {
    let parts: Vec<String> = if line.contains(',') {
        split_on_commas(line)
    } else if CONJUNCTION_REGEX.is_match(line) {
        CONJUNCTION_REGEX.split(line).map(str::to_string).collect()
    } else {
        vec![line.to_string()]
    };

    parts
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| part.chars().count() > 2)
        .collect()
}

/// Split on commas, except decimal commas such as "1,5 kg"
fn split_on_commas(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let decimal_comma = c == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(|next| next.is_ascii_digit());
        if c == ',' && !decimal_comma {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Normalize, filter, deduplicate and cap raw candidates
fn finalize_candidates(
    candidates: impl IntoIterator<Item = String>,
    config: &ParserConfig,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for candidate in candidates {
        let normalized = normalize(&candidate);
        if normalized.chars().count() <= 2 {
            continue;
        }
        if is_full_sentence(&normalized, config.max_sentence_words) {
            trace!(candidate = %normalized, "Dropping full sentence");
            continue;
        }
        if seen.insert(normalized.clone()) {
            result.push(normalized);
            if result.len() >= config.max_ingredients {
                break;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_window_with_bullets() {
        let text = "Ingrédients :\n- 3 oeufs\n- 50g de farine\n\nPréparation :\nMélanger.";
        assert_eq!(extract_ingredients(text), vec!["3 oeufs", "50g de farine"]);
    }

    #[test]
    fn test_line_splitting() {
        assert_eq!(
            split_line("sel, poivre, 1,5 kg de pommes"),
            vec!["sel", "poivre", "1,5 kg de pommes"]
        );
        assert_eq!(split_line("sel et poivre"), vec!["sel", "poivre"]);
        assert_eq!(split_line("200g de farine"), vec!["200g de farine"]);
    }

    #[test]
    fn test_window_skips_subheadings_and_parentheticals() {
        let candidates =
            collect_window_candidates("Pour la pâte :\n• 250 g de farine (T55)\nPour la garniture:\n* 2 pommes");
        assert_eq!(candidates, vec!["250 g de farine", "2 pommes"]);
    }

    #[test]
    fn test_instruction_line_contributes_food_items() {
        let text = "Il faut :\nfaire cuire le potiron dès le début avec de l'huile\n1 oignon";
        assert_eq!(extract_ingredients(text), vec!["potiron", "huile", "1 oignon"]);
    }

    #[test]
    fn test_empty_anchor_falls_through_to_next_anchor() {
        let text = "Ingrédients :\nPour la sauce :\n\nIl vous faut : 2 tomates, 1 oignon";
        assert_eq!(extract_ingredients(text), vec!["2 tomates", "1 oignon"]);
    }

    #[test]
    fn test_ingredient_cap() {
        let lines: Vec<String> = (1..=40).map(|i| format!("{} g de farine", i)).collect();
        let text = format!("Ingrédients :\n{}", lines.join("\n"));
        let ingredients = extract_ingredients(&text);
        assert_eq!(ingredients.len(), 30);
        assert_eq!(ingredients[0], "1 g de farine");
    }

    #[test]
    fn test_instructions_under_keyword() {
        let text = "Préparation : Mélanger la farine et les oeufs, puis cuire 20 minutes au four bien chaud.";
        assert_eq!(
            extract_instructions(text),
            "Mélanger la farine et les oeufs, puis cuire 20 minutes au four bien chaud."
        );
    }

    #[test]
    fn test_instructions_short_fallbacks() {
        let text = "Ingrédients :\n- 3 oeufs\n- 50g de farine\n\nPréparation :\nMélanger.";
        assert_eq!(extract_instructions(text), "Mélanger.");
        assert_eq!(extract_instructions("rien à voir"), "");
    }

    #[test]
    fn test_instructions_whole_text_fallback() {
        let text = "Aujourd'hui on se fait un petit plat tout simple avec ce qu'il reste dans le frigo, rien de compliqué, promis juré.";
        let instructions = extract_instructions(text);
        assert_eq!(instructions, normalize(text));
    }
}
