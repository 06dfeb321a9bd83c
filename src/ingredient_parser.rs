//! # Ingredient Line Parser
//!
//! Decomposes a free-text ingredient phrase into an amount, a canonical unit and a
//! product name. Parsing is total: every phrase yields a [`ParsedIngredientLine`].
//!
//! ## Strategies
//!
//! Tried in order, the first that succeeds wins:
//!
//! 1. **Leading quantity**: `200g de farine`, `1,5 l de lait`, `1/2 tasse de sucre`,
//!    `3 oeufs` (no unit means `piece`)
//! 2. **Partitive default**: `du beurre` is 10 g, `de l'huile` 5 cl, `des tomates` 1 piece
//! 3. **Keyword default**: a phrase mentioning `poivre` is 2 g, `thym` 1 piece
//! 4. **Fallback**: 1 piece
//!
//! Default quantities depend on the strategy that matched: `du sel` and `sel de
//! Guérande` both give 5 g, but `du poivre` falls through to the keyword table.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::ParsedIngredientLine;
use crate::name_cleaner::clean_product_name;
use crate::unit_lexicon::{aliases_longest_first, normalize_unit, PIECE};
use crate::vocabulary::whole_word_regex;

/// Product name used when the phrase has no usable text at all
pub const UNNAMED_PRODUCT: &str = "Produit sans nom";

/// Which rule produced a parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseStrategy {
    LeadingQuantity,
    PartitiveDefault,
    KeywordDefault,
    Fallback,
}

impl ParseStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::LeadingQuantity => "leading_quantity",
            ParseStrategy::PartitiveDefault => "partitive_default",
            ParseStrategy::KeywordDefault => "keyword_default",
            ParseStrategy::Fallback => "fallback",
        }
    }
}

type Strategy = fn(&str, &str) -> Option<ParsedIngredientLine>;

const STRATEGIES: &[(ParseStrategy, Strategy)] = &[
    (ParseStrategy::LeadingQuantity, leading_quantity),
    (ParseStrategy::PartitiveDefault, partitive_default),
    (ParseStrategy::KeywordDefault, keyword_default),
];

const PARTITIVE_PREFIX: &str = r"(?:du\s+|de\s+la\s+|de\s+l'|un\s+peu\s+d(?:e\s+|'))";

/// Nouns with a default quantity when introduced by a partitive article
const PARTITIVE_DEFAULTS: &[(&str, f64, &str)] = &[
    ("beurre", 10.0, "g"),
    ("cr[èe]me", 10.0, "cl"),
    ("lait", 10.0, "cl"),
    ("huile", 5.0, "cl"),
    ("sel", 5.0, "g"),
    ("sucre", 10.0, "g"),
    ("fromage", 50.0, "g"),
    ("farine", 50.0, "g"),
];

/// Keywords with a default quantity wherever they appear in the phrase
const KEYWORD_DEFAULTS: &[(&[&str], f64, &str)] = &[
    (&["huile"], 5.0, "cl"),
    (&["beurre"], 10.0, "g"),
    (&["crème", "creme"], 10.0, "cl"),
    (&["sel"], 5.0, "g"),
    (&["poivre"], 2.0, "g"),
    (&["laurier"], 1.0, PIECE),
    (&["thym"], 1.0, PIECE),
    (&["romarin"], 1.0, PIECE),
    (&["basilic"], 5.0, "g"),
    (&["persil"], 5.0, "g"),
    (&["coriandre"], 5.0, "g"),
    (&["ciboulette"], 5.0, "g"),
    (&["épice"], 2.0, "g"),
    (&["piment"], 1.0, PIECE),
    (&["ail"], 1.0, PIECE),
    (&["oignon"], 1.0, PIECE),
];

/// Build the leading-quantity pattern from the unit lexicon, longest aliases first
fn build_leading_quantity_pattern() -> String {
    let aliases = aliases_longest_first()
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r"(?i)^(?P<amount>\d+\s+\d+/\d+|\d+/\d+|\d+(?:[.,]\d+)?|[½¼¾⅓⅔])\s*(?:(?P<unit>{})s?(?:\s+|\b|$))?\s*",
        aliases
    )
}

lazy_static! {
    static ref LEADING_QUANTITY_REGEX: Regex = Regex::new(&build_leading_quantity_pattern())
        .expect("Leading quantity pattern should be valid");
    static ref PARTITIVE_DEFAULT_REGEXES: Vec<(Regex, f64, &'static str)> = PARTITIVE_DEFAULTS
        .iter()
        .map(|(noun, amount, unit)| {
            let pattern = format!(r"^{}\s*((?:{})s?\b.*)$", PARTITIVE_PREFIX, noun);
            (
                Regex::new(&pattern).expect("Partitive default pattern should be valid"),
                *amount,
                *unit,
            )
        })
        .collect();
    static ref UNSPECIFIED_COUNT_REGEX: Regex = Regex::new(r"^(?:des|quelques|plusieurs)\s+(.+)$")
        .expect("Unspecified count pattern should be valid");
    static ref KEYWORD_DEFAULT_REGEXES: Vec<(Regex, f64, &'static str)> = KEYWORD_DEFAULTS
        .iter()
        .map(|(words, amount, unit)| {
            (
                whole_word_regex(words, true).expect("Keyword default pattern should be valid"),
                *amount,
                *unit,
            )
        })
        .collect();
}

/// Parse an ingredient phrase into amount, unit and product name.
///
/// ```rust
/// use recipe_importer::ingredient_parser::parse_ingredient_line;
///
/// let parsed = parse_ingredient_line("200g de farine");
/// assert_eq!(parsed.amount, 200.0);
/// assert_eq!(parsed.unit, "g");
/// assert_eq!(parsed.product_name, "Farine");
/// ```
pub fn parse_ingredient_line(phrase: &str) -> ParsedIngredientLine {
    parse_ingredient_line_with_strategy(phrase).0
}

/// Parse an ingredient phrase and report which strategy matched
pub fn parse_ingredient_line_with_strategy(phrase: &str) -> (ParsedIngredientLine, ParseStrategy) {
    let lowered = phrase.trim().to_lowercase();

    let (mut parsed, strategy) = STRATEGIES
        .iter()
        .find_map(|(strategy, handler)| handler(phrase, &lowered).map(|p| (p, *strategy)))
        .unwrap_or_else(|| {
            (
                line(phrase, 1.0, PIECE, clean_product_name(phrase)),
                ParseStrategy::Fallback,
            )
        });

    if parsed.product_name.trim().is_empty() {
        parsed.product_name = UNNAMED_PRODUCT.to_string();
    }

    trace!(
        phrase = %phrase,
        strategy = strategy.as_str(),
        amount = parsed.amount,
        unit = %parsed.unit,
        product = %parsed.product_name,
        "Parsed ingredient line"
    );
    crate::observability::record_ingredient_parse_metrics(strategy.as_str());

    (parsed, strategy)
}

/// Parse a list of ingredient phrases
pub fn parse_ingredients(phrases: &[String]) -> Vec<ParsedIngredientLine> {
    phrases.iter().map(|p| parse_ingredient_line(p)).collect()
}

fn line(original: &str, amount: f64, unit: &str, product_name: String) -> ParsedIngredientLine {
    ParsedIngredientLine {
        amount,
        unit: unit.to_string(),
        product_name,
        original: original.to_string(),
    }
}

fn leading_quantity(original: &str, lowered: &str) -> Option<ParsedIngredientLine> {
    let captures = LEADING_QUANTITY_REGEX.captures(lowered)?;
    let amount = parse_amount(captures.name("amount")?.as_str())?;
    if !(amount.is_finite() && amount > 0.0) {
        return None;
    }

    let unit = captures
        .name("unit")
        .map(|m| normalize_unit(m.as_str()))
        .unwrap_or_else(|| PIECE.to_string());

    let remainder = lowered[captures.get(0)?.end()..].trim();
    let product_name = if remainder.is_empty() {
        clean_product_name(original)
    } else {
        clean_product_name(remainder)
    };

    Some(line(original, amount, &unit, product_name))
}

fn partitive_default(original: &str, lowered: &str) -> Option<ParsedIngredientLine> {
    for (regex, amount, unit) in PARTITIVE_DEFAULT_REGEXES.iter() {
        if let Some(noun_phrase) = regex.captures(lowered).and_then(|c| c.get(1)) {
            return Some(line(
                original,
                *amount,
                unit,
                clean_product_name(noun_phrase.as_str()),
            ));
        }
    }

    let rest = UNSPECIFIED_COUNT_REGEX.captures(lowered)?.get(1)?;
    Some(line(original, 1.0, PIECE, clean_product_name(rest.as_str())))
}

fn keyword_default(original: &str, lowered: &str) -> Option<ParsedIngredientLine> {
    KEYWORD_DEFAULT_REGEXES
        .iter()
        .find(|(regex, _, _)| regex.is_match(lowered))
        .map(|(_, amount, unit)| line(original, *amount, unit, clean_product_name(original)))
}

/// Parse "2", "1,5", "0.75", "1/2", "1 1/2" or a vulgar fraction into a number
fn parse_amount(text: &str) -> Option<f64> {
    match text {
        "½" => return Some(0.5),
        "¼" => return Some(0.25),
        "¾" => return Some(0.75),
        "⅓" => return Some(1.0 / 3.0),
        "⅔" => return Some(2.0 / 3.0),
        _ => {}
    }

    if text.contains('/') {
        let mut parts = text.split_whitespace();
        let first = parts.next()?;
        return match parts.next() {
            Some(fraction) => Some(first.parse::<f64>().ok()? + parse_fraction(fraction)?),
            None => parse_fraction(first),
        };
    }

    text.replace(',', ".").parse::<f64>().ok()
}

fn parse_fraction(text: &str) -> Option<f64> {
    let (numerator, denominator) = text.split_once('/')?;
    let numerator = numerator.parse::<f64>().ok()?;
    let denominator = denominator.parse::<f64>().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parsed(phrase: &str, amount: f64, unit: &str, product: &str) {
        let parsed = parse_ingredient_line(phrase);
        assert_eq!(parsed.amount, amount, "amount for {:?}", phrase);
        assert_eq!(parsed.unit, unit, "unit for {:?}", phrase);
        assert_eq!(parsed.product_name, product, "product for {:?}", phrase);
        assert_eq!(parsed.original, phrase);
    }

    #[test]
    fn test_leading_quantity_with_unit() {
        assert_parsed("200g de farine", 200.0, "g", "Farine");
        assert_parsed("1,5 l de lait", 1.5, "l", "Lait");
        assert_parsed("2 cuillères à soupe d'huile d'olive", 2.0, "cuillère à soupe", "Huile d'Olive");
        assert_parsed("1 c. à café de cannelle", 1.0, "cuillère à café", "Cannelle");
        assert_parsed("3 gousses d'ail", 3.0, PIECE, "Ail");
        assert_parsed("25 cl de crème", 25.0, "cl", "Crème");
    }

    #[test]
    fn test_leading_quantity_without_unit() {
        assert_parsed("3 oeufs", 3.0, PIECE, "Oeufs");
        assert_parsed("3 gros oeufs", 3.0, PIECE, "Gros Oeufs");
        assert_parsed("2 lardons fumés", 2.0, PIECE, "Lardons Fumés");
        assert_parsed("4", 4.0, PIECE, "4");
    }

    #[test]
    fn test_fractions() {
        assert_parsed("1/2 tasse de sucre", 0.5, "tasse", "Sucre");
        assert_parsed("1 1/2 kg de pommes", 1.5, "kg", "Pommes");
        assert_parsed("½ citron", 0.5, PIECE, "Citron");
    }

    #[test]
    fn test_zero_amount_falls_through() {
        let (parsed, strategy) = parse_ingredient_line_with_strategy("0 g de sel");
        assert_eq!(strategy, ParseStrategy::KeywordDefault);
        assert_eq!(parsed.amount, 5.0);
        assert_eq!(parsed.unit, "g");

        assert_eq!(parse_amount("1/0"), None);
    }

    #[test]
    fn test_partitive_defaults() {
        assert_parsed("du beurre", 10.0, "g", "Beurre");
        assert_parsed("de la crème fraîche", 10.0, "cl", "Crème Fraîche");
        assert_parsed("de l'huile", 5.0, "cl", "Huile");
        assert_parsed("un peu de sel", 5.0, "g", "Sel");
        assert_parsed("de la farine", 50.0, "g", "Farine");
        assert_parsed("du fromage râpé", 50.0, "g", "Fromage Râpé");
        assert_parsed("des champignons", 1.0, PIECE, "Champignons");
    }

    #[test]
    fn test_keyword_defaults() {
        assert_parsed("sel et poivre", 5.0, "g", "Sel et Poivre");
        assert_parsed("poivre noir", 2.0, "g", "Poivre Noir");
        assert_parsed("une feuille de laurier", 1.0, PIECE, "Feuille de Laurier");
        assert_parsed("persil frais", 5.0, "g", "Persil Frais");
        // whole words only: "travail" does not mention garlic
        let (_, strategy) = parse_ingredient_line_with_strategy("un travail");
        assert_eq!(strategy, ParseStrategy::Fallback);
    }

    #[test]
    fn test_fallback() {
        let (parsed, strategy) = parse_ingredient_line_with_strategy("chapelure");
        assert_eq!(strategy, ParseStrategy::Fallback);
        assert_eq!(parsed.amount, 1.0);
        assert_eq!(parsed.unit, PIECE);
        assert_eq!(parsed.product_name, "Chapelure");
    }

    #[test]
    fn test_empty_phrase_gets_placeholder_name() {
        let parsed = parse_ingredient_line("   ");
        assert_eq!(parsed.product_name, UNNAMED_PRODUCT);
        assert_eq!(parsed.amount, 1.0);
    }
}
