//! Line classifiers used while collecting ingredient candidates.
//!
//! The instruction-line and full-sentence gates are independent: a line can fail one,
//! both or neither.

use lazy_static::lazy_static;
use regex::Regex;

use crate::vocabulary::{
    whole_word_regex, ACTION_VERBS, CONJUGATED_VERBS, FOOD_WORDS, IMPERATIVE_VERBS,
    INSTRUCTION_FOOD_ITEMS, INSTRUCTION_PHRASES,
};

lazy_static! {
    static ref INSTRUCTION_PHRASE_REGEX: Regex = whole_word_regex(INSTRUCTION_PHRASES, false)
        .expect("Instruction phrase pattern should be valid");
    static ref IMPERATIVE_REGEX: Regex = Regex::new(&format!(
        r"(?i)^\s*(?:{})\b",
        IMPERATIVE_VERBS.join("|")
    ))
    .expect("Imperative verb pattern should be valid");
    static ref ACTION_VERB_REGEX: Regex =
        whole_word_regex(ACTION_VERBS, false).expect("Action verb pattern should be valid");
    static ref CONJUGATED_VERB_REGEX: Regex = whole_word_regex(CONJUGATED_VERBS, false)
        .expect("Conjugated verb pattern should be valid");
    static ref FOOD_WORD_REGEX: Regex =
        whole_word_regex(FOOD_WORDS, true).expect("Food word pattern should be valid");
    static ref INSTRUCTION_FOOD_REGEXES: Vec<(&'static str, Regex)> = INSTRUCTION_FOOD_ITEMS
        .iter()
        .map(|item| {
            (
                *item,
                whole_word_regex(&[*item], true).expect("Food item pattern should be valid"),
            )
        })
        .collect();
    static ref QUANTITY_UNIT_REGEX: Regex = Regex::new(
        r"(?i)\b\d+(?:[.,]\d+)?\s*(?:g|kg|mg|ml|cl|dl|l|cuillères?|cuilleres?|tasses?|pièces?|pincées?)\b"
    )
    .expect("Quantity pattern should be valid");
}

/// Whether a line reads like a cooking instruction rather than an ingredient
pub fn is_instruction_line(line: &str) -> bool {
    INSTRUCTION_PHRASE_REGEX.is_match(line) || IMPERATIVE_REGEX.is_match(line)
}

/// Whether a candidate is a spoken sentence: more than `max_words` words, or a
/// conjugated verb such as "fait" or "sont"
pub fn is_full_sentence(text: &str, max_words: usize) -> bool {
    text.split_whitespace().count() > max_words || CONJUGATED_VERB_REGEX.is_match(text)
}

/// Whether a loosely matched phrase plausibly names an ingredient
pub fn looks_like_ingredient(text: &str) -> bool {
    let length = text.chars().count();
    if !(3..=150).contains(&length) {
        return false;
    }

    if ACTION_VERB_REGEX.is_match(text) || IMPERATIVE_REGEX.is_match(text) {
        return false;
    }

    if QUANTITY_UNIT_REGEX.is_match(text) {
        return true;
    }

    FOOD_WORD_REGEX.is_match(text)
}

/// Food items mentioned in an instruction line, in table order
pub fn food_items_in(line: &str) -> Vec<String> {
    INSTRUCTION_FOOD_REGEXES
        .iter()
        .filter(|(_, re)| re.is_match(line))
        .map(|(item, _)| item.to_string())
        .collect()
}
