//! Title, yields and total-time extraction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::config::ParserConfig;

lazy_static! {
    static ref TITLE_PATTERNS: Vec<Regex> = [
        r"(?i)recette\s+de\s+([^.\n]+)",
        r"(?i)comment\s+faire\s+([^.\n]+)",
        r"(?i)faire\s+des?\s+([^.\n]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Title pattern should be valid"))
    .collect();
    static ref YIELDS_PATTERNS: Vec<Regex> = [
        r"(?i)\bpour\s+(\d+)\s+personnes?\b",
        r"(?i)\b(\d+)\s+portions?\b",
        r"(?i)\b(\d+)\s+parts?\b",
        r"(?i)\b(\d+)\s+servings?\b",
        r"(?i)\bserves?\s+(\d+)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Yields pattern should be valid"))
    .collect();
    static ref HOURS_REGEX: Regex = Regex::new(
        r"(?i)\b(\d+)\s*(?:heures?|h)(?:\s*(\d{1,2})(?:\s*(?:minutes?|mins?))?)?\b"
    )
    .expect("Hours pattern should be valid");
    static ref MINUTES_REGEX: Regex =
        Regex::new(r"(?i)\b(\d+)\s*(?:minutes?|mins?)\b").expect("Minutes pattern should be valid");
}

/// Pick a title for the recipe.
///
/// The first non-blank caption line wins when it is short and not a hashtag list.
/// Otherwise "recette de X", "comment faire X" and "faire des X" are looked up in the
/// caption and transcription. The placeholder title is the last resort.
pub fn extract_title(caption: &str, transcription: &str, config: &ParserConfig) -> String {
    if let Some(first_line) = caption.lines().map(str::trim).find(|l| !l.is_empty()) {
        let short = first_line.chars().count() < config.max_title_length;
        let hashtags = first_line.matches('#').count();
        if short && hashtags < config.max_title_hashtags {
            trace!(title = %first_line, "Using first caption line as title");
            return first_line.to_string();
        }
    }

    let full_text = format!("{} {}", caption, transcription);
    for pattern in TITLE_PATTERNS.iter() {
        let Some(capture) = pattern.captures(&full_text).and_then(|c| c.get(1)) else {
            continue;
        };
        let title = capture.as_str().trim();
        if !title.is_empty() && title.chars().count() < config.max_title_length {
            debug!(title = %title, "Title taken from a recipe phrase");
            return capitalize(title);
        }
    }

    debug!("No title found, using placeholder");
    config.placeholder_title.clone()
}

/// Serving count as `"N portions"`, defaulting to the configured servings
pub fn extract_yields(text: &str, config: &ParserConfig) -> String {
    for pattern in YIELDS_PATTERNS.iter() {
        let servings = pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok());
        if let Some(servings) = servings {
            return format!("{} portions", servings);
        }
    }
    config.default_yields()
}

/// Total time in minutes. "1h30" and "2 heures" are read before bare minutes.
pub fn extract_total_time(text: &str) -> Option<u32> {
    if let Some(total) = HOURS_REGEX.captures(text).and_then(|c| hours_and_minutes(&c)) {
        return Some(total);
    }

    MINUTES_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Minutes from an hours capture, `None` when a number overflows
fn hours_and_minutes(captures: &regex::Captures<'_>) -> Option<u32> {
    let hours = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let minutes = match captures.get(2) {
        Some(m) => m.as_str().parse::<u32>().ok()?,
        None => 0,
    };
    hours.checked_mul(60)?.checked_add(minutes)
}

/// First character uppercase, the rest lowercase
fn capitalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
