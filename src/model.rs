//! Data types flowing through the recipe pipeline.

use serde::{Deserialize, Serialize};

/// Raw text describing a recipe: a post caption plus an optional speech transcription
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecipeText {
    pub caption: String,
    #[serde(default)]
    pub transcription: String,
}

impl RawRecipeText {
    pub fn new(caption: impl Into<String>, transcription: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            transcription: transcription.into(),
        }
    }

    /// Caption and transcription joined by a blank line, trimmed
    pub fn combined_text(&self) -> String {
        format!("{}\n\n{}", self.caption, self.transcription)
            .trim()
            .to_string()
    }
}

/// A recipe extracted from free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecipe {
    /// Never empty
    pub title: String,
    /// Ingredient phrases in discovery order, without exact duplicates
    pub ingredients: Vec<String>,
    /// May be empty
    pub instructions: String,
    /// Always of the form `"N portions"`
    pub yields: String,
    pub total_time_minutes: Option<u32>,
    /// Leading part of the caption, kept for reference
    pub source_excerpt: String,
}

/// One ingredient phrase decomposed into quantity, unit and product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    /// Always strictly positive
    pub amount: f64,
    /// Canonical unit key from the unit lexicon
    pub unit: String,
    /// Display-cased product name, never empty
    pub product_name: String,
    /// The phrase as it was given
    pub original: String,
}
