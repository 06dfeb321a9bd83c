//! # Recipe Parser
//!
//! Assembles a [`StructuredRecipe`] from a caption and an optional transcription:
//! title, ingredient phrases, instructions, yields and total time. Parsing never fails;
//! poor results are reported as [`QualityWarning`]s.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::errors::AppResult;
use crate::metadata_extraction::{extract_title, extract_total_time, extract_yields};
use crate::model::{RawRecipeText, StructuredRecipe};
use crate::section_extractor::{extract_ingredients_with_config, extract_instructions_with_config};

/// Ingredient count below which a recipe is considered poorly extracted
pub const LOW_INGREDIENT_COUNT: usize = 3;

/// Signals that an extraction probably missed something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityWarning {
    NoIngredients,
    FewIngredients,
    NoInstructions,
    PlaceholderTitle,
}

impl QualityWarning {
    pub fn message(&self) -> &'static str {
        match self {
            QualityWarning::NoIngredients => "no ingredient found",
            QualityWarning::FewIngredients => "fewer than 3 ingredients found",
            QualityWarning::NoInstructions => "no instructions found",
            QualityWarning::PlaceholderTitle => "no title found, placeholder used",
        }
    }
}

/// Recipe parser holding the extraction thresholds
#[derive(Debug, Clone, Default)]
pub struct RecipeParser {
    config: ParserConfig,
}

impl RecipeParser {
    /// Parser with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser with custom thresholds, validated first
    pub fn with_config(config: ParserConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Extract a structured recipe from raw text
    pub fn parse(&self, raw: &RawRecipeText) -> StructuredRecipe {
        let start_time = Instant::now();
        let full_text = raw.combined_text();

        let title = extract_title(&raw.caption, &raw.transcription, &self.config);
        let ingredients = extract_ingredients_with_config(&full_text, &self.config);
        let instructions = extract_instructions_with_config(&full_text, &self.config);
        let yields = extract_yields(&full_text, &self.config);
        let total_time_minutes = extract_total_time(&full_text);
        let source_excerpt = raw
            .caption
            .chars()
            .take(self.config.source_excerpt_chars)
            .collect();

        let recipe = StructuredRecipe {
            title,
            ingredients,
            instructions,
            yields,
            total_time_minutes,
            source_excerpt,
        };

        info!(
            title = %recipe.title,
            ingredient_count = recipe.ingredients.len(),
            instructions_length = recipe.instructions.chars().count(),
            yields = %recipe.yields,
            total_time_minutes = ?recipe.total_time_minutes,
            "Recipe extracted"
        );

        let warnings = self.quality_warnings(&recipe);
        if !warnings.is_empty() {
            let messages: Vec<String> = warnings.iter().map(|w| w.message().to_string()).collect();
            crate::errors::error_logging::log_parse_quality(
                &recipe.title,
                recipe.ingredients.len(),
                &messages,
            );
        }

        crate::observability::record_text_processing_metrics(
            "parse_recipe",
            start_time.elapsed(),
            full_text.len(),
            full_text.lines().count(),
            recipe.ingredients.len(),
        );

        recipe
    }

    /// Quality signals for an extracted recipe
    pub fn quality_warnings(&self, recipe: &StructuredRecipe) -> Vec<QualityWarning> {
        let mut warnings = Vec::new();

        if recipe.ingredients.is_empty() {
            warnings.push(QualityWarning::NoIngredients);
        } else if recipe.ingredients.len() < LOW_INGREDIENT_COUNT {
            warnings.push(QualityWarning::FewIngredients);
        }

        if recipe.instructions.trim().is_empty() {
            warnings.push(QualityWarning::NoInstructions);
        }

        if recipe.title == self.config.placeholder_title {
            warnings.push(QualityWarning::PlaceholderTitle);
        }

        debug!(warnings = ?warnings, "Computed quality warnings");
        warnings
    }
}

/// Parse a caption and transcription with the default thresholds
pub fn parse_recipe(caption: &str, transcription: &str) -> StructuredRecipe {
    RecipeParser::new().parse(&RawRecipeText::new(caption, transcription))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    #[test]
    fn test_with_config_validates() {
        let invalid = ParserConfig {
            default_servings: 0,
            ..ParserConfig::default()
        };
        assert!(RecipeParser::with_config(invalid).is_err());
    }

    #[test]
    fn test_with_config_rejects_cap_above_thirty() {
        let too_many = ParserConfig {
            max_ingredients: 50,
            ..ParserConfig::default()
        };
        assert!(RecipeParser::with_config(too_many).is_err());
    }

    #[test]
    fn test_source_excerpt_is_truncated() {
        let caption = "é".repeat(600);
        let recipe = parse_recipe(&caption, "");
        assert_eq!(recipe.source_excerpt.chars().count(), 500);
    }

    #[test]
    fn test_quality_warnings_for_empty_input() {
        let parser = RecipeParser::new();
        let recipe = parser.parse(&RawRecipeText::default());
        assert_eq!(recipe.title, "Recette Instagram");
        assert_eq!(recipe.yields, "4 portions");
        assert_eq!(
            parser.quality_warnings(&recipe),
            vec![
                QualityWarning::NoIngredients,
                QualityWarning::NoInstructions,
                QualityWarning::PlaceholderTitle,
            ]
        );
    }

    #[test]
    fn test_custom_placeholder_and_servings() {
        let parser = RecipeParser::with_config(ParserConfig {
            placeholder_title: "Sans titre".to_string(),
            default_servings: 2,
            ..ParserConfig::default()
        })
        .unwrap();
        let recipe = parser.parse(&RawRecipeText::new("", "on mélange tout"));
        assert_eq!(recipe.title, "Sans titre");
        assert_eq!(recipe.yields, "2 portions");
    }
}
