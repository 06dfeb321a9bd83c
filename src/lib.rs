//! # Recipe Importer
//!
//! Turns French recipe text from social-media posts (caption plus optional speech
//! transcription) into structured recipes, decomposes each ingredient phrase into
//! quantity, unit and product, and imports the result into a product catalog.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod importer;
pub mod ingredient_parser;
pub mod metadata_extraction;
pub mod model;
pub mod name_cleaner;
pub mod observability;
pub mod recipe_parser;
pub mod section_extractor;
pub mod text_normalizer;
pub mod unit_lexicon;
pub mod vocabulary;

// Re-export types for easier access
pub use catalog::{CatalogStore, InMemoryCatalog};
pub use errors::{AppError, AppResult};
pub use importer::{ImportReport, RecipeImporter};
pub use ingredient_parser::parse_ingredient_line;
pub use model::{ParsedIngredientLine, RawRecipeText, StructuredRecipe};
pub use recipe_parser::{parse_recipe, QualityWarning, RecipeParser};
