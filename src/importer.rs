//! # Recipe Importer
//!
//! Writes a [`StructuredRecipe`] into a catalog through a [`CatalogStore`]:
//!
//! 1. snapshot the catalog products, then create the recipe with a Markdown description
//!    and its base servings
//! 2. for each ingredient phrase, parse it, resolve its unit (find, create, re-query,
//!    then default unit), find or create its product, and link it to the recipe
//!
//! Ingredients are processed one after the other. An ingredient whose product or link
//! cannot be written is skipped and reported; the import carries on.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::{
    default_unit_id, find_or_plan_unit, find_product, find_unit, CatalogProduct, CatalogStore,
    CatalogUnit, IngredientLink, UnitResolution,
};
use crate::config::CatalogConfig;
use crate::errors::error_logging::log_catalog_error;
use crate::errors::{AppError, AppResult};
use crate::ingredient_parser::parse_ingredient_line;
use crate::model::{ParsedIngredientLine, StructuredRecipe};
use crate::observability::record_catalog_metrics;

/// Servings used when the yields string carries no number
pub const DEFAULT_SERVINGS: u32 = 4;

lazy_static! {
    static ref FIRST_NUMBER_REGEX: Regex = Regex::new(r"\d+").expect("Number pattern should be valid");
}

/// An ingredient written to the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedIngredient {
    pub original: String,
    pub product_id: i64,
    pub product_created: bool,
    pub unit_id: i64,
    pub amount: f64,
}

/// An ingredient that could not be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedIngredient {
    pub original: String,
    pub reason: String,
}

/// Outcome of one recipe import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub recipe_id: i64,
    pub total: usize,
    pub linked: Vec<LinkedIngredient>,
    pub skipped: Vec<SkippedIngredient>,
}

impl ImportReport {
    /// Whether every ingredient was linked
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.linked.len() == self.total
    }
}

/// Markdown description stored with the recipe: servings and time, then instructions
pub fn format_description(recipe: &StructuredRecipe) -> String {
    let mut info_parts = vec![format!("**Portions :** {}", recipe.yields)];
    if let Some(minutes) = recipe.total_time_minutes {
        info_parts.push(format!("**Temps total :** {} min", minutes));
    }

    let mut parts = vec![info_parts.join(" | "), "\n".to_string()];
    if !recipe.instructions.trim().is_empty() {
        parts.push("## Instructions\n".to_string());
        parts.push(recipe.instructions.clone());
    }

    parts.join("\n")
}

/// Serving count from a yields string such as `"6 portions"`
pub fn servings_number(yields: &str, default: u32) -> u32 {
    FIRST_NUMBER_REGEX
        .find(yields)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

/// Run a catalog call and record its outcome
async fn observed<T>(operation: &str, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
    let start_time = Instant::now();
    let result = call.await;
    record_catalog_metrics(operation, result.is_ok(), start_time.elapsed());
    result
}

/// Imports structured recipes into a catalog
pub struct RecipeImporter<S> {
    store: S,
    config: CatalogConfig,
}

impl<S: CatalogStore> RecipeImporter<S> {
    pub fn new(store: S, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the recipe and link all of its ingredients.
    ///
    /// Fails only when the title is empty, or when the recipe itself or the product list
    /// cannot be obtained.
    pub async fn import_recipe(&self, recipe: &StructuredRecipe) -> AppResult<ImportReport> {
        if recipe.title.trim().is_empty() {
            return Err(AppError::Validation("Recipe title cannot be empty".to_string()));
        }

        let description = format_description(recipe);
        let servings = servings_number(&recipe.yields, DEFAULT_SERVINGS);

        // Snapshot first: a failed listing must not leave a recipe behind
        let mut products = observed("list_products", self.store.list_products())
            .await
            .inspect_err(|e| log_catalog_error(e, "list_products", None, Some(recipe.title.as_str())))?;

        let recipe_id = observed(
            "create_recipe",
            self.store.create_recipe(&recipe.title, &description, servings),
        )
        .await
        .inspect_err(|e| log_catalog_error(e, "create_recipe", None, Some(recipe.title.as_str())))?;

        info!(recipe_id, title = %recipe.title, servings, "Recipe created");

        let mut report = ImportReport {
            recipe_id,
            total: recipe.ingredients.len(),
            linked: Vec::new(),
            skipped: Vec::new(),
        };

        for phrase in &recipe.ingredients {
            let parsed = parse_ingredient_line(phrase);
            match self.import_ingredient(recipe_id, &parsed, &mut products).await {
                Ok(linked) => report.linked.push(linked),
                Err(e) => {
                    log_catalog_error(&e, "import_ingredient", Some(recipe_id), Some(phrase.as_str()));
                    report.skipped.push(SkippedIngredient {
                        original: phrase.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            recipe_id,
            linked = report.linked.len(),
            skipped = report.skipped.len(),
            total = report.total,
            "Recipe import finished"
        );

        Ok(report)
    }

    /// Catalog unit id for a canonical unit key.
    ///
    /// Looks the unit up, creates it when missing, re-queries when creation fails (another
    /// writer may have created it), and falls back to the default unit.
    pub async fn resolve_unit(&self, key: &str) -> i64 {
        let units = self.list_units_or_empty().await;

        let plan = match find_or_plan_unit(key, &units) {
            UnitResolution::Existing(id) => return id,
            UnitResolution::Create(plan) => plan,
        };

        match observed("create_unit", self.store.create_unit(&plan.singular, &plan.plural)).await {
            Ok(id) => {
                debug!(unit_id = id, key = %key, "Created unit");
                id
            }
            Err(e) => {
                warn!(error = %e, key = %key, "Unit creation failed, re-querying units");
                let refreshed = self.list_units_or_empty().await;
                find_unit(key, &refreshed).unwrap_or_else(|| {
                    let fallback = default_unit_id(
                        &refreshed,
                        &self.config.default_unit_names,
                        self.config.fallback_unit_id,
                    );
                    warn!(key = %key, unit_id = fallback, "Using default unit");
                    fallback
                })
            }
        }
    }

    async fn list_units_or_empty(&self) -> Vec<CatalogUnit> {
        observed("list_units", self.store.list_units())
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Could not list units");
                Vec::new()
            })
    }

    async fn import_ingredient(
        &self,
        recipe_id: i64,
        parsed: &ParsedIngredientLine,
        products: &mut Vec<CatalogProduct>,
    ) -> AppResult<LinkedIngredient> {
        let unit_id = self.resolve_unit(&parsed.unit).await;
        let (product_id, product_created) =
            self.find_or_create_product(&parsed.product_name, unit_id, products).await?;

        let link = IngredientLink {
            recipe_id,
            product_id,
            unit_id,
            amount: parsed.amount,
            note: parsed.original.clone(),
        };
        observed("create_ingredient_link", self.store.create_ingredient_link(&link)).await?;

        debug!(
            recipe_id,
            product_id,
            unit_id,
            amount = parsed.amount,
            "Ingredient linked"
        );

        Ok(LinkedIngredient {
            original: parsed.original.clone(),
            product_id,
            product_created,
            unit_id,
            amount: parsed.amount,
        })
    }

    async fn find_or_create_product(
        &self,
        name: &str,
        unit_id: i64,
        products: &mut Vec<CatalogProduct>,
    ) -> AppResult<(i64, bool)> {
        if let Some(id) = find_product(name, products) {
            return Ok((id, false));
        }

        match observed("create_product", self.store.create_product(name, unit_id)).await {
            Ok(id) => {
                products.push(CatalogProduct {
                    id,
                    name: name.to_string(),
                    name_plural: None,
                });
                Ok((id, true))
            }
            Err(e) => {
                warn!(error = %e, product = %name, "Product creation failed, re-querying products");
                let refreshed = observed("list_products", self.store.list_products()).await?;
                let found = find_product(name, &refreshed);
                *products = refreshed;
                found.map(|id| (id, false)).ok_or_else(|| {
                    AppError::Catalog(format!("Could not create product '{}': {}", name, e))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(instructions: &str, total_time_minutes: Option<u32>) -> StructuredRecipe {
        StructuredRecipe {
            title: "Crêpes".to_string(),
            ingredients: vec![],
            instructions: instructions.to_string(),
            yields: "6 portions".to_string(),
            total_time_minutes,
            source_excerpt: String::new(),
        }
    }

    #[test]
    fn test_format_description() {
        assert_eq!(
            format_description(&recipe("Mélanger.", Some(30))),
            "**Portions :** 6 portions | **Temps total :** 30 min\n\n\n## Instructions\n\nMélanger."
        );
        assert_eq!(
            format_description(&recipe("", None)),
            "**Portions :** 6 portions\n\n"
        );
    }

    #[test]
    fn test_servings_number() {
        assert_eq!(servings_number("6 portions", DEFAULT_SERVINGS), 6);
        assert_eq!(servings_number("Non spécifié", DEFAULT_SERVINGS), 4);
        assert_eq!(servings_number("0 portions", DEFAULT_SERVINGS), 4);
    }
}
