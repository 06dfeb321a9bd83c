//! # Catalog Matcher
//!
//! Matches parsed ingredients against an external product catalog. The matcher is pure:
//! it looks up existing products and units, or describes the unit to create. Writes go
//! through the [`CatalogStore`] trait, implemented by the real catalog client and by
//! [`InMemoryCatalog`] for dry runs and tests.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::unit_lexicon::{catalog_variants, display_names};

/// A product known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_plural: Option<String>,
}

/// A quantity unit known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogUnit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_plural: Option<String>,
}

/// Names for a unit that the catalog does not know yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCreationPlan {
    pub singular: String,
    pub plural: String,
}

/// Outcome of matching a canonical unit key against the catalog units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitResolution {
    Existing(i64),
    Create(UnitCreationPlan),
}

/// Link between a recipe and one of its ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLink {
    pub recipe_id: i64,
    pub product_id: i64,
    pub unit_id: i64,
    pub amount: f64,
    /// Original ingredient phrase
    pub note: String,
}

/// A recipe stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecipe {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub base_servings: u32,
}

/// Find the catalog unit for a canonical key, or plan its creation.
///
/// A unit matches when its name or plural name equals one of the key's catalog
/// variants, ignoring case.
pub fn find_or_plan_unit(key: &str, units: &[CatalogUnit]) -> UnitResolution {
    match find_unit(key, units) {
        Some(id) => UnitResolution::Existing(id),
        None => {
            let (singular, plural) = display_names(key);
            UnitResolution::Create(UnitCreationPlan { singular, plural })
        }
    }
}

/// Id of the catalog unit matching a canonical key, if any
pub fn find_unit(key: &str, units: &[CatalogUnit]) -> Option<i64> {
    let variants = catalog_variants(key);
    let matches = |name: &str| {
        let name = name.trim().to_lowercase();
        variants.iter().any(|v| *v == name)
    };

    units
        .iter()
        .find(|unit| matches(&unit.name) || unit.name_plural.as_deref().is_some_and(|p| matches(p)))
        .map(|unit| unit.id)
}

/// Id of the product whose name equals `name`, ignoring case
pub fn find_product(name: &str, products: &[CatalogProduct]) -> Option<i64> {
    let wanted = name.trim().to_lowercase();
    products
        .iter()
        .find(|product| product.name.trim().to_lowercase() == wanted)
        .map(|product| product.id)
}

/// Unit to fall back on: the first unit named like a piece, else the first unit,
/// else `fallback_id`
pub fn default_unit_id(units: &[CatalogUnit], preferred_names: &[String], fallback_id: i64) -> i64 {
    units
        .iter()
        .find(|unit| {
            let name = unit.name.trim().to_lowercase();
            preferred_names.iter().any(|p| p.to_lowercase() == name)
        })
        .or_else(|| units.first())
        .map(|unit| unit.id)
        .unwrap_or(fallback_id)
}

/// Names compared the way the matcher compares them: trimmed, Unicode lowercase
fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Access to the external catalog.
///
/// Implementations perform the actual reads and writes; every call may fail with
/// [`AppError::Catalog`].
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn list_products(&self) -> AppResult<Vec<CatalogProduct>>;

    async fn list_units(&self) -> AppResult<Vec<CatalogUnit>>;

    /// Create a product whose stock is counted in `unit_id`, returning its id
    async fn create_product(&self, name: &str, unit_id: i64) -> AppResult<i64>;

    async fn create_unit(&self, singular: &str, plural: &str) -> AppResult<i64>;

    async fn create_ingredient_link(&self, link: &IngredientLink) -> AppResult<()>;

    async fn create_recipe(
        &self,
        name: &str,
        description: &str,
        base_servings: u32,
    ) -> AppResult<i64>;
}

#[derive(Debug, Default)]
struct CatalogState {
    next_id: i64,
    products: Vec<CatalogProduct>,
    units: Vec<CatalogUnit>,
    links: Vec<IngredientLink>,
    recipes: Vec<CatalogRecipe>,
}

impl CatalogState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Catalog kept in memory, used for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with units, e.g. `&[("Piece", "Pieces"), ("Gramme", "Grammes")]`
    pub fn with_units(units: &[(&str, &str)]) -> Self {
        let catalog = Self::new();
        {
            let mut state = catalog.state.lock();
            for (singular, plural) in units {
                let id = state.allocate_id();
                state.units.push(CatalogUnit {
                    id,
                    name: singular.to_string(),
                    name_plural: Some(plural.to_string()),
                });
            }
        }
        catalog
    }

    pub fn products(&self) -> Vec<CatalogProduct> {
        self.state.lock().products.clone()
    }

    pub fn units(&self) -> Vec<CatalogUnit> {
        self.state.lock().units.clone()
    }

    pub fn links(&self) -> Vec<IngredientLink> {
        self.state.lock().links.clone()
    }

    pub fn recipes(&self) -> Vec<CatalogRecipe> {
        self.state.lock().recipes.clone()
    }
}

impl CatalogStore for InMemoryCatalog {
    async fn list_products(&self) -> AppResult<Vec<CatalogProduct>> {
        Ok(self.products())
    }

    async fn list_units(&self) -> AppResult<Vec<CatalogUnit>> {
        Ok(self.units())
    }

    async fn create_product(&self, name: &str, unit_id: i64) -> AppResult<i64> {
        let mut state = self.state.lock();
        if state.products.iter().any(|p| same_name(&p.name, name)) {
            return Err(AppError::Catalog(format!("Product '{}' already exists", name)));
        }
        if !state.units.iter().any(|u| u.id == unit_id) {
            return Err(AppError::Catalog(format!("Unknown unit id {}", unit_id)));
        }
        let id = state.allocate_id();
        state.products.push(CatalogProduct {
            id,
            name: name.to_string(),
            name_plural: None,
        });
        debug!(product_id = id, name = %name, "Created product");
        Ok(id)
    }

    async fn create_unit(&self, singular: &str, plural: &str) -> AppResult<i64> {
        let mut state = self.state.lock();
        if state.units.iter().any(|u| same_name(&u.name, singular)) {
            return Err(AppError::Catalog(format!("Unit '{}' already exists", singular)));
        }
        let id = state.allocate_id();
        state.units.push(CatalogUnit {
            id,
            name: singular.to_string(),
            name_plural: Some(plural.to_string()),
        });
        debug!(unit_id = id, name = %singular, "Created unit");
        Ok(id)
    }

    async fn create_ingredient_link(&self, link: &IngredientLink) -> AppResult<()> {
        let mut state = self.state.lock();
        if !state.recipes.iter().any(|r| r.id == link.recipe_id) {
            return Err(AppError::Catalog(format!("Unknown recipe id {}", link.recipe_id)));
        }
        if !state.products.iter().any(|p| p.id == link.product_id) {
            return Err(AppError::Catalog(format!("Unknown product id {}", link.product_id)));
        }
        state.links.push(link.clone());
        Ok(())
    }

    async fn create_recipe(
        &self,
        name: &str,
        description: &str,
        base_servings: u32,
    ) -> AppResult<i64> {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        state.recipes.push(CatalogRecipe {
            id,
            name: name.to_string(),
            description: description.to_string(),
            base_servings,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: i64, name: &str, plural: Option<&str>) -> CatalogUnit {
        CatalogUnit {
            id,
            name: name.to_string(),
            name_plural: plural.map(str::to_string),
        }
    }

    #[test]
    fn test_find_existing_unit_by_variant() {
        let units = vec![unit(1, "Pièce", None), unit(2, "Grammes", None)];
        assert_eq!(find_or_plan_unit("g", &units), UnitResolution::Existing(2));
        assert_eq!(find_or_plan_unit("piece", &units), UnitResolution::Existing(1));
    }

    #[test]
    fn test_find_unit_by_plural_name() {
        let units = vec![unit(7, "c.s.", Some("Cuillères à soupe"))];
        assert_eq!(find_unit("cuillère à soupe", &units), Some(7));
    }

    #[test]
    fn test_plan_unit_creation() {
        assert_eq!(
            find_or_plan_unit("cuillère à soupe", &[]),
            UnitResolution::Create(UnitCreationPlan {
                singular: "Cuillère à soupe".to_string(),
                plural: "Cuillères à soupe".to_string(),
            })
        );
        assert_eq!(
            find_or_plan_unit("poignée", &[]),
            UnitResolution::Create(UnitCreationPlan {
                singular: "Poignée".to_string(),
                plural: "Poignées".to_string(),
            })
        );
    }

    #[test]
    fn test_find_product_case_insensitive() {
        let products = vec![CatalogProduct {
            id: 3,
            name: "Farine".to_string(),
            name_plural: None,
        }];
        assert_eq!(find_product("farine", &products), Some(3));
        assert_eq!(find_product("FARINE ", &products), Some(3));
        assert_eq!(find_product("Farine de Blé", &products), None);
    }

    #[test]
    fn test_default_unit_id() {
        let names: Vec<String> = vec!["pièce".to_string(), "piece".to_string()];
        let units = vec![unit(4, "Gramme", None), unit(9, "Pièce", None)];
        assert_eq!(default_unit_id(&units, &names, 1), 9);
        assert_eq!(default_unit_id(&units[..1], &names, 1), 4);
        assert_eq!(default_unit_id(&[], &names, 1), 1);
    }

    #[tokio::test]
    async fn test_in_memory_catalog_rejects_duplicates() {
        let catalog = InMemoryCatalog::with_units(&[("Piece", "Pieces")]);
        let unit_id = catalog.units()[0].id;

        let id = catalog.create_product("Farine", unit_id).await.unwrap();
        assert!(catalog.create_product("farine", unit_id).await.is_err());
        assert!(catalog.create_unit("piece", "pieces").await.is_err());
        assert_eq!(catalog.list_products().await.unwrap()[0].id, id);

        catalog.create_product("Écrasé de Pommes", unit_id).await.unwrap();
        assert!(catalog.create_product("écrasé de pommes", unit_id).await.is_err());
        catalog.create_unit("Pincée", "Pincées").await.unwrap();
        assert!(catalog.create_unit("PINCÉE", "PINCÉES").await.is_err());
    }
}
