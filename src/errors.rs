//! # Application Error Types
//!
//! This module defines the error types shared by the recipe parser and the catalog importer.
//! Parsing itself never fails; errors come from configuration, I/O and the catalog store.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Validation errors (import inputs, config values, etc.)
    Validation(String),
    /// Catalog store errors (listing, creating products/units/links)
    Catalog(String),
    /// File system errors
    FileSystem(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Catalog(msg) => write!(f, "[CATALOG] {}", msg),
            AppError::FileSystem(msg) => write!(f, "[FILESYSTEM] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileSystem(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the crate
pub mod error_logging {
    use tracing::{error, warn};

    /// Log catalog store errors with the ingredient being imported
    pub fn log_catalog_error(
        error: &impl std::fmt::Display,
        operation: &str,
        recipe_id: Option<i64>,
        ingredient: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            recipe_id = ?recipe_id,
            ingredient = ?ingredient.map(|v| if v.chars().count() > 100 { format!("{}...", v.chars().take(100).collect::<String>()) } else { v.to_string() }),
            "Catalog operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }

    /// Log a recipe whose extraction produced a poor result
    pub fn log_parse_quality(title: &str, ingredient_count: usize, warnings: &[String]) {
        warn!(
            title = %title,
            ingredient_count = %ingredient_count,
            warnings = ?warnings,
            "Recipe extraction quality is low"
        );
    }
}
