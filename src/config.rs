//! # Application Configuration
//!
//! Parser thresholds, catalog defaults and logging settings. The parser section can be
//! loaded from a JSON file; the catalog and logging sections come from environment
//! variables. Every section has sensible defaults and a `validate()` method.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Upper bound on ingredient phrases kept per recipe
pub const MAX_INGREDIENTS: usize = 30;

/// Thresholds used by the recipe extraction heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum number of ingredient phrases kept per recipe
    pub max_ingredients: usize,
    /// Candidates with more words than this are treated as sentences
    pub max_sentence_words: usize,
    /// An instructions candidate must be longer than this (in characters) to win
    pub min_instruction_length: usize,
    /// Whole text longer than this is used as instructions when no keyword matched
    pub min_fallback_text_length: usize,
    /// Number of characters of the whole text kept by that fallback
    pub fallback_instruction_chars: usize,
    /// Titles must be shorter than this (in characters)
    pub max_title_length: usize,
    /// Caption lines with this many `#` or more are not used as titles
    pub max_title_hashtags: usize,
    /// Serving count used when the text mentions none
    pub default_servings: u32,
    /// Title used when nothing better is found
    pub placeholder_title: String,
    /// Number of caption characters kept as the source excerpt
    pub source_excerpt_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_ingredients: MAX_INGREDIENTS,
            max_sentence_words: 8,
            min_instruction_length: 50,
            min_fallback_text_length: 100,
            fallback_instruction_chars: 1000,
            max_title_length: 100,
            max_title_hashtags: 3,
            default_servings: 4,
            placeholder_title: "Recette Instagram".to_string(),
            source_excerpt_chars: 500,
        }
    }
}

impl ParserConfig {
    /// Validate parser configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.max_ingredients == 0 || self.max_ingredients > MAX_INGREDIENTS {
            return Err(AppError::Config(format!(
                "max_ingredients must be between 1 and {}",
                MAX_INGREDIENTS
            )));
        }

        if self.max_sentence_words == 0 {
            return Err(AppError::Config(
                "max_sentence_words must be greater than 0".to_string(),
            ));
        }

        if self.fallback_instruction_chars == 0 {
            return Err(AppError::Config(
                "fallback_instruction_chars must be greater than 0".to_string(),
            ));
        }

        if self.max_title_length < 2 {
            return Err(AppError::Config(
                "max_title_length must be at least 2".to_string(),
            ));
        }

        if self.default_servings == 0 {
            return Err(AppError::Config(
                "default_servings must be greater than 0".to_string(),
            ));
        }

        if self.placeholder_title.trim().is_empty() {
            return Err(AppError::Config(
                "placeholder_title cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Default yields string, e.g. `"4 portions"`
    pub fn default_yields(&self) -> String {
        format!("{} portions", self.default_servings)
    }

    /// Read a parser configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ParserConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Load the parser configuration from `PARSER_CONFIG_PATH`, then from the default
/// locations, falling back to built-in defaults.
pub fn load_parser_config() -> ParserConfig {
    if let Ok(config_path) = env::var("PARSER_CONFIG_PATH") {
        info!(
            "Loading parser config from environment variable: {}",
            config_path
        );
        match ParserConfig::from_file(&config_path) {
            Ok(config) => {
                info!("Successfully loaded parser config from: {}", config_path);
                return config;
            }
            Err(e) => {
                crate::errors::error_logging::log_config_error(
                    &e,
                    "PARSER_CONFIG_PATH",
                    "load_parser_config",
                );
                warn!(
                    "Failed to load parser config from '{}'. Falling back to default paths.",
                    config_path
                );
            }
        }
    }

    let possible_paths = ["config/parser.json", "../config/parser.json"];

    for config_path in &possible_paths {
        if !Path::new(config_path).exists() {
            continue;
        }
        match ParserConfig::from_file(config_path) {
            Ok(config) => {
                info!(
                    "Successfully loaded parser config from fallback path: {}",
                    config_path
                );
                return config;
            }
            Err(e) => {
                warn!(
                    "Failed to load parser config at '{}': {}. Trying next path.",
                    config_path, e
                );
            }
        }
    }

    info!("No parser config file found, using built-in defaults");
    ParserConfig::default()
}

/// Catalog import settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Unit names treated as the generic "piece" unit when picking a default unit
    pub default_unit_names: Vec<String>,
    /// Unit id used when the catalog has no unit at all
    pub fallback_unit_id: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_unit_names: ["pièce", "piece", "unit", "pc", "pcs", "stück", "stk"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback_unit_id: 1,
        }
    }
}

impl CatalogConfig {
    /// Load catalog settings from `CATALOG_DEFAULT_UNIT_NAMES` (comma separated)
    /// and `CATALOG_FALLBACK_UNIT_ID`.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(names) = env::var("CATALOG_DEFAULT_UNIT_NAMES") {
            config.default_unit_names = names
                .split(',')
                .map(|n| n.trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect();
        }

        if let Ok(id) = env::var("CATALOG_FALLBACK_UNIT_ID") {
            config.fallback_unit_id = id.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "CATALOG_FALLBACK_UNIT_ID must be an integer, got '{}'",
                    id
                ))
            })?;
        }

        Ok(config)
    }

    /// Validate catalog configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.default_unit_names.is_empty() {
            return Err(AppError::Config(
                "default_unit_names cannot be empty".to_string(),
            ));
        }

        if self.fallback_unit_id <= 0 {
            return Err(AppError::Config(
                "fallback_unit_id must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for this crate's targets (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Load from `LOG_LEVEL` and `LOG_FORMAT` (`pretty` or `json`)
    pub fn from_env() -> Self {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }

    /// Validate logging configuration
    pub fn validate(&self) -> AppResult<()> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(AppError::Config(format!(
                "Invalid log level '{}'. Expected one of trace, debug, info, warn, error",
                other
            ))),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub parser: ParserConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load every section from the environment (and the parser config file)
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            parser: load_parser_config(),
            catalog: CatalogConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.parser.validate()?;
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parser.default_yields(), "4 portions");
    }

    #[test]
    fn test_parser_config_validation() {
        let config = ParserConfig {
            max_ingredients: 0,
            ..ParserConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = ParserConfig {
            max_ingredients: MAX_INGREDIENTS + 1,
            ..ParserConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        let config = ParserConfig {
            max_ingredients: MAX_INGREDIENTS,
            ..ParserConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = ParserConfig {
            placeholder_title: "  ".to_string(),
            ..ParserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parser_config_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_ingredients": 12, "placeholder_title": "Sans titre"}}"#).unwrap();

        let config = ParserConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_ingredients, 12);
        assert_eq!(config.placeholder_title, "Sans titre");
        assert_eq!(config.min_instruction_length, 50);
    }

    #[test]
    fn test_parser_config_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(ParserConfig::from_file(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_ingredients": 50}}"#).unwrap();
        assert!(matches!(
            ParserConfig::from_file(file.path()),
            Err(AppError::Config(_))
        ));

        assert!(matches!(
            ParserConfig::from_file("/definitely/not/here.json"),
            Err(AppError::FileSystem(_))
        ));
    }

    #[test]
    fn test_catalog_and_logging_validation() {
        let catalog = CatalogConfig {
            fallback_unit_id: 0,
            ..CatalogConfig::default()
        };
        assert!(catalog.validate().is_err());

        let logging = LoggingConfig {
            level: "loud".to_string(),
            format: LogFormat::Json,
        };
        assert!(logging.validate().is_err());
    }
}
