//! Observability setup: structured logging and metrics recording.
//!
//! This module provides:
//! - Tracing subscriber initialization (pretty or JSON output, env filter)
//! - Metrics recording functions for extraction, ingredient parsing and catalog calls
//!
//! Metrics go through the `metrics` facade; without an installed recorder they are no-ops.

use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::prelude::*;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize tracing with an explicit configuration
pub fn init_tracing_with_config(config: &LoggingConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid logging configuration: {}", e))?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("recipe_importer={}", config.level.to_lowercase()).parse()?)
        .add_directive(format!("debug_parser={}", config.level.to_lowercase()).parse()?);

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
    Ok(())
}

/// Record text processing metrics for one extraction operation
pub fn record_text_processing_metrics(
    operation: &str,
    duration: Duration,
    text_length: usize,
    line_count: usize,
    matches_found: usize,
) {
    let operation = operation.to_string();
    metrics::counter!("text_processing_operations_total", "operation" => operation.clone())
        .increment(1);
    metrics::histogram!("text_processing_duration_seconds", "operation" => operation.clone())
        .record(duration.as_secs_f64());
    metrics::histogram!("text_processing_input_length", "operation" => operation.clone())
        .record(text_length as f64);
    metrics::histogram!("text_processing_line_count", "operation" => operation.clone())
        .record(line_count as f64);
    metrics::histogram!("text_processing_matches_found", "operation" => operation)
        .record(matches_found as f64);
}

/// Record which strategy decomposed an ingredient phrase
pub fn record_ingredient_parse_metrics(strategy: &str) {
    metrics::counter!("ingredient_parse_strategy_total", "strategy" => strategy.to_string())
        .increment(1);
}

/// Record the outcome of a catalog store call
pub fn record_catalog_metrics(operation: &str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };
    metrics::counter!(
        "catalog_operations_total",
        "operation" => operation.to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("catalog_operation_duration_seconds", "operation" => operation.to_string())
        .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        record_text_processing_metrics("extract_ingredients", Duration::from_millis(2), 120, 4, 3);
        record_ingredient_parse_metrics("leading_quantity");
        record_catalog_metrics("create_unit", false, Duration::from_millis(1));
    }

    #[test]
    fn test_init_tracing_rejects_invalid_level() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            format: LogFormat::Pretty,
        };
        assert!(init_tracing_with_config(&config).is_err());
    }
}
