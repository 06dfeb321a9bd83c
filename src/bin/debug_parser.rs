//! Inspect what the recipe parser extracts from a caption and a transcription.
//!
//! Usage: `debug_parser [--json] [--dry-run] <caption-file> [transcription-file]`
//!
//! `--dry-run` also imports the recipe into an in-memory catalog and prints the report.

use anyhow::{Context, Result};
use recipe_importer::config::AppConfig;
use recipe_importer::ingredient_parser::parse_ingredient_line_with_strategy;
use recipe_importer::recipe_parser::LOW_INGREDIENT_COUNT;
use recipe_importer::{observability, InMemoryCatalog, RawRecipeText, RecipeImporter, RecipeParser};
use std::env;
use std::fs;
use tracing::info;

struct Options {
    json: bool,
    dry_run: bool,
    caption_path: String,
    transcription_path: Option<String>,
}

fn parse_args() -> Result<Options> {
    let mut json = false;
    let mut dry_run = false;
    let mut paths = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--dry-run" => dry_run = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow::anyhow!("Unknown option '{}'", flag));
            }
            _ => paths.push(arg),
        }
    }

    let mut paths = paths.into_iter();
    let caption_path = paths.next().ok_or_else(|| {
        anyhow::anyhow!("Usage: debug_parser [--json] [--dry-run] <caption-file> [transcription-file]")
    })?;

    Ok(Options {
        json,
        dry_run,
        caption_path,
        transcription_path: paths.next(),
    })
}

fn read_input(options: &Options) -> Result<RawRecipeText> {
    let caption = fs::read_to_string(&options.caption_path)
        .with_context(|| format!("Failed to read caption file {}", options.caption_path))?;
    let transcription = match &options.transcription_path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcription file {}", path))?,
        None => String::new(),
    };
    Ok(RawRecipeText::new(caption, transcription))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    observability::init_tracing_with_config(&config.logging)?;

    let options = parse_args()?;
    let raw = read_input(&options)?;
    info!(
        caption_length = raw.caption.len(),
        transcription_length = raw.transcription.len(),
        "Parsing recipe text"
    );

    let parser = RecipeParser::with_config(config.parser.clone())?;
    let recipe = parser.parse(&raw);
    let warnings = parser.quality_warnings(&recipe);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        println!("Titre       : {}", recipe.title);
        println!("Portions    : {}", recipe.yields);
        match recipe.total_time_minutes {
            Some(minutes) => println!("Temps total : {} min", minutes),
            None => println!("Temps total : non trouvé"),
        }
        println!();
        println!("Ingrédients ({}) :", recipe.ingredients.len());
        for phrase in &recipe.ingredients {
            let (parsed, strategy) = parse_ingredient_line_with_strategy(phrase);
            println!(
                "  - {:<40} => {} {} {} [{}]",
                phrase,
                parsed.amount,
                parsed.unit,
                parsed.product_name,
                strategy.as_str()
            );
        }
        println!();
        println!("Instructions :");
        println!("{}", recipe.instructions);
    }

    if !warnings.is_empty() {
        eprintln!();
        for warning in &warnings {
            eprintln!("Attention : {}", warning.message());
        }
    }
    if recipe.ingredients.len() < LOW_INGREDIENT_COUNT {
        eprintln!("Conseils :");
        eprintln!("  - vérifiez que la légende contient une section « Ingrédients : »");
        eprintln!("  - une ligne par ingrédient, avec quantité et unité (ex. « 200g de farine »)");
        eprintln!("  - ajoutez la transcription audio si la recette est seulement dictée");
    }

    if options.dry_run {
        let catalog = InMemoryCatalog::with_units(&[("Piece", "Pieces")]);
        let importer = RecipeImporter::new(catalog, config.catalog.clone());
        let report = importer.import_recipe(&recipe).await?;
        println!();
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
