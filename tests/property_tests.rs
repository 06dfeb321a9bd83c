#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;
    use proptest::prelude::*;
    use regex::Regex;
    use recipe_importer::config::ParserConfig;
    use recipe_importer::metadata_extraction::extract_yields;
    use recipe_importer::name_cleaner::clean_product_name;
    use recipe_importer::section_extractor::extract_ingredients;
    use recipe_importer::text_normalizer::normalize;
    use recipe_importer::unit_lexicon::{aliases_longest_first, is_canonical_key};
    use recipe_importer::parse_ingredient_line;
    use std::collections::HashSet;

    lazy_static! {
        static ref YIELDS_SHAPE: Regex = Regex::new(r"^\d+ portions$").unwrap();
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(text in "[a-zA-Zéèàçô0-9 #@'’.,!?%°€\n\t-]{0,120}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn parsing_is_total(phrase in "[a-zA-Zéèàç0-9 ,./'½-]{0,60}") {
            let parsed = parse_ingredient_line(&phrase);
            prop_assert!(parsed.amount.is_finite() && parsed.amount > 0.0);
            prop_assert!(is_canonical_key(&parsed.unit), "unit {:?}", parsed.unit);
            prop_assert!(!parsed.product_name.trim().is_empty());
            prop_assert_eq!(parsed.original, phrase);
        }

        #[test]
        fn known_unit_prefix_gives_canonical_unit(
            amount in 1u32..1000,
            alias_index in 0usize..64,
            product in "[a-z]{3,12}",
        ) {
            let aliases = aliases_longest_first();
            let alias = aliases[alias_index % aliases.len()];
            let parsed = parse_ingredient_line(&format!("{} {} {}", amount, alias, product));
            prop_assert_eq!(parsed.amount, f64::from(amount));
            prop_assert!(is_canonical_key(&parsed.unit), "unit {:?}", parsed.unit);
        }

        #[test]
        fn cleaning_is_idempotent(raw in "[a-zàâçéèêëîïôûùœßﬁ' -]{0,40}") {
            let once = clean_product_name(&raw);
            prop_assert_eq!(clean_product_name(&once), once);
        }

        #[test]
        fn ingredients_are_unique_and_capped(
            lines in prop::collection::vec("[a-z0-9 ,]{0,30}", 0..60)
        ) {
            let text = format!("Ingrédients :\n{}", lines.join("\n"));
            let ingredients = extract_ingredients(&text);
            prop_assert!(ingredients.len() <= 30);
            let unique: HashSet<&String> = ingredients.iter().collect();
            prop_assert_eq!(unique.len(), ingredients.len());
        }

        #[test]
        fn yields_always_count_portions(text in "[a-zA-Z0-9 ]{0,80}") {
            let yields = extract_yields(&text, &ParserConfig::default());
            prop_assert!(YIELDS_SHAPE.is_match(&yields), "yields {:?}", yields);
        }
    }
}
