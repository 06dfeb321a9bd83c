//! # Unit Lexicon
//!
//! Static table of measurement units used in French recipes. Each entry maps a set of
//! written aliases ("cuillères à soupe", "c. à s", "cs"...) to a canonical key ("cuillère à
//! soupe"), and carries the singular/plural display names and the name variants used to
//! recognize the unit in a product catalog.
//!
//! Canonical keys: `g`, `kg`, `mg`, `ml`, `cl`, `dl`, `l`, `cuillère à soupe`,
//! `cuillère à café`, `tasse`, `pincée`, `piece`.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Canonical key of the generic count unit
pub const PIECE: &str = "piece";

/// One unit of the lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitEntry {
    pub key: &'static str,
    /// Written forms recognized in ingredient phrases, lowercase
    pub aliases: &'static [&'static str],
    pub singular: &'static str,
    pub plural: &'static str,
    /// Lowercase names under which a catalog may already know this unit
    pub catalog_variants: &'static [&'static str],
}

pub const UNITS: &[UnitEntry] = &[
    UnitEntry {
        key: "g",
        aliases: &["g", "gr", "gramme", "grammes", "gram", "grams"],
        singular: "Gramme",
        plural: "Grammes",
        catalog_variants: &["gramme", "grammes", "g"],
    },
    UnitEntry {
        key: "kg",
        aliases: &["kg", "kilo", "kilos", "kilogramme", "kilogrammes"],
        singular: "Kilogramme",
        plural: "Kilogrammes",
        catalog_variants: &["kilogramme", "kilogrammes", "kg"],
    },
    UnitEntry {
        key: "mg",
        aliases: &["mg", "milligramme", "milligrammes"],
        singular: "Milligramme",
        plural: "Milligrammes",
        catalog_variants: &["milligramme", "milligrammes", "mg"],
    },
    UnitEntry {
        key: "ml",
        aliases: &["ml", "millilitre", "millilitres"],
        singular: "Millilitre",
        plural: "Millilitres",
        catalog_variants: &["millilitre", "millilitres", "ml"],
    },
    UnitEntry {
        key: "cl",
        aliases: &["cl", "centilitre", "centilitres"],
        singular: "Centilitre",
        plural: "Centilitres",
        catalog_variants: &["centilitre", "centilitres", "cl"],
    },
    UnitEntry {
        key: "dl",
        aliases: &["dl", "décilitre", "décilitres", "decilitre", "decilitres"],
        singular: "Décilitre",
        plural: "Décilitres",
        catalog_variants: &["décilitre", "décilitres", "dl"],
    },
    UnitEntry {
        key: "l",
        aliases: &["l", "litre", "litres"],
        singular: "Litre",
        plural: "Litres",
        catalog_variants: &["litre", "litres", "l"],
    },
    UnitEntry {
        key: "cuillère à soupe",
        aliases: &[
            "cuillère à soupe",
            "cuillères à soupe",
            "cuillere a soupe",
            "cuilleres a soupe",
            "c. à soupe",
            "c. à s.",
            "c.à.s",
            "càs",
            "cs",
            "cuillère",
            "cuillères",
            "cuillere",
            "cuilleres",
            "c.",
        ],
        singular: "Cuillère à soupe",
        plural: "Cuillères à soupe",
        catalog_variants: &["cuillère à soupe", "cuillères à soupe", "cuillere a soupe"],
    },
    UnitEntry {
        key: "cuillère à café",
        aliases: &[
            "cuillère à café",
            "cuillères à café",
            "cuillere a cafe",
            "cuilleres a cafe",
            "c. à café",
            "c. à c.",
            "c.à.c",
            "càc",
            "cc",
        ],
        singular: "Cuillère à café",
        plural: "Cuillères à café",
        catalog_variants: &["cuillère à café", "cuillères à café", "cuillere a cafe"],
    },
    UnitEntry {
        key: "tasse",
        aliases: &["tasse", "tasses"],
        singular: "Tasse",
        plural: "Tasses",
        catalog_variants: &["tasse", "tasses"],
    },
    UnitEntry {
        key: "pincée",
        aliases: &["pincée", "pincées", "pincee", "pincees"],
        singular: "Pincée",
        plural: "Pincées",
        catalog_variants: &["pincée", "pincées", "pincee"],
    },
    UnitEntry {
        key: PIECE,
        aliases: &["pièce", "pièces", "piece", "pieces", "gousse", "gousses"],
        singular: "Piece",
        plural: "Pieces",
        catalog_variants: &["piece", "pieces", "pièce", "pièces"],
    },
];

lazy_static! {
    static ref ALIAS_INDEX: HashMap<&'static str, &'static UnitEntry> = {
        let mut index = HashMap::new();
        for entry in UNITS {
            for alias in entry.aliases {
                index.insert(*alias, entry);
            }
        }
        index
    };
    static ref KEY_INDEX: HashMap<&'static str, &'static UnitEntry> =
        UNITS.iter().map(|entry| (entry.key, entry)).collect();
}

/// Look up a lexicon entry by canonical key
pub fn entry(key: &str) -> Option<&'static UnitEntry> {
    KEY_INDEX.get(key).copied()
}

/// Whether `key` is one of the canonical unit keys
pub fn is_canonical_key(key: &str) -> bool {
    KEY_INDEX.contains_key(key)
}

/// Map a written unit token to its canonical key.
///
/// Lookup is case-insensitive and tolerates a trailing plural `s`. Unknown tokens are
/// returned unchanged.
///
/// ```rust
/// use recipe_importer::unit_lexicon::normalize_unit;
///
/// assert_eq!(normalize_unit("Cuillères"), "cuillère à soupe");
/// assert_eq!(normalize_unit("cc"), "cuillère à café");
/// assert_eq!(normalize_unit("gousses"), "piece");
/// assert_eq!(normalize_unit("bol"), "bol");
/// ```
pub fn normalize_unit(token: &str) -> String {
    let lowered = token.trim().to_lowercase();

    if let Some(entry) = ALIAS_INDEX.get(lowered.as_str()) {
        return entry.key.to_string();
    }

    if let Some(singular) = lowered.strip_suffix('s') {
        if let Some(entry) = ALIAS_INDEX.get(singular) {
            return entry.key.to_string();
        }
    }

    token.to_string()
}

/// Singular and plural display names for a unit.
///
/// Unknown keys get the capitalized key and the capitalized key plus `s`.
pub fn display_names(key: &str) -> (String, String) {
    match entry(key) {
        Some(entry) => (entry.singular.to_string(), entry.plural.to_string()),
        None => {
            let singular = capitalize(key);
            let plural = format!("{}s", singular);
            (singular, plural)
        }
    }
}

/// Lowercase names under which a catalog may store the unit
pub fn catalog_variants(key: &str) -> Vec<String> {
    match entry(key) {
        Some(entry) => entry
            .catalog_variants
            .iter()
            .map(|v| v.to_string())
            .collect(),
        None => vec![key.to_lowercase()],
    }
}

/// Every alias, longest first, for building alternation patterns
pub fn aliases_longest_first() -> Vec<&'static str> {
    let mut aliases: Vec<&'static str> = UNITS
        .iter()
        .flat_map(|entry| entry.aliases.iter().copied())
        .collect();
    aliases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    aliases.dedup();
    aliases
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_maps_to_its_key() {
        for entry in UNITS {
            for alias in entry.aliases {
                assert_eq!(normalize_unit(alias), entry.key, "alias {}", alias);
            }
        }
    }

    #[test]
    fn test_plural_and_case_tolerance() {
        assert_eq!(normalize_unit("KG"), "kg");
        assert_eq!(normalize_unit("kgs"), "kg");
        assert_eq!(normalize_unit("Tasses"), "tasse");
        assert_eq!(normalize_unit("c."), "cuillère à soupe");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        assert_eq!(normalize_unit("Poignée"), "Poignée");
        assert!(!is_canonical_key("poignée"));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(
            display_names("cuillère à soupe"),
            ("Cuillère à soupe".to_string(), "Cuillères à soupe".to_string())
        );
        assert_eq!(
            display_names(PIECE),
            ("Piece".to_string(), "Pieces".to_string())
        );
        assert_eq!(
            display_names("poignée"),
            ("Poignée".to_string(), "Poignées".to_string())
        );
    }

    #[test]
    fn test_catalog_variants() {
        assert_eq!(catalog_variants("g"), vec!["gramme", "grammes", "g"]);
        assert_eq!(catalog_variants("Bol"), vec!["bol"]);
    }

    #[test]
    fn test_aliases_sorted_longest_first() {
        let aliases = aliases_longest_first();
        assert_eq!(aliases.len(), UNITS.iter().map(|e| e.aliases.len()).sum::<usize>());
        for pair in aliases.windows(2) {
            assert!(pair[0].chars().count() >= pair[1].chars().count());
        }
    }
}
