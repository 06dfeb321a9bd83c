//! French cooking vocabulary shared by the extraction heuristics, plus a helper that
//! compiles a word list into one case-insensitive whole-word regex.

use regex::Regex;

/// Food words that make a loose phrase look like an ingredient
pub const FOOD_WORDS: &[&str] = &[
    // viandes et poissons
    "poulet", "boeuf", "bœuf", "porc", "veau", "agneau", "canard", "dinde", "jambon",
    "lardon", "bacon", "saucisse", "merguez", "steak", "viande", "poisson", "saumon",
    "thon", "cabillaud", "crevette", "moule",
    // morceaux
    "cuisse", "filet", "escalope", "côte", "aile", "blanc",
    // légumes
    "potiron", "citrouille", "courge", "pomme de terre", "pommes de terre", "patate",
    "carotte", "oignon", "échalote", "ail", "tomate", "courgette", "aubergine", "poivron",
    "champignon", "épinard", "salade", "poireau", "brocoli", "chou", "haricot", "petit pois",
    "concombre", "avocat", "navet", "radis", "betterave",
    // produits laitiers et oeufs
    "oeuf", "œuf", "lait", "crème", "creme", "beurre", "fromage", "gruyère", "parmesan",
    "mozzarella", "yaourt", "mascarpone", "ricotta",
    // épicerie
    "farine", "sucre", "sel", "poivre", "huile", "vinaigre", "moutarde", "miel",
    "chocolat", "levure", "maïzena", "bouillon", "sauce", "confiture", "vin",
    "mayonnaise", "ketchup", "fleur de sel",
    // herbes et épices
    "thym", "laurier", "romarin", "persil", "basilic", "coriandre", "ciboulette", "menthe",
    "épice", "cumin", "curry", "paprika", "muscade", "cannelle", "vanille", "piment",
    "gingembre", "origan", "aneth", "estragon", "safran", "cardamome",
    // féculents
    "riz", "pâte", "pâtes", "semoule", "quinoa", "lentille", "pois chiche", "pain",
    // fruits
    "citron", "lime", "pomme", "poire", "banane", "fraise", "framboise", "orange", "noix",
    "amande", "noisette",
];

/// Food items picked out of instruction-like lines
pub const INSTRUCTION_FOOD_ITEMS: &[&str] = &[
    "potiron", "citrouille", "courge", "pommes de terre", "patate", "carotte", "oignon",
    "ail", "tomate", "courgette", "huile", "beurre", "crème", "sel", "poivre", "miel",
    "sucre", "chocolat",
];

/// Phrases that mark a line as an instruction rather than an ingredient
pub const INSTRUCTION_PHRASES: &[&str] = &[
    "dès le début", "direct sur", "commencer par", "faire cuire", "mettre au four",
    "préchauffer", "laisser reposer", "servir avec", "à feu", "pendant", "jusqu'à",
    "ensuite", "puis", "après", "une fois", "quand", "si besoin",
];

/// Imperative cooking verbs that open an instruction
pub const IMPERATIVE_VERBS: &[&str] = &[
    "faites", "mettez", "ajoutez", "coupez", "hachez", "mixez", "versez", "épluchez",
];

/// Cooking actions that disqualify a phrase from being an ingredient
pub const ACTION_VERBS: &[&str] = &[
    "faire", "mettre", "ajouter", "mélanger", "cuire", "couper", "éplucher", "hacher",
    "mixer", "chauffer", "verser", "laisser", "préchauffer", "enfourner", "sortir",
    "retirer", "prendre", "commencer", "démarrer", "continuer", "terminer", "servir",
    "dès le début", "direct sur", "ensuite", "puis", "après",
];

/// Conjugated verbs that betray a spoken sentence
pub const CONJUGATED_VERBS: &[&str] = &["fait", "dois", "peux", "vais", "veux", "suis", "sont"];

/// Build a case-insensitive regex matching any of `words` as a whole word.
///
/// With `allow_plural`, a trailing `s` or `x` is accepted after each word.
pub fn whole_word_regex(words: &[&str], allow_plural: bool) -> Result<Regex, regex::Error> {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    sorted.dedup();

    let alternation = sorted
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    let plural = if allow_plural { "[sx]?" } else { "" };

    Regex::new(&format!(r"(?i)\b(?:{}){}\b", alternation, plural))
}
