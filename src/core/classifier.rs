use crate::core::keywords::{contains_phrase, contains_term};
use crate::models::Category;

/// Ordered keyword sets; the first set with a hit decides the category
const CATEGORY_TERMS: &[(Category, &[&str])] = &[
    (
        Category::Bags,
        &[
            "bag", "handbag", "tote", "purse", "backpack", "clutch", "crossbody", "satchel",
            "duffel", "weekender", "hobo", "bucket bag", "luggage",
        ],
    ),
    (
        Category::Shoes,
        &[
            "shoe", "sneaker", "boot", "sandal", "loafer", "heel", "pump", "trainer", "slipper",
            "mule", "espadrille", "clog", "flats", "runner", "footwear",
        ],
    ),
    (
        Category::Accessories,
        &[
            "belt", "hat", "beanie", "cap", "scarf", "sunglasses", "jewelry", "necklace",
            "bracelet", "earring", "ring", "watch", "wallet", "gloves", "tie",
        ],
    ),
    (
        Category::Clothing,
        &[
            "shirt", "t-shirt", "tee", "dress", "jeans", "jean", "pants", "trouser", "sweater",
            "jacket", "coat", "hoodie", "skirt", "shorts", "blouse", "cardigan", "leggings",
            "denim", "knit", "crew neck", "crewneck", "sweatshirt", "chinos", "polo", "parka",
            "vest", "jumpsuit", "apparel", "clothing", "top", "underwear", "bra", "swimsuit",
        ],
    ),
];

/// Shoe brands whose names carry no lexical category hint
const SHOE_BRANDS: &[&str] = &[
    "allbirds",
    "birkenstock",
    "dr. martens",
    "dr martens",
    "crocs",
    "vans",
    "converse",
    "hoka",
    "brooks",
    "rothys",
    "rothy's",
    "veja",
    "clarks",
    "ecco",
    "blundstone",
    "ugg",
    "skechers",
    "asics",
    "salomon",
    "red wing",
    "thursday",
    "cariuma",
    "on running",
];

/// Clothing brands whose names carry no lexical category hint
const CLOTHING_BRANDS: &[&str] = &[
    "everlane",
    "uniqlo",
    "aritzia",
    "lululemon",
    "j.crew",
    "j crew",
    "zara",
    "h&m",
    "madewell",
    "gap",
    "reformation",
    "quince",
    "cos",
    "abercrombie",
    "abercrombie & fitch",
    "levi's",
    "levis",
    "carhartt",
    "muji",
    "buck mason",
    "vuori",
    "patagonia",
    "banana republic",
    "todd snyder",
    "taylor stitch",
    "outerknown",
    "pact",
    "naadam",
    "entireworld",
    "alo yoga",
];

/// Material, garment and style descriptors that mark a specific-item search
const SPECIFIC_ITEM_DESCRIPTORS: &[&str] = &[
    "wool", "merino", "cashmere", "cotton", "linen", "silk", "denim", "leather", "suede",
    "polyester", "nylon", "fleece", "alpaca", "corduroy", "twill", "oxford", "sweater",
    "shirt", "tee", "jeans", "jean", "dress", "jacket", "coat", "cardigan", "hoodie", "pants",
    "trouser", "chinos", "skirt", "crew neck", "crewneck", "v-neck", "turtleneck", "slim",
    "relaxed", "oversized", "cropped", "straight", "wide leg", "high rise", "boot", "sneaker",
];

/// Infer the product category from the item and brand text.
///
/// Total: always returns one of the five categories.
pub fn categorize(brand: &str, item_name: &str) -> Category {
    let text = format!("{} {}", item_name, brand).to_lowercase();

    for (category, terms) in CATEGORY_TERMS {
        if terms.iter().any(|t| contains_term(&text, t)) {
            return *category;
        }
    }

    let brand = normalize_brand(brand);
    if SHOE_BRANDS.contains(&brand.as_str()) {
        return Category::Shoes;
    }
    if CLOTHING_BRANDS.contains(&brand.as_str()) {
        return Category::Clothing;
    }

    Category::General
}

/// Whether the user named a particular product rather than just the brand
pub fn is_specific_item_search(brand: &str, item_name: &str) -> bool {
    let item = item_name.trim().to_lowercase();
    if item.is_empty() {
        return false;
    }

    if SPECIFIC_ITEM_DESCRIPTORS
        .iter()
        .any(|d| contains_term(&item, d))
    {
        return true;
    }

    let multi_word = item.split_whitespace().count() > 1;
    multi_word && item != normalize_brand(brand)
}

/// Whether `brand` is on one of the curated brand tables
pub fn is_known_brand(brand: &str) -> bool {
    let brand = normalize_brand(brand);
    SHOE_BRANDS.contains(&brand.as_str()) || CLOTHING_BRANDS.contains(&brand.as_str())
}

pub(crate) fn normalize_brand(brand: &str) -> String {
    brand
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether `text` mentions the brand as a whole word
pub fn mentions_brand(text_lower: &str, brand: &str) -> bool {
    let brand = normalize_brand(brand);
    !brand.is_empty() && contains_phrase(text_lower, &brand)
}

/// Words that carry no item identity
const ITEM_STOP_WORDS: &[&str] = &["the", "and", "for", "with", "women's", "men's", "womens", "mens"];

/// Significant lower-cased tokens of an item name
pub fn item_tokens(item_name: &str) -> Vec<String> {
    item_name
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| t.chars().count() >= 3 && !ITEM_STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Whether `text` mentions the item: at least half of its tokens are present.
/// An item with no significant tokens is trivially mentioned.
pub fn mentions_item(text_lower: &str, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return true;
    }
    let hits = tokens.iter().filter(|t| contains_term(text_lower, t)).count();
    hits * 2 >= tokens.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_keywords_win() {
        assert_eq!(categorize("Everlane", "The Day Heel"), Category::Shoes);
        assert_eq!(categorize("Everlane", "Transport Tote"), Category::Bags);
        assert_eq!(categorize("Madewell", "Leather Belt"), Category::Accessories);
        assert_eq!(categorize("Uniqlo", "Supima Cotton T-Shirt"), Category::Clothing);
    }

    #[test]
    fn test_bag_terms_checked_before_clothing() {
        assert_eq!(categorize("Baggu", "denim tote bag"), Category::Bags);
    }

    #[test]
    fn test_brand_name_hint() {
        assert_eq!(categorize("Coach Bags", ""), Category::Bags);
    }

    #[test]
    fn test_curated_brand_lists() {
        assert_eq!(categorize("Allbirds", ""), Category::Shoes);
        assert_eq!(categorize("  EVERLANE ", ""), Category::Clothing);
        assert_eq!(categorize("Dr. Martens", ""), Category::Shoes);
    }

    #[test]
    fn test_default_general() {
        assert_eq!(categorize("Acme Studio", ""), Category::General);
        assert_eq!(categorize("", ""), Category::General);
    }

    #[test]
    fn test_no_false_substring_hits() {
        // "capsule" must not read as "cap"; "topaz" must not read as "top"
        assert_eq!(categorize("Capsule", "Topaz"), Category::General);
    }

    #[test]
    fn test_specific_item_by_descriptor() {
        assert!(is_specific_item_search("Everlane", "cashmere"));
        assert!(is_specific_item_search("X", "merino wool crew neck"));
    }

    #[test]
    fn test_specific_item_by_multi_word_name() {
        assert!(is_specific_item_search("Uniqlo", "Airism Mock"));
        assert!(!is_specific_item_search("Buck Mason", "buck mason"));
        assert!(!is_specific_item_search("Uniqlo", "Airism"));
        assert!(!is_specific_item_search("Uniqlo", "   "));
    }

    #[test]
    fn test_item_tokens_and_mentions() {
        let tokens = item_tokens("The Merino Wool Crew-Neck");
        assert_eq!(tokens, vec!["merino", "wool", "crew", "neck"]);
        assert!(mentions_item("x merino wool crew neck, 100% merino wool", &tokens));
        assert!(mentions_item("merino crew from x", &tokens));
        assert!(!mentions_item("x cotton tee", &tokens));
        assert!(mentions_item("anything", &[]));
    }

    #[test]
    fn test_mentions_brand() {
        assert!(mentions_brand("i love my x sweater", "X"));
        assert!(!mentions_brand("xl sweater", "X"));
    }
}
