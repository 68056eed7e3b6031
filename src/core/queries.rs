use crate::models::Category;

/// Upper bound on planned queries per request
pub const MAX_QUERIES: usize = 6;

/// Fiber lexicon OR-ed into the material-composition queries
const MATERIAL_LEXICON: &[&str] = &["cotton", "wool", "cashmere", "polyester", "linen", "silk"];

const CLOTHING_QUERIES: &[&str] = &[
    "{brand} sizing fit review runs small or large",
    "{brand} quality review reddit",
    "{brand} fabric quality after washing shrink",
    "{brand} true to size fit",
];

const SHOE_QUERIES: &[&str] = &[
    "{brand} shoes fit true to size review",
    "{brand} comfort review reddit",
    "{brand} durability how long do they last",
    "{brand} sizing half size up or down",
];

const BAG_QUERIES: &[&str] = &[
    "{brand} bag quality review",
    "{brand} leather material construction",
    "{brand} bag durability reddit",
    "{brand} bag worth it review",
];

const ACCESSORY_QUERIES: &[&str] = &[
    "{brand} quality review",
    "{brand} material durability",
    "{brand} review reddit",
    "{brand} worth the price",
];

const GENERAL_QUERIES: &[&str] = &[
    "{brand} review fit quality",
    "{brand} sizing reddit",
    "{brand} quality worth it",
    "{brand} customer reviews",
];

fn base_templates(category: Category) -> &'static [&'static str] {
    match category {
        Category::Clothing => CLOTHING_QUERIES,
        Category::Shoes => SHOE_QUERIES,
        Category::Bags => BAG_QUERIES,
        Category::Accessories => ACCESSORY_QUERIES,
        Category::General => GENERAL_QUERIES,
    }
}

/// Plan the ordered search queries for one request.
///
/// Material-composition queries for a specific item come first; the
/// category's base queries follow. Never more than [`MAX_QUERIES`].
pub fn build_search_queries(
    brand: &str,
    category: Category,
    item_name: &str,
    specific_item: bool,
) -> Vec<String> {
    let brand = brand.trim();
    let item = item_name.trim();
    let mut queries = Vec::with_capacity(MAX_QUERIES);

    if specific_item && !item.is_empty() {
        queries.extend(material_queries(brand, item, category));
    }

    queries.extend(
        base_templates(category)
            .iter()
            .map(|template| template.replace("{brand}", brand)),
    );

    queries.truncate(MAX_QUERIES);
    queries
}

fn material_queries(brand: &str, item: &str, category: Category) -> Vec<String> {
    let exact = format!("\"{} {}\"", brand, item);
    let lexicon = MATERIAL_LEXICON.join(" OR ");

    let mut queries = vec![
        format!("{} material composition", exact),
        format!("{} ({})", exact, lexicon),
    ];
    if category == Category::Clothing {
        queries.push(format!("{} fabric content review", exact));
    }
    queries
}
