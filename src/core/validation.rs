//! Fashion-domain check applied to every brand before searching.

use crate::core::classifier::{is_known_brand, normalize_brand};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("brand name is required")]
    MissingBrand,

    #[error("\"{0}\" does not look like a brand name")]
    NotAName(String),

    #[error("\"{0}\" is not a fashion brand; fit and quality analysis covers clothing, shoes, bags and accessories")]
    NotFashion(String),
}

/// Bag, accessory and luxury houses accepted without further checks
const FASHION_HOUSES: &[&str] = &[
    "coach",
    "kate spade",
    "michael kors",
    "longchamp",
    "baggu",
    "cuyana",
    "senreve",
    "dagne dover",
    "away",
    "fossil",
    "mejuri",
    "gucci",
    "prada",
    "louis vuitton",
    "chanel",
    "hermes",
    "hermès",
    "burberry",
    "ralph lauren",
    "tommy hilfiger",
    "calvin klein",
    "nike",
    "adidas",
    "new balance",
    "puma",
    "reebok",
];

/// Companies that share names with shoppers' searches but sell no apparel
const NON_FASHION: &[&str] = &[
    "apple",
    "samsung",
    "google",
    "microsoft",
    "amazon",
    "netflix",
    "spotify",
    "tesla",
    "toyota",
    "ford",
    "honda",
    "bmw",
    "mcdonald's",
    "mcdonalds",
    "burger king",
    "starbucks",
    "coca-cola",
    "pepsi",
    "facebook",
    "meta",
    "openai",
    "sony",
    "dell",
    "intel",
    "nvidia",
];

/// Accept or reject `brand` for fit and quality analysis
pub fn check_fashion_brand(brand: &str) -> Result<(), ValidationError> {
    let normalized = normalize_brand(brand);
    if normalized.is_empty() {
        return Err(ValidationError::MissingBrand);
    }
    if !normalized.chars().any(char::is_alphabetic) {
        return Err(ValidationError::NotAName(brand.trim().to_string()));
    }
    if is_known_brand(&normalized) || FASHION_HOUSES.contains(&normalized.as_str()) {
        return Ok(());
    }
    if NON_FASHION.contains(&normalized.as_str()) {
        return Err(ValidationError::NotFashion(brand.trim().to_string()));
    }
    Ok(())
}
