use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to assess a brand, optionally narrowed to one item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandFitRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default, alias = "item_name", rename = "itemName")]
    pub item_name: Option<String>,
    #[serde(default, alias = "url_extraction", rename = "urlExtraction")]
    pub url_extraction: Option<UrlExtraction>,
}

/// Hint harvested by the browser extension from the product page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlExtraction {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, alias = "item_name", rename = "itemName")]
    pub item_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
}

impl UrlExtraction {
    pub fn is_high_confidence(&self) -> bool {
        self.confidence
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case("high"))
    }
}

/// Request after the extension hint has been applied
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ResolvedRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    pub item_name: String,
    pub forced_specific: bool,
}

impl BrandFitRequest {
    /// Apply the `urlExtraction` override rules.
    ///
    /// A high-confidence extracted brand replaces the typed brand. An extracted
    /// item name always replaces the typed one and marks the search as specific.
    pub fn resolve(&self) -> ResolvedRequest {
        let mut brand = self.brand.trim().to_string();
        let mut item_name = self
            .item_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let mut forced_specific = false;

        if let Some(extraction) = &self.url_extraction {
            if extraction.is_high_confidence() {
                if let Some(extracted) = non_blank(extraction.brand.as_deref()) {
                    brand = extracted.to_string();
                }
            }
            if let Some(extracted) = non_blank(extraction.item_name.as_deref()) {
                item_name = extracted.to_string();
                forced_specific = true;
            }
        }

        ResolvedRequest {
            brand,
            item_name,
            forced_specific,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
