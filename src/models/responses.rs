use serde::{Deserialize, Serialize};
use crate::models::domain::{BrandFitSummary, GroupedReviews, Review};

/// Response for the brand fit endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFitResponse {
    pub brand_fit_summary: BrandFitSummary,
    pub reviews: Vec<Review>,
    pub grouped_reviews: GroupedReviews,
    pub total_results: usize,
}

impl BrandFitResponse {
    /// Envelope with a message and no data
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            brand_fit_summary: BrandFitSummary::message_only(summary),
            reviews: vec![],
            grouped_reviews: GroupedReviews::default(),
            total_results: 0,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub search_configured: bool,
    pub llm_configured: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
