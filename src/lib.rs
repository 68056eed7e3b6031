//! Brand Fit - fit and quality assessment service for fashion brands
//!
//! This library searches the web for customer opinions about a brand or item
//! and turns the snippets into an evidence-backed fit and quality assessment.
//! An LLM-backed analyzer is tried first; a deterministic keyword engine takes
//! over whenever it is unavailable or fails.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

// Re-export commonly used types
pub use crate::core::{
    analyze_fallback, categorize, AnalysisStage, Analyzer, BrandFitPipeline, TracedAnalyzer,
    TwoStageAnalyzer,
};
pub use config::Settings;
pub use error::PipelineError;
pub use models::{AnalysisResult, BrandFitRequest, BrandFitResponse, Category, RawResult};
pub use services::{GoogleSearchClient, PrimaryAnalyzer, SearchGateway};

/// Wire the pipeline from settings. Missing search credentials leave the
/// gateway out (degraded responses); missing LLM credentials leave the
/// fallback analyzer running alone.
pub fn build_pipeline(settings: &Settings) -> BrandFitPipeline {
    let gateway: Option<Arc<dyn SearchGateway>> = match GoogleSearchClient::from_settings(&settings.search) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(error = %e, "search gateway disabled");
            None
        }
    };

    let primary: Option<Arc<dyn Analyzer>> = match PrimaryAnalyzer::from_settings(&settings.llm) {
        Ok(analyzer) => Some(Arc::new(TracedAnalyzer::new(analyzer))),
        Err(e) => {
            tracing::info!(error = %e, "LLM analyzer disabled, using rule-based analysis only");
            None
        }
    };

    BrandFitPipeline::new(gateway, TwoStageAnalyzer::new(primary), settings.analysis.clone())
}
