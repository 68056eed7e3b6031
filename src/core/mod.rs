// Core pipeline exports
pub mod analyzer;
pub mod classifier;
pub mod evidence;
pub mod fallback;
pub mod grouping;
pub mod keywords;
pub mod pipeline;
pub mod queries;
pub mod sources;
pub mod summary;
pub mod validation;

pub use analyzer::{
    AnalysisInput, AnalysisStage, Analyzer, ExtractionError, FallbackAnalyzer, TracedAnalyzer,
    TwoStageAnalyzer,
};
pub use classifier::{categorize, is_specific_item_search};
pub use fallback::analyze_fallback;
pub use grouping::{group_reviews, normalize_reviews};
pub use pipeline::{BrandFitPipeline, PipelineRun};
pub use queries::build_search_queries;
pub use sources::source_name;
pub use summary::build_summary;
pub use validation::{check_fashion_brand, ValidationError};
