// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnalysisResult, Aspect, AspectSection, BrandFitSummary, Category, ConfidenceTier, Evidence,
    GroupedReviews, MaterialsSection, RawResult, Review, ReviewBucket, Section,
};
pub use requests::{BrandFitRequest, ResolvedRequest, UrlExtraction};
pub use responses::{BrandFitResponse, ErrorResponse, HealthResponse};
