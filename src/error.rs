use crate::core::validation::ValidationError;
use thiserror::Error;

/// Failures that reach the top of a request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Machine-readable error code attached to request logs
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "search_unavailable",
            PipelineError::Validation(_) => "invalid_brand",
            PipelineError::Unexpected(_) => "internal_error",
        }
    }

    /// Human-readable summary text for the degraded response
    pub fn summary(&self) -> String {
        match self {
            PipelineError::Configuration(_) => {
                "Review search is currently unavailable, so no fit or quality assessment could be made."
                    .to_string()
            }
            PipelineError::Validation(e) => format!("{}.", e.to_string().trim_end_matches('.')),
            PipelineError::Unexpected(_) => {
                "Something went wrong while analyzing reviews; no assessment is available right now."
                    .to_string()
            }
        }
    }
}
