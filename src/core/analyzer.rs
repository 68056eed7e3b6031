//! The `Analyzer` capability and the two-stage strategy built on it.
//!
//! A primary analyzer (LLM-backed in production) is tried first. Any failure,
//! or a result with nothing supported by evidence, hands the same input to the
//! deterministic [`FallbackAnalyzer`]. Running the strategy is total.

use crate::core::fallback::analyze_fallback;
use crate::models::{AnalysisResult, Category, RawResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Everything an analyzer is allowed to see
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub results: &'a [RawResult],
    pub brand: &'a str,
    pub category: Category,
    pub item_name: &'a str,
    pub specific_item: bool,
}

/// Errors that make an analyzer's output unusable
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("analyzer not configured")]
    Unavailable,

    #[error("analyzer request failed: {0}")]
    Request(String),

    #[error("malformed structured output: {0}")]
    Malformed(String),

    #[error("structured output contained no evidence-backed sections")]
    Empty,
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(&self, input: &AnalysisInput<'_>) -> Result<AnalysisResult, ExtractionError>;
}

/// Rule-based analyzer; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAnalyzer;

impl FallbackAnalyzer {
    pub fn run(&self, input: &AnalysisInput<'_>) -> AnalysisResult {
        analyze_fallback(
            input.results,
            input.brand,
            input.category,
            input.item_name,
            input.specific_item,
        )
    }
}

#[async_trait]
impl Analyzer for FallbackAnalyzer {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn analyze(&self, input: &AnalysisInput<'_>) -> Result<AnalysisResult, ExtractionError> {
        Ok(self.run(input))
    }
}

/// Logs timing and outcome around any analyzer
pub struct TracedAnalyzer<A> {
    inner: A,
}

impl<A: Analyzer> TracedAnalyzer<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: Analyzer> Analyzer for TracedAnalyzer<A> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn analyze(&self, input: &AnalysisInput<'_>) -> Result<AnalysisResult, ExtractionError> {
        let started = Instant::now();
        let outcome = self.inner.analyze(input).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(result) => tracing::info!(
                analyzer = self.name(),
                elapsed_ms,
                sections = result.sections().len(),
                confidence = result.overall_confidence.as_str(),
                "analysis completed"
            ),
            Err(e) => tracing::warn!(
                analyzer = self.name(),
                elapsed_ms,
                error = %e,
                "analysis failed"
            ),
        }
        outcome
    }
}

/// Which stage produced the final result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStage {
    Primary,
    Fallback,
}

/// `try_primary() orElse fallback()`
#[derive(Clone)]
pub struct TwoStageAnalyzer {
    primary: Option<Arc<dyn Analyzer>>,
    fallback: FallbackAnalyzer,
}

impl TwoStageAnalyzer {
    pub fn new(primary: Option<Arc<dyn Analyzer>>) -> Self {
        Self {
            primary,
            fallback: FallbackAnalyzer,
        }
    }

    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// First stage. The result is settled; an empty result is an error so the
    /// fallback gets a chance at the same corpus.
    pub async fn try_primary(
        &self,
        input: &AnalysisInput<'_>,
    ) -> Result<AnalysisResult, ExtractionError> {
        let primary = self.primary.as_ref().ok_or(ExtractionError::Unavailable)?;
        let result = primary.analyze(input).await?.settle();
        if result.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(result)
    }

    /// Second stage
    pub fn fallback(&self, input: &AnalysisInput<'_>) -> AnalysisResult {
        self.fallback.run(input)
    }

    pub async fn run(&self, input: &AnalysisInput<'_>) -> (AnalysisResult, AnalysisStage) {
        match self.try_primary(input).await {
            Ok(result) => (result, AnalysisStage::Primary),
            Err(ExtractionError::Unavailable) => {
                tracing::debug!("no primary analyzer configured, using fallback");
                (self.fallback(input), AnalysisStage::Fallback)
            }
            Err(e) => {
                tracing::warn!(error = %e, brand = input.brand, "primary analysis failed, using fallback");
                (self.fallback(input), AnalysisStage::Fallback)
            }
        }
    }
}
