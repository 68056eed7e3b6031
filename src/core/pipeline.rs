use crate::config::AnalysisSettings;
use crate::core::analyzer::{AnalysisInput, AnalysisStage, TwoStageAnalyzer};
use crate::core::classifier::{categorize, is_specific_item_search};
use crate::core::grouping::{group_reviews, normalize_reviews};
use crate::core::queries::build_search_queries;
use crate::core::sources::collect_sources;
use crate::core::summary::build_summary;
use crate::core::validation::check_fashion_brand;
use crate::error::PipelineError;
use crate::models::{BrandFitResponse, Category, RawResult, ResolvedRequest};
use crate::services::search::SearchGateway;
use futures::future::join_all;
use std::sync::Arc;

/// Outcome of one pipeline run, with the bits worth logging
#[derive(Debug)]
pub struct PipelineRun {
    pub response: BrandFitResponse,
    pub category: Category,
    pub specific_item: bool,
    pub queries: usize,
    pub stage: AnalysisStage,
}

/// Brand fit orchestrator
///
/// # Pipeline Stages
/// 1. Domain check and category classification
/// 2. Query planning
/// 3. Search (one gateway call per query, concatenated in planned order)
/// 4. Analysis (primary, falling back to the rule engine)
/// 5. Source mapping, review grouping and summary synthesis
#[derive(Clone)]
pub struct BrandFitPipeline {
    gateway: Option<Arc<dyn SearchGateway>>,
    analyzer: TwoStageAnalyzer,
    settings: AnalysisSettings,
}

impl BrandFitPipeline {
    pub fn new(
        gateway: Option<Arc<dyn SearchGateway>>,
        analyzer: TwoStageAnalyzer,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            gateway,
            analyzer,
            settings,
        }
    }

    pub fn search_configured(&self) -> bool {
        self.gateway.is_some()
    }

    pub fn llm_configured(&self) -> bool {
        self.analyzer.has_primary()
    }

    /// Run every stage for one resolved request
    pub async fn run(&self, request: &ResolvedRequest) -> Result<PipelineRun, PipelineError> {
        check_fashion_brand(&request.brand)?;

        let gateway = self.gateway.as_ref().ok_or_else(|| {
            PipelineError::Configuration("search provider credentials are missing".to_string())
        })?;

        let brand = request.brand.as_str();
        let item_name = request.item_name.as_str();
        let category = categorize(brand, item_name);
        let specific_item = request.forced_specific || is_specific_item_search(brand, item_name);
        let queries = build_search_queries(brand, category, item_name, specific_item);

        let results = self.search_all(gateway.as_ref(), &queries).await;

        tracing::info!(
            brand,
            category = category.as_str(),
            specific_item,
            queries = queries.len(),
            results = results.len(),
            "search completed"
        );

        let input = AnalysisInput {
            results: &results,
            brand,
            category,
            item_name,
            specific_item,
        };
        let (analysis, stage) = self.analyzer.run(&input).await;

        let sources = collect_sources(&analysis, &results);
        let reviews = normalize_reviews(&results, item_name, self.settings.max_reviews);
        let grouped_reviews = group_reviews(&reviews);
        let summary = build_summary(&analysis, results.len(), category, sources);

        tracing::info!(
            brand,
            analyzer = ?stage,
            sections = summary.sections.len(),
            confidence = summary.confidence.as_str(),
            reviews = reviews.len(),
            "brand fit analysis completed"
        );

        Ok(PipelineRun {
            response: BrandFitResponse {
                brand_fit_summary: summary,
                reviews,
                grouped_reviews,
                total_results: results.len(),
            },
            category,
            specific_item,
            queries: queries.len(),
            stage,
        })
    }

    /// Run all queries and concatenate results in query order. Failed queries
    /// contribute nothing.
    pub async fn search_all(&self, gateway: &dyn SearchGateway, queries: &[String]) -> Vec<RawResult> {
        if self.settings.parallel_queries {
            join_all(queries.iter().map(|q| gateway.search(q)))
                .await
                .into_iter()
                .flatten()
                .collect()
        } else {
            let mut results = Vec::new();
            for query in queries {
                results.extend(gateway.search(query).await);
            }
            results
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::ValidationError;
    use crate::services::search::SearchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers each query with one result named after it; reddit queries fail
    struct EchoGateway {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchGateway for EchoGateway {
        async fn try_search(&self, query: &str) -> Result<Vec<RawResult>, SearchError> {
            self.seen.lock().unwrap().push(query.to_string());
            if query.contains("reddit") {
                return Err(SearchError::InvalidResponse("boom".to_string()));
            }
            Ok(vec![RawResult::new(query, format!("result for {}", query), "https://example.com")])
        }
    }

    fn pipeline(parallel: bool) -> (BrandFitPipeline, Arc<EchoGateway>) {
        let gateway = Arc::new(EchoGateway {
            seen: Mutex::new(vec![]),
        });
        let settings = AnalysisSettings {
            parallel_queries: parallel,
            ..Default::default()
        };
        let pipeline = BrandFitPipeline::new(
            Some(gateway.clone() as Arc<dyn SearchGateway>),
            TwoStageAnalyzer::fallback_only(),
            settings,
        );
        (pipeline, gateway)
    }

    fn request(brand: &str, item: &str) -> ResolvedRequest {
        ResolvedRequest {
            brand: brand.to_string(),
            item_name: item.to_string(),
            forced_specific: false,
        }
    }

    #[tokio::test]
    async fn test_results_follow_query_order_and_skip_failures() {
        for parallel in [true, false] {
            let (pipeline, gateway) = pipeline(parallel);
            let run = pipeline.run(&request("Everlane", "")).await.unwrap();
            let seen = gateway.seen.lock().unwrap().clone();
            let expected: Vec<&String> = seen.iter().filter(|q| !q.contains("reddit")).collect();

            assert_eq!(run.queries, seen.len());
            assert_eq!(run.response.total_results, expected.len());
            let titles: Vec<&String> = run.response.reviews.iter().map(|r| &r.title).collect();
            if !parallel {
                assert_eq!(titles, expected);
            }
        }
    }

    #[tokio::test]
    async fn test_parallel_concatenation_keeps_planned_order() {
        let (pipeline, _) = pipeline(true);
        let queries = build_search_queries("Everlane", Category::Clothing, "", false);
        let gateway = EchoGateway {
            seen: Mutex::new(vec![]),
        };
        let results = pipeline.search_all(&gateway, &queries).await;
        let titles: Vec<String> = results.into_iter().map(|r| r.title).collect();
        let expected: Vec<String> = queries.into_iter().filter(|q| !q.contains("reddit")).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_missing_gateway_is_configuration_error() {
        let pipeline = BrandFitPipeline::new(
            None,
            TwoStageAnalyzer::fallback_only(),
            AnalysisSettings::default(),
        );
        assert!(matches!(
            pipeline.run(&request("Everlane", "")).await,
            Err(PipelineError::Configuration(_))
        ));
        assert!(!pipeline.search_configured());
    }

    #[tokio::test]
    async fn test_non_fashion_brand_rejected_before_search() {
        let (pipeline, gateway) = pipeline(true);
        let outcome = pipeline.run(&request("Netflix", "")).await;
        assert!(matches!(
            outcome,
            Err(PipelineError::Validation(ValidationError::NotFashion(_)))
        ));
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forced_specific_item_plans_material_queries() {
        let (pipeline, gateway) = pipeline(false);
        let mut req = request("Uniqlo", "Airism");
        req.forced_specific = true;
        let run = pipeline.run(&req).await.unwrap();
        assert!(run.specific_item);
        assert!(gateway.seen.lock().unwrap()[0].starts_with("\"Uniqlo Airism\""));
    }
}
