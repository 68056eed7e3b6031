use crate::core::BrandFitPipeline;
use crate::error::PipelineError;
use crate::models::{BrandFitRequest, BrandFitResponse, ErrorResponse, HealthResponse};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::Instrument;
use uuid::Uuid;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: BrandFitPipeline,
}

/// Configure brand fit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/brand-fit", web::post().to(brand_fit));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let search_configured = state.pipeline.search_configured();
    let status = if search_configured { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        search_configured,
        llm_configured: state.pipeline.llm_configured(),
    })
}

/// Brand fit endpoint
///
/// POST /api/v1/brand-fit
///
/// Request body:
/// ```json
/// {
///   "brand": "string",
///   "itemName": "string",
///   "urlExtraction": { "brand": "string", "itemName": "string", "confidence": "high" }
/// }
/// ```
async fn brand_fit(state: web::Data<AppState>, req: web::Json<BrandFitRequest>) -> HttpResponse {
    let request_id = Uuid::new_v4();
    let resolved = req.into_inner().resolve();

    if let Err(errors) = resolved.validate() {
        tracing::info!("Validation failed for brand fit request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "brand must be between 1 and 100 characters".to_string(),
            status_code: 400,
        });
    }

    let span = tracing::info_span!("brand_fit", %request_id);
    let outcome = AssertUnwindSafe(state.pipeline.run(&resolved).instrument(span))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "pipeline panicked".to_string());
            Err(PipelineError::Unexpected(message))
        });

    match outcome {
        Ok(run) => {
            tracing::info!(
                %request_id,
                brand = %resolved.brand,
                category = run.category.as_str(),
                specific_item = run.specific_item,
                queries = run.queries,
                total_results = run.response.total_results,
                analyzer = ?run.stage,
                "brand fit request served"
            );
            HttpResponse::Ok().json(run.response)
        }
        Err(e) => {
            let status = degraded_status(&e);
            match &e {
                PipelineError::Validation(_) => {
                    tracing::info!(%request_id, brand = %resolved.brand, code = e.code(), error = %e, "brand rejected")
                }
                PipelineError::Configuration(_) => {
                    tracing::warn!(%request_id, brand = %resolved.brand, code = e.code(), error = %e, "serving degraded response")
                }
                PipelineError::Unexpected(_) => {
                    tracing::error!(%request_id, brand = %resolved.brand, code = e.code(), error = %e, "brand fit pipeline failed")
                }
            }
            HttpResponse::build(status).json(BrandFitResponse::empty(e.summary()))
        }
    }
}

/// Status for the empty envelope returned on each error kind
pub fn degraded_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Configuration(_) => StatusCode::OK,
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
