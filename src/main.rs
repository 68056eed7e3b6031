use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use brand_fit::routes::{self, AppState};
use brand_fit::{build_pipeline, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize logging from LOG_LEVEL / LOG_FORMAT, falling back to settings
fn init_tracing(settings: &Settings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_tracing(&settings);

    info!("Starting brand fit service...");

    let pipeline = build_pipeline(&settings);
    info!(
        search_configured = pipeline.search_configured(),
        llm_configured = pipeline.llm_configured(),
        max_reviews = settings.analysis.max_reviews,
        parallel_queries = settings.analysis.parallel_queries,
        "Pipeline initialized"
    );

    let app_state = AppState { pipeline };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
