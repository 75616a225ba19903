//! Route configuration and setup

use crate::constants::{API_BASE, ASSETS_PATH, MULTIPART_OVERHEAD_BYTES};
use crate::error::expose_error_details;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let thumbnail_limit = body_limit(state.uploads.max_thumbnail_bytes);
    let video_limit = body_limit(state.uploads.max_video_bytes);

    let api_routes = Router::new()
        .route("/healthz", get(handlers::health::liveness_check))
        .route(
            "/videos/{video_id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route(
            "/videos/{video_id}/video",
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        );

    let app = Router::new()
        .nest(API_BASE, api_routes)
        .nest_service(ASSETS_PATH, ServeDir::new(config.assets_root()))
        .layer(middleware::map_response_with_state(
            !config.is_production(),
            expose_error_details,
        ))
        // Server-level cap on in-flight requests
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(
        thumbnail_limit_bytes = thumbnail_limit,
        video_limit_bytes = video_limit,
        http_concurrency_limit = config.http_concurrency_limit(),
        "Routes configured"
    );

    Ok(app)
}

/// Route body limit: the file ceiling plus room for multipart framing.
fn body_limit(max_file_bytes: u64) -> usize {
    usize::try_from(max_file_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
