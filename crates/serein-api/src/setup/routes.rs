//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serein_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Slack on top of the raw video limit for the other multipart fields.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api-doc/openapi.json",
            get(|| async { Json(crate::api_doc::openapi_spec()) }),
        )
        .route(
            "/api/v0/videos",
            post(handlers::video_upload::upload_video).get(handlers::video_get::list_videos),
        )
        .route("/api/v0/videos/sync", get(handlers::video_sync::sync_videos))
        .route(
            "/api/v0/videos/cleanup",
            post(handlers::video_sync::cleanup_object),
        )
        .route(
            "/api/v0/videos/{id}",
            get(handlers::video_get::get_video).delete(handlers::video_delete::delete_video),
        )
        .route(
            "/api/v0/videos/{id}/convert",
            post(handlers::video_convert::convert_video),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
