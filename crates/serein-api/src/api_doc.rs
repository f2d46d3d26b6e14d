//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use serein_core::models;

/// Returns the OpenAPI spec served at /api-doc/openapi.json.
pub fn openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Serein API",
        version = "0.1.0",
        description = "Video ingestion and HLS packaging API. Uploads are validated, probed with ffprobe, packaged into HLS (playlist + transport stream segments) with ffmpeg, and published to object storage. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::health::health,
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
        handlers::video_get::list_videos,
        handlers::video_convert::convert_video,
        handlers::video_delete::delete_video,
        handlers::video_sync::sync_videos,
        handlers::video_sync::cleanup_object,
    ),
    components(
        schemas(
            models::VideoAssetResponse,
            models::ProcessingStatus,
            error::ErrorResponse,
            handlers::health::HealthResponse,
            handlers::video_delete::DeleteVideoResponse,
            handlers::video_sync::SyncResponse,
            handlers::video_sync::OrphanedObjectResponse,
            handlers::video_sync::CleanupRequest,
            handlers::video_sync::CleanupResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "videos", description = "Video upload, packaging and lifecycle")
    )
)]
pub struct ApiDoc;
