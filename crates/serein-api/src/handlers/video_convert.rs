use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serein_core::models::VideoAssetResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v0/videos/{id}/convert",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video asset ID")
    ),
    responses(
        (status = 200, description = "Video re-packaged into HLS", body = VideoAssetResponse),
        (status = 400, description = "Video is already packaged", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 422, description = "Media could not be processed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn convert_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoAssetResponse>, HttpAppError> {
    let asset = state.pipeline.convert(id).await?;
    Ok(Json(VideoAssetResponse::from(asset)))
}
