use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serein_core::models::VideoAssetResponse;
use serein_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    /// Restrict the listing to packaged (`true`) or unpackaged (`false`) assets.
    pub packaged: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v0/videos",
    tag = "videos",
    params(
        ("packaged" = Option<bool>, Query, description = "Filter by packaging state")
    ),
    responses(
        (status = 200, description = "List of video assets", body = Vec<VideoAssetResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListVideosQuery>,
) -> Result<Json<Vec<VideoAssetResponse>>, HttpAppError> {
    let assets = state.store.list(query.packaged).await?;
    Ok(Json(
        assets.into_iter().map(VideoAssetResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video asset ID")
    ),
    responses(
        (status = 200, description = "Video asset", body = VideoAssetResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoAssetResponse>, HttpAppError> {
    let asset = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video asset {} not found", id)))?;
    Ok(Json(VideoAssetResponse::from(asset)))
}
