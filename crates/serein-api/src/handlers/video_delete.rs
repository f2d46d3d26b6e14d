use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteVideoResponse {
    pub success: bool,
    pub id: Uuid,
    /// Objects that could not be removed after retries. The database record
    /// is gone either way; these keys may need manual cleanup.
    pub warnings: Vec<String>,
}

#[utoipa::path(
    delete,
    path = "/api/v0/videos/{id}",
    tag = "videos",
    params(
        ("id" = Uuid, Path, description = "Video asset ID")
    ),
    responses(
        (status = 200, description = "Video deleted; warnings list any objects left behind", body = DeleteVideoResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteVideoResponse>, HttpAppError> {
    let report = state.pipeline.delete(id).await?;
    Ok(Json(DeleteVideoResponse {
        success: true,
        id,
        warnings: report.warnings(),
    }))
}
