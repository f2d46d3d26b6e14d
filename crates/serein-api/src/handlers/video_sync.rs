use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serein_core::AppError;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrphanedObjectResponse {
    pub asset_id: Uuid,
    pub key: String,
    pub bucket: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    /// Number of asset records inspected.
    pub total: usize,
    /// Records whose stored objects were all confirmed present.
    pub present: usize,
    /// Records referencing at least one missing object.
    pub orphaned: usize,
    pub orphans: Vec<OrphanedObjectResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CleanupRequest {
    /// Object key to remove from the storage backend.
    pub key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    pub success: bool,
    pub key: String,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v0/videos/sync",
    tag = "videos",
    responses(
        (status = 200, description = "Database/storage consistency report", body = SyncResponse),
        (status = 500, description = "Storage backend unreachable", body = ErrorResponse)
    )
)]
pub async fn sync_videos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SyncResponse>, HttpAppError> {
    let report = state.pipeline.sync_report().await?;
    Ok(Json(SyncResponse {
        total: report.total,
        present: report.present,
        orphaned: report.orphaned,
        orphans: report
            .orphans
            .into_iter()
            .map(|o| OrphanedObjectResponse {
                asset_id: o.asset_id,
                key: o.key,
                bucket: o.bucket,
            })
            .collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v0/videos/cleanup",
    tag = "videos",
    request_body = CleanupRequest,
    responses(
        (status = 200, description = "Cleanup outcome for the given key", body = CleanupResponse),
        (status = 400, description = "Missing or empty key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn cleanup_object(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CleanupRequest>,
) -> Result<Json<CleanupResponse>, HttpAppError> {
    if request.key.trim().is_empty() {
        return Err(AppError::InvalidInput("Object key must not be empty".to_string()).into());
    }
    let outcome = state.pipeline.cleanup_object(&request.key).await;
    Ok(Json(CleanupResponse {
        success: outcome.succeeded(),
        key: outcome.key,
        attempts: outcome.attempts,
        error: outcome.error,
    }))
}
