use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serein_core::models::VideoAssetResponse;
use serein_core::AppError;
use serein_processing::UploadRequest;
use std::sync::Arc;

/// Parse the boolean-like `visibility` form value ("true"/"1" are public).
fn parse_visibility(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "public")
}

fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[utoipa::path(
    post,
    path = "/api/v0/videos",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video uploaded and packaged", body = VideoAssetResponse),
        (status = 400, description = "Missing file/title or invalid content type", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Media could not be processed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<VideoAssetResponse>), HttpAppError> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();
    let mut is_public = false;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart payload: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match field_name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::InvalidInput("File field has no filename".to_string()))?;
                let content_type = field
                    .content_type()
                    .map(String::from)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::InvalidInput(format!("Invalid title: {}", e)))?,
                );
            }
            "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Invalid description: {}", e)))?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            "tags" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Invalid tags: {}", e)))?;
                tags = parse_tags(&text);
            }
            "visibility" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Invalid visibility: {}", e)))?;
                is_public = parse_visibility(&text);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing required field: title".to_string()))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::InvalidInput("Missing required field: file".to_string()))?;

    let asset = state
        .pipeline
        .ingest(UploadRequest {
            title,
            description,
            tags,
            is_public,
            file_name,
            content_type,
            bytes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(VideoAssetResponse::from(asset))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_visibility() {
        assert!(parse_visibility("true"));
        assert!(parse_visibility("1"));
        assert!(parse_visibility(" Public "));
        assert!(!parse_visibility("false"));
        assert!(!parse_visibility("0"));
        assert!(!parse_visibility(""));
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(
            parse_tags("calm, sleep , ,focus"),
            vec!["calm", "sleep", "focus"]
        );
        assert!(parse_tags("").is_empty());
    }
}
