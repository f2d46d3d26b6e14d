//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors convert
//! into `HttpAppError` so every failure renders the same JSON shape (status, body,
//! logging) with a `success: false` discriminator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serein_core::{AppError, ErrorMetadata, LogLevel};
use serein_processing::{PipelineError, ValidationError};
use serein_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`; distinguishes failures from success bodies.
    pub success: bool,
    pub error: String,
    /// Full error chain; omitted in production and for sensitive errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in serein-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { size, max } => {
                AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
            }
            ValidationError::InvalidContentType { content_type } => AppError::InvalidInput(
                format!("Invalid content type '{}', expected video/*", content_type),
            ),
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
        };
        HttpAppError(app)
    }
}

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => e.into(),
            PipelineError::Probe(msg) => {
                HttpAppError(AppError::MediaProcessing(format!("Probe failed: {}", msg)))
            }
            PipelineError::Packaging(msg) => HttpAppError(AppError::MediaProcessing(format!(
                "Packaging failed: {}",
                msg
            ))),
            PipelineError::Upload(msg) => HttpAppError(AppError::Storage(msg)),
            PipelineError::Storage(msg) => HttpAppError(AppError::Storage(msg)),
            PipelineError::NotFound(id) => {
                HttpAppError(AppError::NotFound(format!("Video asset {} not found", id)))
            }
            PipelineError::AlreadyPackaged(id) => HttpAppError(AppError::BadRequest(format!(
                "Video asset {} is already packaged",
                id
            ))),
            PipelineError::Store(app) => HttpAppError(app),
            PipelineError::Io(e) => HttpAppError(AppError::Internal(format!("IO error: {}", e))),
        }
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details are hidden in production and for sensitive errors.
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let body = Json(ErrorResponse {
            success: false,
            error: app_error.client_message(),
            details,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_pipeline_not_found_maps_to_404() {
        let id = Uuid::new_v4();
        let HttpAppError(app) = PipelineError::NotFound(id).into();
        assert_eq!(app.http_status_code(), 404);
        assert!(app.client_message().contains(&id.to_string()));
    }

    #[test]
    fn test_already_packaged_maps_to_400() {
        let HttpAppError(app) = PipelineError::AlreadyPackaged(Uuid::new_v4()).into();
        assert_eq!(app.http_status_code(), 400);
        assert_eq!(app.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_oversized_upload_maps_to_413() {
        let err = PipelineError::Validation(ValidationError::FileTooLarge {
            size: 3_000_000_000,
            max: 2_147_483_648,
        });
        let HttpAppError(app) = err.into();
        assert_eq!(app.http_status_code(), 413);
    }

    #[test]
    fn test_packaging_failure_maps_to_422() {
        let HttpAppError(app) = PipelineError::Packaging("encoder crashed".to_string()).into();
        assert_eq!(app.http_status_code(), 422);
        assert_eq!(app.error_code(), "MEDIA_PROCESSING_ERROR");
    }

    #[test]
    fn test_error_body_carries_success_false() {
        let response = ErrorResponse {
            success: false,
            error: "Not found".to_string(),
            details: None,
            code: "NOT_FOUND".to_string(),
            recoverable: false,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json.get("success").and_then(|v| v.as_bool()), Some(false));
        assert!(json.get("details").is_none());
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("NOT_FOUND"));
    }
}
