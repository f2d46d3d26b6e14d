use serein_core::constants::MAX_VIDEO_UPLOAD_BYTES;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (expected video/*)")]
    InvalidContentType { content_type: String },

    #[error("Empty file")]
    EmptyFile,
}

/// Validates uploaded payloads before any workspace or record is created.
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn with_default_limit() -> Self {
        Self::new(MAX_VIDEO_UPLOAD_BYTES)
    }

    pub fn validate(&self, size: usize, content_type: &str) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        if !content_type.to_lowercase().starts_with("video/") {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_video_payload() {
        let validator = UploadValidator::new(1024);
        assert!(validator.validate(512, "video/mp4").is_ok());
        assert!(validator.validate(512, "VIDEO/QuickTime").is_ok());
    }

    #[test]
    fn test_rejects_empty_payload() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate(0, "video/mp4"),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate(1025, "video/mp4"),
            Err(ValidationError::FileTooLarge { size: 1025, max: 1024 })
        ));
        // At the limit is still fine.
        assert!(validator.validate(1024, "video/mp4").is_ok());
    }

    #[test]
    fn test_rejects_non_video_content_type() {
        let validator = UploadValidator::new(1024);
        assert!(matches!(
            validator.validate(10, "image/png"),
            Err(ValidationError::InvalidContentType { .. })
        ));
        assert!(validator.validate(10, "application/octet-stream").is_err());
    }

    #[test]
    fn test_default_limit_is_two_gib() {
        let validator = UploadValidator::with_default_limit();
        assert!(validator.validate(10, "video/mp4").is_ok());
        assert!(validator
            .validate(MAX_VIDEO_UPLOAD_BYTES + 1, "video/mp4")
            .is_err());
    }
}
