//! Storage abstraction trait
//!
//! Defines the ObjectStorage trait that all storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-addressed object storage.
///
/// All backends (S3, local filesystem) implement this trait so the ingestion
/// pipeline can work against any of them without coupling to implementation
/// details. Keys follow the layout in the crate root documentation.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload one object. Uploading the same key twice overwrites.
    /// Returns the public URL for the uploaded object.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Download an object by key. `NotFound` when the key does not exist.
    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by key. Deleting a missing key is not an error.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Existence probe used by reconciliation.
    ///
    /// `Ok(false)` means the backend positively confirmed absence. Any other
    /// failure (unreachable backend, auth, ...) is an `Err` — never conflated
    /// with a missing object.
    async fn object_exists(&self, key: &str) -> StorageResult<bool>;

    /// Bucket (or equivalent container) the backend writes to, for reporting.
    fn bucket(&self) -> &str;

    /// Public URL for an object key, without touching the backend.
    fn url_for(&self, key: &str) -> String;
}
