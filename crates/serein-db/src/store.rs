use async_trait::async_trait;
use serein_core::models::{NewVideoAsset, PackagingSummary, ProcessingStatus, VideoAsset};
use serein_core::AppError;
use uuid::Uuid;

/// Catalog of video assets.
///
/// The pipeline and handlers program against this trait; the Postgres
/// implementation lives in [`crate::AssetRepository`], test doubles in the
/// pipeline's test suite.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert a new asset in `pending` state.
    async fn create(&self, new_asset: NewVideoAsset) -> Result<VideoAsset, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError>;

    /// List assets, newest first, optionally filtered by packaged state.
    async fn list(&self, packaged: Option<bool>) -> Result<Vec<VideoAsset>, AppError>;

    /// Move an asset to `next` status.
    ///
    /// Rejects transitions outside the allowed table (`pending -> processing`,
    /// `processing -> completed | failed`, `failed -> processing`) with
    /// `AppError::InvalidInput`.
    async fn update_status(
        &self,
        id: Uuid,
        next: ProcessingStatus,
    ) -> Result<VideoAsset, AppError>;

    /// Record the uploaded original's storage key and public URL.
    async fn set_original(&self, id: Uuid, key: &str, url: &str) -> Result<VideoAsset, AppError>;

    /// Record a successful packaging run: manifest, package keys, segment count
    /// and probed source info, and move the asset to `completed`.
    ///
    /// The summary must carry at least one package key and the manifest key must
    /// be one of them; violations are rejected before any write.
    async fn complete_packaging(
        &self,
        id: Uuid,
        summary: PackagingSummary,
    ) -> Result<VideoAsset, AppError>;

    /// Remove the asset record. Returns `false` when no such asset existed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
