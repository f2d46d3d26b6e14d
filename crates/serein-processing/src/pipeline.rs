//! Ingestion orchestration: validate → stage → probe → record → upload original →
//! package → upload package → complete. Deletion and reconciliation live here too,
//! built on the same three seams (catalog, object storage, transcoder).

use std::path::Path;
use std::sync::Arc;

use serein_core::constants::DELETE_RETRY_MAX_ATTEMPTS;
use serein_core::models::{
    NewVideoAsset, PackagingSummary, ProcessingStatus, SourceInfo, VideoAsset,
};
use serein_core::AppError;
use serein_db::AssetStore;
use serein_storage::keys;
use serein_storage::{delete_object_with_retry, DeleteOutcome, ObjectStorage};
use uuid::Uuid;

use crate::ffmpeg::Transcoder;
use crate::validator::{UploadValidator, ValidationError};
use crate::workspace::{Workspace, WorkspaceManager};

/// Pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Packaging failed: {0}")]
    Packaging(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Storage backend error: {0}")]
    Storage(String),

    #[error("Video asset {0} not found")]
    NotFound(Uuid),

    #[error("Video asset {0} is already packaged")]
    AlreadyPackaged(Uuid),

    #[error(transparent)]
    Store(#[from] AppError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Upload payload handed to the pipeline by the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one asset deletion: the record is always gone; object outcomes are
/// inspected afterwards for warnings.
#[derive(Debug)]
pub struct DeletionReport {
    pub asset_id: Uuid,
    pub bucket: String,
    pub outcomes: Vec<DeleteOutcome>,
}

impl DeletionReport {
    pub fn fully_deleted(&self) -> bool {
        self.outcomes.iter().all(DeleteOutcome::succeeded)
    }

    /// One human-readable warning per object that could not be confirmed deleted.
    pub fn warnings(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| {
                format!(
                    "Object {} in bucket {} could not be confirmed deleted after {} attempts: {}",
                    o.key,
                    self.bucket,
                    o.attempts,
                    o.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }
}

/// One record whose stored object could not be found during reconciliation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrphanedObject {
    pub asset_id: Uuid,
    pub key: String,
    pub bucket: String,
}

/// Read-only catalog-vs-storage comparison.
#[derive(Debug, serde::Serialize)]
pub struct SyncReport {
    pub total: usize,
    pub present: usize,
    pub orphaned: usize,
    pub orphans: Vec<OrphanedObject>,
}

/// The ingestion orchestrator. One sequential unit of work per call; all shared
/// collaborators are behind traits so tests run without Postgres, S3 or ffmpeg.
pub struct IngestionPipeline {
    store: Arc<dyn AssetStore>,
    storage: Arc<dyn ObjectStorage>,
    transcoder: Arc<dyn Transcoder>,
    workspaces: WorkspaceManager,
    validator: UploadValidator,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn AssetStore>,
        storage: Arc<dyn ObjectStorage>,
        transcoder: Arc<dyn Transcoder>,
        workspaces: WorkspaceManager,
        validator: UploadValidator,
    ) -> Self {
        Self {
            store,
            storage,
            transcoder,
            workspaces,
            validator,
        }
    }

    /// Full upload pipeline. Validation happens before any workspace or record
    /// exists; once a record exists, every failure leaves it in an auditable
    /// state (`failed`, original retained when it was uploaded).
    #[tracing::instrument(skip(self, request), fields(title = %request.title, size = request.bytes.len()))]
    pub async fn ingest(&self, request: UploadRequest) -> Result<VideoAsset, PipelineError> {
        self.validator
            .validate(request.bytes.len(), &request.content_type)?;

        let workspace = self.workspaces.acquire().await?;

        let staging_path = workspace.path().join("source");
        tokio::fs::write(&staging_path, &request.bytes).await?;

        // Probe before touching storage or the catalog: a broken file leaves no trace.
        let source_info = self
            .transcoder
            .probe(&staging_path)
            .await
            .map_err(|e| PipelineError::Probe(e.to_string()))?;

        let asset_id = Uuid::new_v4();
        let asset = self
            .store
            .create(NewVideoAsset {
                id: asset_id,
                title: request.title.clone(),
                description: request.description.clone(),
                tags: request.tags.clone(),
                is_public: request.is_public,
                file_size: request.bytes.len() as i64,
                mime_type: request.content_type.clone(),
                original_name: request.file_name.clone(),
            })
            .await?;

        tracing::info!(asset_id = %asset.id, "Asset record created");

        self.store
            .update_status(asset_id, ProcessingStatus::Processing)
            .await?;

        let original_key = keys::original_key(asset_id, &request.file_name);
        let original_url = match self
            .storage
            .put_object(&original_key, request.bytes.clone(), &request.content_type)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.mark_failed(asset_id).await;
                return Err(PipelineError::Upload(e.to_string()));
            }
        };
        self.store
            .set_original(asset_id, &original_key, &original_url)
            .await?;

        let completed = self
            .package_and_publish(
                asset_id,
                &staging_path,
                &workspace,
                &request.content_type,
                source_info,
            )
            .await?;

        workspace.release().await;
        Ok(completed)
    }

    /// Re-run packaging for an existing, not-yet-packaged asset using its stored
    /// original. The stored `source_info` is not trusted; the original is
    /// re-probed.
    #[tracing::instrument(skip(self))]
    pub async fn convert(&self, asset_id: Uuid) -> Result<VideoAsset, PipelineError> {
        let asset = self
            .store
            .find_by_id(asset_id)
            .await?
            .ok_or(PipelineError::NotFound(asset_id))?;

        if asset.is_packaged {
            return Err(PipelineError::AlreadyPackaged(asset_id));
        }

        let original_key = asset.original_key.clone().ok_or_else(|| {
            PipelineError::Storage(format!("Asset {} has no stored original", asset_id))
        })?;

        let workspace = self.workspaces.acquire().await?;

        let bytes = self
            .storage
            .get_object(&original_key)
            .await
            .map_err(|e| PipelineError::Storage(e.to_string()))?;

        let staging_path = workspace.path().join("source");
        tokio::fs::write(&staging_path, &bytes).await?;

        let source_info = self
            .transcoder
            .probe(&staging_path)
            .await
            .map_err(|e| PipelineError::Probe(e.to_string()))?;

        self.store
            .update_status(asset_id, ProcessingStatus::Processing)
            .await?;

        let completed = self
            .package_and_publish(
                asset_id,
                &staging_path,
                &workspace,
                &asset.mime_type,
                source_info,
            )
            .await?;

        workspace.release().await;
        Ok(completed)
    }

    /// Remove an asset: retry-delete every stored object, then drop the record
    /// unconditionally. Surviving objects are reported, never fatal.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, asset_id: Uuid) -> Result<DeletionReport, PipelineError> {
        let asset = self
            .store
            .find_by_id(asset_id)
            .await?
            .ok_or(PipelineError::NotFound(asset_id))?;

        let mut targets = asset.package_object_keys.clone();
        if let Some(ref key) = asset.original_key {
            targets.push(key.clone());
        }

        let mut outcomes = Vec::with_capacity(targets.len());
        for key in &targets {
            outcomes
                .push(delete_object_with_retry(&*self.storage, key, DELETE_RETRY_MAX_ATTEMPTS).await);
        }

        self.store.delete(asset_id).await?;

        let report = DeletionReport {
            asset_id,
            bucket: self.storage.bucket().to_string(),
            outcomes,
        };

        if report.fully_deleted() {
            tracing::info!(asset_id = %asset_id, objects = targets.len(), "Asset fully deleted");
        } else {
            tracing::warn!(
                asset_id = %asset_id,
                surviving = report.warnings().len(),
                "Asset record deleted with unconfirmed objects"
            );
        }

        Ok(report)
    }

    /// Retry-delete one raw storage key; resolves warnings from earlier deletes.
    pub async fn cleanup_object(&self, key: &str) -> DeleteOutcome {
        delete_object_with_retry(&*self.storage, key, DELETE_RETRY_MAX_ATTEMPTS).await
    }

    /// Compare every catalog record against storage. Read-only. A record whose
    /// primary object cannot be confirmed present is an orphan; records that
    /// have no stored object yet (still pending) are counted in `total` only.
    /// Backend failures propagate instead of being misreported as orphans.
    #[tracing::instrument(skip(self))]
    pub async fn sync_report(&self) -> Result<SyncReport, PipelineError> {
        let assets = self.store.list(None).await?;
        let total = assets.len();
        let bucket = self.storage.bucket().to_string();

        let mut present = 0;
        let mut orphans = Vec::new();

        for asset in &assets {
            let Some(key) = asset.primary_object_key() else {
                continue;
            };

            let exists = self
                .storage
                .object_exists(key)
                .await
                .map_err(|e| PipelineError::Storage(e.to_string()))?;

            if exists {
                present += 1;
            } else {
                orphans.push(OrphanedObject {
                    asset_id: asset.id,
                    key: key.to_string(),
                    bucket: bucket.clone(),
                });
            }
        }

        Ok(SyncReport {
            total,
            present,
            orphaned: orphans.len(),
            orphans,
        })
    }

    /// Package the staged source and publish the result: every package file is
    /// uploaded before the catalog learns about any of it, so a `completed`
    /// record never references a missing object.
    async fn package_and_publish(
        &self,
        asset_id: Uuid,
        staging_path: &Path,
        workspace: &Workspace,
        fallback_content_type: &str,
        source_info: SourceInfo,
    ) -> Result<VideoAsset, PipelineError> {
        let output_dir = workspace.subdir("hls").await?;

        let descriptor = match self.transcoder.package(staging_path, &output_dir).await {
            Ok(d) => d,
            Err(e) => {
                self.mark_failed(asset_id).await;
                return Err(PipelineError::Packaging(e.to_string()));
            }
        };

        let mut package_object_keys = Vec::with_capacity(descriptor.files.len());
        for file in &descriptor.files {
            let file_name = match file.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    self.mark_failed(asset_id).await;
                    return Err(PipelineError::Packaging(format!(
                        "Invalid package file path: {}",
                        file.display()
                    )));
                }
            };

            // A descriptor entry that cannot be read back is a packaging failure;
            // the record must not stay in `processing`.
            let data = match tokio::fs::read(file).await {
                Ok(d) => d,
                Err(e) => {
                    self.mark_failed(asset_id).await;
                    return Err(PipelineError::Packaging(format!(
                        "Failed to read package file {}: {}",
                        file.display(),
                        e
                    )));
                }
            };
            let key = keys::package_key(asset_id, file_name);
            let content_type = keys::content_type_for(file_name, fallback_content_type);

            if let Err(e) = self.storage.put_object(&key, data, content_type).await {
                self.mark_failed(asset_id).await;
                return Err(PipelineError::Upload(e.to_string()));
            }
            package_object_keys.push(key);
        }

        let manifest_key = keys::package_key(asset_id, keys::MANIFEST_FILE_NAME);
        let manifest_url = self.storage.url_for(&manifest_key);

        let asset = self
            .store
            .complete_packaging(
                asset_id,
                PackagingSummary {
                    manifest_key,
                    manifest_url,
                    package_object_keys,
                    segment_count: descriptor.segment_count,
                    source_info,
                },
            )
            .await?;

        tracing::info!(
            asset_id = %asset_id,
            segment_count = asset.segment_count,
            "Asset packaging completed"
        );

        Ok(asset)
    }

    /// Best-effort transition to `failed`; the original pipeline error must win.
    async fn mark_failed(&self, asset_id: Uuid) {
        if let Err(e) = self
            .store
            .update_status(asset_id, ProcessingStatus::Failed)
            .await
        {
            tracing::error!(asset_id = %asset_id, error = %e, "Failed to mark asset as failed");
        }
    }
}
