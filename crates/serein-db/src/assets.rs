use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serein_core::models::{
    NewVideoAsset, PackagingSummary, ProcessingStatus, SourceInfo, VideoAsset,
};
use serein_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::store::AssetStore;

/// Row shape of the `video_assets` table.
#[derive(Debug, sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    tags: Vec<String>,
    is_public: bool,
    processing_status: ProcessingStatus,
    is_packaged: bool,
    manifest_key: Option<String>,
    manifest_url: Option<String>,
    original_key: Option<String>,
    original_url: Option<String>,
    package_object_keys: Vec<String>,
    segment_count: i32,
    source_info: Option<serde_json::Value>,
    file_size: i64,
    mime_type: String,
    original_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssetRow {
    fn into_asset(self) -> Result<VideoAsset, AppError> {
        let source_info: Option<SourceInfo> = self
            .source_info
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| {
                AppError::Internal(format!("Corrupt source_info for asset {}: {}", self.id, e))
            })?;

        Ok(VideoAsset {
            id: self.id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            is_public: self.is_public,
            processing_status: self.processing_status,
            is_packaged: self.is_packaged,
            manifest_key: self.manifest_key,
            manifest_url: self.manifest_url,
            original_key: self.original_key,
            original_url: self.original_url,
            package_object_keys: self.package_object_keys,
            segment_count: self.segment_count,
            source_info,
            file_size: self.file_size,
            mime_type: self.mime_type,
            original_name: self.original_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Postgres-backed asset catalog
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_row(&self, id: Uuid) -> Result<Option<AssetRow>, AppError> {
        let row: Option<AssetRow> =
            sqlx::query_as::<Postgres, AssetRow>("SELECT * FROM video_assets WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn require_asset(&self, id: Uuid) -> Result<VideoAsset, AppError> {
        self.fetch_row(id)
            .await?
            .map(AssetRow::into_asset)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Video asset {} not found", id)))
    }
}

#[async_trait]
impl AssetStore for AssetRepository {
    #[tracing::instrument(skip(self, new_asset), fields(db.table = "video_assets", db.operation = "insert"))]
    async fn create(&self, new_asset: NewVideoAsset) -> Result<VideoAsset, AppError> {
        let row: AssetRow = sqlx::query_as::<Postgres, AssetRow>(
            r#"
            INSERT INTO video_assets (
                id, title, description, tags, is_public,
                processing_status, file_size, mime_type, original_name
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_asset.id)
        .bind(&new_asset.title)
        .bind(&new_asset.description)
        .bind(&new_asset.tags)
        .bind(new_asset.is_public)
        .bind(new_asset.file_size)
        .bind(&new_asset.mime_type)
        .bind(&new_asset.original_name)
        .fetch_one(&self.pool)
        .await?;

        row.into_asset()
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "select"))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError> {
        self.fetch_row(id).await?.map(AssetRow::into_asset).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "select"))]
    async fn list(&self, packaged: Option<bool>) -> Result<Vec<VideoAsset>, AppError> {
        let rows: Vec<AssetRow> = match packaged {
            None => {
                sqlx::query_as::<Postgres, AssetRow>(
                    "SELECT * FROM video_assets ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            Some(flag) => {
                sqlx::query_as::<Postgres, AssetRow>(
                    "SELECT * FROM video_assets WHERE is_packaged = $1 ORDER BY created_at DESC",
                )
                .bind(flag)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(AssetRow::into_asset).collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "update"))]
    async fn update_status(
        &self,
        id: Uuid,
        next: ProcessingStatus,
    ) -> Result<VideoAsset, AppError> {
        let current = self.require_asset(id).await?;

        if !current.processing_status.can_transition_to(next) {
            return Err(AppError::InvalidInput(format!(
                "Illegal status transition {} -> {} for asset {}",
                current.processing_status, next, id
            )));
        }

        // Guarded on the observed status so a concurrent writer cannot sneak an
        // asset through a transition that was only valid from the old state.
        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(
            r#"
            UPDATE video_assets
            SET processing_status = $2, updated_at = NOW()
            WHERE id = $1 AND processing_status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(current.processing_status)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => r.into_asset(),
            None => Err(AppError::InvalidInput(format!(
                "Asset {} was concurrently modified; status transition to {} aborted",
                id, next
            ))),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "update"))]
    async fn set_original(&self, id: Uuid, key: &str, url: &str) -> Result<VideoAsset, AppError> {
        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(
            r#"
            UPDATE video_assets
            SET original_key = $2, original_url = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(key)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => r.into_asset(),
            None => Err(AppError::NotFound(format!("Video asset {} not found", id))),
        }
    }

    #[tracing::instrument(skip(self, summary), fields(db.table = "video_assets", db.operation = "update"))]
    async fn complete_packaging(
        &self,
        id: Uuid,
        summary: PackagingSummary,
    ) -> Result<VideoAsset, AppError> {
        if summary.package_object_keys.is_empty() {
            return Err(AppError::InvalidInput(
                "Packaging summary carries no package keys".to_string(),
            ));
        }
        if !summary
            .package_object_keys
            .iter()
            .any(|k| k == &summary.manifest_key)
        {
            return Err(AppError::InvalidInput(format!(
                "Manifest key {} is not among the package keys",
                summary.manifest_key
            )));
        }

        let current = self.require_asset(id).await?;
        if !current
            .processing_status
            .can_transition_to(ProcessingStatus::Completed)
        {
            return Err(AppError::InvalidInput(format!(
                "Cannot complete packaging for asset {} in status {}",
                id, current.processing_status
            )));
        }

        let source_info = serde_json::to_value(&summary.source_info)
            .map_err(|e| AppError::Internal(format!("Failed to serialize source info: {}", e)))?;

        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(
            r#"
            UPDATE video_assets
            SET manifest_key = $2,
                manifest_url = $3,
                package_object_keys = $4,
                segment_count = $5,
                source_info = $6,
                is_packaged = TRUE,
                processing_status = 'completed',
                updated_at = NOW()
            WHERE id = $1 AND processing_status = 'processing'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&summary.manifest_key)
        .bind(&summary.manifest_url)
        .bind(&summary.package_object_keys)
        .bind(summary.segment_count)
        .bind(source_info)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => r.into_asset(),
            None => Err(AppError::InvalidInput(format!(
                "Asset {} left processing state before packaging completion was recorded",
                id
            ))),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "delete"))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM video_assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
