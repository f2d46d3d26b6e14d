//! Application setup and initialization
//!
//! Wires configuration, database, storage and the ingestion pipeline into the
//! shared `AppState`, then builds the router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use serein_core::Config;
use serein_db::{AssetRepository, AssetStore};
use serein_processing::{FfmpegService, IngestionPipeline, Transcoder, UploadValidator, WorkspaceManager};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    let pool = database::setup_database(&config).await?;
    let store: Arc<dyn AssetStore> = Arc::new(AssetRepository::new(pool));

    let storage = storage::setup_storage(&config).await?;

    let transcoder: Arc<dyn Transcoder> = Arc::new(FfmpegService::new(
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.hls_segment_duration,
    )?);
    let workspaces = WorkspaceManager::new(&config.workspace_root);
    let validator = UploadValidator::new(config.max_video_size_bytes);

    let pipeline = Arc::new(IngestionPipeline::new(
        store.clone(),
        storage.clone(),
        transcoder,
        workspaces,
        validator,
    ));

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        storage,
        pipeline,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
