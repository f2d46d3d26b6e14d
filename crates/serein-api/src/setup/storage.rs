//! Storage backend setup

use anyhow::{Context, Result};
use serein_core::Config;
use serein_storage::ObjectStorage;
use std::sync::Arc;

/// Build the object storage client from configuration.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    let storage = serein_storage::create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = ?config.storage_backend,
        bucket = storage.bucket(),
        "Storage backend initialized"
    );

    Ok(storage)
}
