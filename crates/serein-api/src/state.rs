use std::sync::Arc;

use serein_core::Config;
use serein_db::AssetStore;
use serein_processing::IngestionPipeline;
use serein_storage::ObjectStorage;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn AssetStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub pipeline: Arc<IngestionPipeline>,
}
