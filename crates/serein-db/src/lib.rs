//! Serein DB Library
//!
//! Postgres-backed persistence for the media catalog. The `AssetStore` trait is
//! the seam the ingestion pipeline depends on; `AssetRepository` is its sqlx
//! implementation. Status transitions are validated here, so no caller can move
//! an asset through an illegal state change.

pub mod assets;
pub mod store;

pub use assets::AssetRepository;
pub use store::AssetStore;

/// Embedded migrations, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
