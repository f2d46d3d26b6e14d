//! Serein Storage Library
//!
//! Object-storage abstraction for the media pipeline. Objects are addressed by key;
//! the key layout is centralized in the `keys` module:
//!
//! - originals: `videos/original/{asset_id}.{ext}`
//! - HLS manifests: `videos/hls/{asset_id}/playlist.m3u8`
//! - HLS segments: `videos/hls/{asset_id}/segment_{NNN}.ts`
//!
//! Keys must not contain `..` or a leading `/`. Deletion is the one operation that
//! gets retries (`retry::delete_object_with_retry`); its failures are reported as
//! values, never propagated, so callers can keep cleaning up other objects.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod retry;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use retry::{delete_object_with_retry, DeleteOutcome};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
