//! Serein Core Library
//!
//! Shared domain types for the serein media service: the `VideoAsset` model and its
//! processing-status state machine, the unified `AppError` type, configuration, and
//! constants. Higher-level crates (storage, db, processing, api) all build on this one.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
