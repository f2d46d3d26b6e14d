//! Serein Processing Library
//!
//! The ingestion side of the media service: upload validation, per-run scratch
//! workspaces, the ffprobe/ffmpeg transcoding adapter, and the pipeline that
//! strings them together with object storage and the asset catalog.

pub mod ffmpeg;
pub mod media_info;
pub mod pipeline;
pub mod validator;
pub mod workspace;

pub use ffmpeg::{FfmpegService, PackageDescriptor, TranscodeError, Transcoder};
pub use pipeline::{
    DeletionReport, IngestionPipeline, OrphanedObject, PipelineError, SyncReport, UploadRequest,
};
pub use validator::{UploadValidator, ValidationError};
pub use workspace::{Workspace, WorkspaceManager};
