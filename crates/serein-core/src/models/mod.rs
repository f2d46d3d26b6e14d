pub mod asset;

pub use asset::{
    AudioStreamInfo, NewVideoAsset, PackagingSummary, ProcessingStatus, SourceInfo, VideoAsset,
    VideoAssetResponse, VideoStreamInfo,
};
