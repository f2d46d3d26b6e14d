use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "processing_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// The single authoritative transition table.
    ///
    /// Forward-only, except that a failed asset may re-enter processing (retry /
    /// convert-existing). A completed asset is never mutated again.
    pub fn can_transition_to(self, next: ProcessingStatus) -> bool {
        use ProcessingStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Failed, Processing)
        )
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Video sub-stream of the probed source, when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VideoStreamInfo {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    /// Frame rate as reported by the probe, e.g. "30000/1001".
    pub frame_rate: Option<String>,
}

/// Audio sub-stream of the probed source, when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AudioStreamInfo {
    pub codec: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
}

/// Source media metadata, captured once at probe time and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SourceInfo {
    /// Duration in seconds.
    pub duration: f64,
    /// Overall container bit rate in bits per second.
    pub bit_rate: Option<u64>,
    pub video: Option<VideoStreamInfo>,
    pub audio: Option<AudioStreamInfo>,
}

/// The durable record of one logical video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAsset {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub processing_status: ProcessingStatus,
    pub is_packaged: bool,
    pub manifest_key: Option<String>,
    pub manifest_url: Option<String>,
    pub original_key: Option<String>,
    pub original_url: Option<String>,
    /// Storage keys of every file belonging to the package (manifest + segments).
    pub package_object_keys: Vec<String>,
    pub segment_count: i32,
    pub source_info: Option<SourceInfo>,
    pub file_size: i64,
    pub mime_type: String,
    pub original_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoAsset {
    /// The key reconciliation checks first: the original, falling back to the manifest.
    pub fn primary_object_key(&self) -> Option<&str> {
        self.original_key
            .as_deref()
            .or(self.manifest_key.as_deref())
    }
}

/// Fields supplied by the uploader when a new asset record is created (pending state).
#[derive(Debug, Clone)]
pub struct NewVideoAsset {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub file_size: i64,
    pub mime_type: String,
    pub original_name: String,
}

/// Write payload applied to an asset when packaging succeeds.
#[derive(Debug, Clone)]
pub struct PackagingSummary {
    pub manifest_key: String,
    pub manifest_url: String,
    pub package_object_keys: Vec<String>,
    pub segment_count: i32,
    pub source_info: SourceInfo,
}

/// Public projection of a VideoAsset.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoAssetResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub processing_status: ProcessingStatus,
    pub is_packaged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    pub segment_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// "WxH" of the source video stream, when probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub file_size: i64,
    pub mime_type: String,
    pub original_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VideoAsset> for VideoAssetResponse {
    fn from(asset: VideoAsset) -> Self {
        let duration = asset.source_info.as_ref().map(|info| info.duration);
        let resolution = asset
            .source_info
            .as_ref()
            .and_then(|info| info.video.as_ref())
            .map(|v| format!("{}x{}", v.width, v.height));

        VideoAssetResponse {
            id: asset.id,
            title: asset.title,
            description: asset.description,
            tags: asset.tags,
            is_public: asset.is_public,
            processing_status: asset.processing_status,
            is_packaged: asset.is_packaged,
            manifest_url: asset.manifest_url,
            original_url: asset.original_url,
            segment_count: asset.segment_count,
            duration,
            resolution,
            file_size: asset.file_size,
            mime_type: asset.mime_type,
            original_name: asset.original_name,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_asset() -> VideoAsset {
        let now = Utc::now();
        VideoAsset {
            id: Uuid::new_v4(),
            title: "Test Clip".to_string(),
            description: None,
            tags: vec!["calm".to_string()],
            is_public: true,
            processing_status: ProcessingStatus::Completed,
            is_packaged: true,
            manifest_key: Some("videos/hls/abc/playlist.m3u8".to_string()),
            manifest_url: Some("https://cdn.example.com/videos/hls/abc/playlist.m3u8".to_string()),
            original_key: Some("videos/original/abc.mp4".to_string()),
            original_url: Some("https://cdn.example.com/videos/original/abc.mp4".to_string()),
            package_object_keys: vec![
                "videos/hls/abc/playlist.m3u8".to_string(),
                "videos/hls/abc/segment_000.ts".to_string(),
            ],
            segment_count: 1,
            source_info: Some(SourceInfo {
                duration: 5.0,
                bit_rate: Some(1_200_000),
                video: Some(VideoStreamInfo {
                    codec: "h264".to_string(),
                    width: 640,
                    height: 360,
                    frame_rate: Some("30/1".to_string()),
                }),
                audio: Some(AudioStreamInfo {
                    codec: "aac".to_string(),
                    sample_rate: Some(48000),
                    channels: Some(2),
                }),
            }),
            file_size: 1_048_576,
            mime_type: "video/mp4".to_string(),
            original_name: "test-clip.mp4".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_transition_table() {
        use ProcessingStatus::*;

        // Allowed
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Failed.can_transition_to(Processing));

        // Forbidden
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Processing));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ProcessingStatus::Processing).expect("serialize");
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_response_projection() {
        let asset = test_asset();
        let response = VideoAssetResponse::from(asset);
        assert_eq!(response.duration, Some(5.0));
        assert_eq!(response.resolution.as_deref(), Some("640x360"));
        assert_eq!(response.segment_count, 1);
        assert!(response.is_packaged);
        assert!(response
            .manifest_url
            .as_deref()
            .is_some_and(|u| u.ends_with("/playlist.m3u8")));
    }

    #[test]
    fn test_primary_object_key_prefers_original() {
        let asset = test_asset();
        assert_eq!(asset.primary_object_key(), Some("videos/original/abc.mp4"));

        let mut no_original = test_asset();
        no_original.original_key = None;
        assert_eq!(
            no_original.primary_object_key(),
            Some("videos/hls/abc/playlist.m3u8")
        );
    }

    #[test]
    fn test_source_info_round_trips_as_json() {
        let asset = test_asset();
        let info = asset.source_info.expect("source info");
        let value = serde_json::to_value(&info).expect("to json");
        let back: SourceInfo = serde_json::from_value(value).expect("from json");
        assert_eq!(back, info);
    }
}
