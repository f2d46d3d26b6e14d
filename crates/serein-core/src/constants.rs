//! Shared constants.

/// Upload size ceiling for video payloads (2 GiB).
pub const MAX_VIDEO_UPLOAD_BYTES: usize = 2 * 1024 * 1024 * 1024;

/// Target duration of one HLS media segment, in seconds.
pub const DEFAULT_SEGMENT_DURATION_SECS: u64 = 10;

/// Maximum attempts for a single object deletion before the failure is reported.
pub const DELETE_RETRY_MAX_ATTEMPTS: u32 = 3;

/// Base delay of the deletion backoff schedule (2s, then 4s).
pub const DELETE_RETRY_BASE_DELAY_SECS: u64 = 2;
