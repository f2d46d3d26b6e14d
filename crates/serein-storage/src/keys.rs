//! Shared key generation and content-type mapping for storage backends.
//!
//! Key layout: `videos/original/{asset_id}.{ext}` for originals,
//! `videos/hls/{asset_id}/playlist.m3u8` and `videos/hls/{asset_id}/segment_{NNN}.ts`
//! for package members. Keys are namespaced per asset id so collisions cannot occur
//! across assets.

use std::path::Path;
use uuid::Uuid;

/// File name of the HLS entry-point manifest.
pub const MANIFEST_FILE_NAME: &str = "playlist.m3u8";

/// Prefix of segment file names (zero-padded numeric suffix, `.ts` extension).
pub const SEGMENT_FILE_PREFIX: &str = "segment_";

/// Storage key for the unmodified uploaded file.
pub fn original_key(asset_id: Uuid, original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    format!("videos/original/{}.{}", asset_id, ext)
}

/// Prefix under which all package files of one asset live.
pub fn package_prefix(asset_id: Uuid) -> String {
    format!("videos/hls/{}", asset_id)
}

/// Storage key for one file of an asset's package, given its file name on disk.
pub fn package_key(asset_id: Uuid, file_name: &str) -> String {
    format!("{}/{}", package_prefix(asset_id), file_name)
}

/// Content type for one package file, by extension.
///
/// Manifest files map to `application/vnd.apple.mpegurl`, segments to `video/mp2t`;
/// anything else keeps the caller-supplied fallback.
pub fn content_type_for<'a>(file_name: &str, fallback: &'a str) -> &'a str {
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some("m3u8") => "application/vnd.apple.mpegurl",
        Some("ts") => "video/mp2t",
        _ => fallback,
    }
}

/// Numeric suffix of a segment file name, or `None` if the name is not a
/// segment. The suffix is parsed numerically so `segment_1000.ts` orders after
/// `segment_101.ts` once the zero padding overflows.
pub fn segment_index(file_name: &str) -> Option<u64> {
    file_name
        .strip_prefix(SEGMENT_FILE_PREFIX)?
        .strip_suffix(".ts")?
        .parse()
        .ok()
}

/// Whether a package file name is a media segment (vs. the manifest).
pub fn is_segment_file(file_name: &str) -> bool {
    segment_index(file_name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_key_uses_lowercased_extension() {
        let id = Uuid::nil();
        assert_eq!(
            original_key(id, "My Clip.MP4"),
            format!("videos/original/{}.mp4", id)
        );
    }

    #[test]
    fn test_original_key_without_extension_falls_back() {
        let id = Uuid::nil();
        assert_eq!(
            original_key(id, "upload"),
            format!("videos/original/{}.bin", id)
        );
    }

    #[test]
    fn test_package_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            package_key(id, MANIFEST_FILE_NAME),
            format!("videos/hls/{}/playlist.m3u8", id)
        );
        assert_eq!(
            package_key(id, "segment_007.ts"),
            format!("videos/hls/{}/segment_007.ts", id)
        );
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(
            content_type_for("playlist.m3u8", "video/mp4"),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(content_type_for("segment_000.ts", "video/mp4"), "video/mp2t");
        assert_eq!(content_type_for("clip.mp4", "video/mp4"), "video/mp4");
    }

    #[test]
    fn test_is_segment_file() {
        assert!(is_segment_file("segment_000.ts"));
        assert!(is_segment_file("segment_123.ts"));
        assert!(!is_segment_file("playlist.m3u8"));
        assert!(!is_segment_file("segment_000.m3u8"));
        assert!(!is_segment_file("segment_tmp.ts"));
    }

    #[test]
    fn test_segment_index_parses_numeric_suffix() {
        assert_eq!(segment_index("segment_000.ts"), Some(0));
        assert_eq!(segment_index("segment_042.ts"), Some(42));
        assert_eq!(segment_index("segment_1000.ts"), Some(1000));
        assert_eq!(segment_index("playlist.m3u8"), None);
        assert_eq!(segment_index("segment_.ts"), None);
    }
}
