//! FfmpegService - probing and HLS packaging via external processes.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serein_core::models::SourceInfo;
use serein_storage::keys::{segment_index, MANIFEST_FILE_NAME};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::media_info::parse_probe_output;

/// Transcoding adapter errors
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Packaging failed: {0}")]
    Packaging(String),
}

/// Result of one packaging run: the manifest plus every produced file, in upload
/// order (manifest first, segments in numeric order).
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    pub manifest_path: PathBuf,
    pub files: Vec<PathBuf>,
    pub segment_count: i32,
}

/// Probing and packaging seam between the pipeline and the external binaries.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Extract source metadata. Fatal on any probe failure; the pipeline aborts
    /// before creating records or uploading anything.
    async fn probe(&self, source: &Path) -> Result<SourceInfo, TranscodeError>;

    /// Produce an HLS package under `output_dir`. Partial on-disk output after a
    /// failure is fine; the caller destroys the workspace either way.
    async fn package(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<PackageDescriptor, TranscodeError>;
}

fn validate_binary_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) || path.contains("..") {
        return Err(anyhow!("Binary path contains unsafe characters: {}", path));
    }
    Ok(())
}

/// Runs the real `ffmpeg`/`ffprobe` binaries.
#[derive(Clone)]
pub struct FfmpegService {
    ffmpeg_path: String,
    ffprobe_path: String,
    segment_duration: u64,
}

impl FfmpegService {
    pub fn new(
        ffmpeg_path: String,
        ffprobe_path: String,
        segment_duration: u64,
    ) -> Result<Self> {
        validate_binary_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        validate_binary_path(&ffprobe_path).context("Invalid ffprobe_path")?;

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
            segment_duration,
        })
    }
}

#[async_trait]
impl Transcoder for FfmpegService {
    #[tracing::instrument(skip(self, source), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, source: &Path) -> Result<SourceInfo, TranscodeError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(source)
            .output()
            .await
            .map_err(|e| TranscodeError::Probe(format!("Failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            return Err(TranscodeError::Probe(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        parse_probe_output(&output.stdout).map_err(|e| TranscodeError::Probe(e.to_string()))
    }

    #[tracing::instrument(skip(self, source, output_dir), fields(
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "hls_package"
    ))]
    async fn package(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<PackageDescriptor, TranscodeError> {
        let manifest_path = output_dir.join(MANIFEST_FILE_NAME);
        let segment_pattern = output_dir.join("segment_%03d.ts");
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffmpeg_path)
            .arg("-i")
            .arg(source)
            .args([
                "-c:v",
                "libx264",
                "-preset",
                "fast",
                "-profile:v",
                "main",
                "-c:a",
                "aac",
                "-b:a",
                "128k",
                "-f",
                "hls",
                "-hls_time",
            ])
            .arg(self.segment_duration.to_string())
            .args(["-hls_playlist_type", "vod", "-hls_segment_filename"])
            .arg(&segment_pattern)
            .arg(&manifest_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TranscodeError::Packaging(format!("Failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            return Err(TranscodeError::Packaging(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let descriptor = collect_package_files(output_dir, &manifest_path)
            .await
            .map_err(|e| TranscodeError::Packaging(e.to_string()))?;

        tracing::info!(
            segment_count = descriptor.segment_count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "HLS package generated"
        );

        Ok(descriptor)
    }
}

/// Scan a packaging output directory into a descriptor. Segments are ordered by
/// their zero-padded file names; the manifest always leads the upload list.
pub async fn collect_package_files(
    output_dir: &Path,
    manifest_path: &Path,
) -> Result<PackageDescriptor> {
    if !tokio::fs::try_exists(manifest_path).await.unwrap_or(false) {
        return Err(anyhow!(
            "Packaging produced no manifest at {}",
            manifest_path.display()
        ));
    }

    let mut segments = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir)
        .await
        .context("Failed to read packaging output directory")?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(index) = segment_index(&name) {
            segments.push((index, path));
        }
    }

    if segments.is_empty() {
        return Err(anyhow!("Packaging produced no segments"));
    }

    // Numeric order, not lexical: ffmpeg's %03d pattern grows past three
    // digits and segment_1000.ts must follow segment_999.ts.
    segments.sort_by_key(|(index, _)| *index);

    let mut files = Vec::with_capacity(segments.len() + 1);
    files.push(manifest_path.to_path_buf());
    let segment_count = segments.len() as i32;
    files.extend(segments.into_iter().map(|(_, path)| path));

    Ok(PackageDescriptor {
        manifest_path: manifest_path.to_path_buf(),
        files,
        segment_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_collect_orders_manifest_first_then_segments() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE_NAME);
        tokio::fs::write(&manifest, "#EXTM3U").await.unwrap();
        // Written out of order on purpose.
        for n in [2, 0, 1] {
            tokio::fs::write(dir.path().join(format!("segment_{:03}.ts", n)), "seg")
                .await
                .unwrap();
        }
        // Stray file that is not part of the package.
        tokio::fs::write(dir.path().join("ffmpeg2pass-0.log"), "log")
            .await
            .unwrap();

        let descriptor = collect_package_files(dir.path(), &manifest).await.unwrap();

        assert_eq!(descriptor.segment_count, 3);
        assert_eq!(descriptor.files.len(), 4);
        assert_eq!(descriptor.files[0], manifest);
        let names: Vec<_> = descriptor.files[1..]
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["segment_000.ts", "segment_001.ts", "segment_002.ts"]);
    }

    #[tokio::test]
    async fn test_collect_orders_segments_numerically_past_padding() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE_NAME);
        tokio::fs::write(&manifest, "#EXTM3U").await.unwrap();
        // Once %03d overflows three digits, lexical order would put
        // segment_1000.ts before segment_101.ts.
        for name in ["segment_1000.ts", "segment_099.ts", "segment_101.ts"] {
            tokio::fs::write(dir.path().join(name), "seg").await.unwrap();
        }

        let descriptor = collect_package_files(dir.path(), &manifest).await.unwrap();

        let names: Vec<_> = descriptor.files[1..]
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["segment_099.ts", "segment_101.ts", "segment_1000.ts"]);
    }

    #[tokio::test]
    async fn test_collect_requires_manifest() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("segment_000.ts"), "seg")
            .await
            .unwrap();

        let result = collect_package_files(dir.path(), &dir.path().join(MANIFEST_FILE_NAME)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_collect_requires_segments() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE_NAME);
        tokio::fs::write(&manifest, "#EXTM3U").await.unwrap();

        let result = collect_package_files(dir.path(), &manifest).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_unsafe_binary_paths_rejected() {
        assert!(FfmpegService::new("ffmpeg; rm -rf /".to_string(), "ffprobe".to_string(), 10).is_err());
        assert!(FfmpegService::new("ffmpeg".to_string(), "../ffprobe".to_string(), 10).is_err());
        assert!(FfmpegService::new("/usr/bin/ffmpeg".to_string(), "/usr/bin/ffprobe".to_string(), 10).is_ok());
    }
}
