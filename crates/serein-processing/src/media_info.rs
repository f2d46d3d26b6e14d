//! ffprobe output parsing.
//!
//! Kept separate from process execution so the parser can be exercised on
//! captured probe output without ffprobe installed.

use anyhow::{anyhow, Context, Result};
use serein_core::models::{AudioStreamInfo, SourceInfo, VideoStreamInfo};

/// Parse `ffprobe -print_format json -show_format -show_streams` output.
///
/// Duration is mandatory; the video and audio stream blocks are optional
/// (audio-less clips and cover streams both occur in the wild).
pub fn parse_probe_output(output: &[u8]) -> Result<SourceInfo> {
    let probe: serde_json::Value =
        serde_json::from_slice(output).context("Failed to parse ffprobe output")?;

    let format = &probe["format"];

    let duration = format["duration"]
        .as_str()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| anyhow!("Could not parse duration"))?;

    let bit_rate = format["bit_rate"]
        .as_str()
        .and_then(|b| b.parse::<u64>().ok());

    let streams = probe["streams"].as_array().cloned().unwrap_or_default();

    let video = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .and_then(|s| {
            let width = s["width"].as_u64()? as u32;
            let height = s["height"].as_u64()? as u32;
            Some(VideoStreamInfo {
                codec: s["codec_name"].as_str().unwrap_or("unknown").to_string(),
                width,
                height,
                frame_rate: s["r_frame_rate"].as_str().map(String::from),
            })
        });

    let audio = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("audio"))
        .map(|s| AudioStreamInfo {
            codec: s["codec_name"].as_str().unwrap_or("unknown").to_string(),
            sample_rate: s["sample_rate"]
                .as_str()
                .and_then(|r| r.parse::<u32>().ok()),
            channels: s["channels"].as_u64().map(|c| c as u32),
        });

    Ok(SourceInfo {
        duration,
        bit_rate,
        video,
        audio,
    })
}
