//! Media file probing to get timeline metadata without decoding.

use framecut_core::{frames_in, FramecutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Timeline-relevant metadata for a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// File path
    pub path: String,
    /// Duration in seconds
    pub duration: f64,
    /// Number of video frames (0 when unknown or audio-only)
    pub frame_count: u64,
    /// Frames per second (0 when unknown or audio-only)
    pub fps: f64,
}

impl MediaInfo {
    /// Create a new media description.
    pub fn new(path: impl Into<String>, duration: f64, frame_count: u64, fps: f64) -> Self {
        Self {
            path: path.into(),
            duration,
            frame_count,
            fps,
        }
    }

    /// Display name: the file name component of the path.
    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone())
    }

    /// True when fps is zero, so frame arithmetic is short-circuited.
    pub fn is_degenerate(&self) -> bool {
        !(self.fps.is_finite() && self.fps > 0.0)
    }
}

/// Source of media metadata.
///
/// The timeline never opens media itself; hosts hand it a probe.
pub trait MediaProbe {
    /// Return metadata for `path`, or an error if the file is unreadable.
    fn probe(&self, path: &Path) -> Result<MediaInfo>;
}

// ── ffprobe ─────────────────────────────────────────────────────

/// Probe backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl FfprobeProbe {
    /// Use the ffprobe binary that ffmpeg-sidecar resolves (sidecar or PATH).
    pub fn new() -> Self {
        Self {
            binary: ffmpeg_sidecar::ffprobe::ffprobe_path(),
        }
    }

    /// Use an explicit ffprobe binary.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the binary this probe runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(FramecutError::NotFound(format!(
                "File not found: {}",
                path_str
            )));
        }

        debug!(binary = %self.binary.display(), path = %path_str, "Running ffprobe");
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=r_frame_rate,avg_frame_rate,nb_frames:format=duration",
                "-of",
                "json",
            ])
            .arg(path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FramecutError::Probe(format!(
                "ffprobe failed for {}: {}",
                path_str,
                stderr.trim()
            )));
        }

        let info = parse_ffprobe_json(&output.stdout, &path_str)?;
        info!(
            path = %path_str,
            duration = info.duration,
            frames = info.frame_count,
            fps = info.fps,
            "Probed media"
        );
        Ok(info)
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Parse the JSON printed by `ffprobe -of json`.
pub fn parse_ffprobe_json(data: &[u8], path: &str) -> Result<MediaInfo> {
    let output: FfprobeOutput = serde_json::from_slice(data)
        .map_err(|e| FramecutError::Serialization(format!("Invalid ffprobe output: {}", e)))?;

    let duration = output
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| FramecutError::Probe(format!("No duration reported for {}", path)))?;

    let (fps, frame_count) = match output.streams.first() {
        Some(stream) => {
            let fps = stream
                .avg_frame_rate
                .as_deref()
                .and_then(parse_rate)
                .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate))
                .unwrap_or(0.0);
            let frames = stream
                .nb_frames
                .as_deref()
                .and_then(|n| n.trim().parse::<u64>().ok())
                .unwrap_or_else(|| frames_in(duration, fps));
            (fps, frames)
        }
        // Audio-only media
        None => (0.0, 0),
    };

    Ok(MediaInfo::new(path, duration, frame_count, fps))
}

/// Parse an ffprobe rational such as `30000/1001`. `0/0` yields `None`.
fn parse_rate(rate: &str) -> Option<f64> {
    let (num, den) = match rate.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (rate.trim().parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}

// ── Static table ────────────────────────────────────────────────

/// Probe answering from an in-memory table, for hosts that already hold
/// metadata (e.g. from a media browser) and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    entries: HashMap<PathBuf, MediaInfo>,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for its path.
    pub fn insert(&mut self, info: MediaInfo) {
        self.entries.insert(PathBuf::from(&info.path), info);
    }

    /// Builder-style `insert`.
    pub fn with(mut self, info: MediaInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MediaProbe for StaticProbe {
    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        self.entries.get(path).cloned().ok_or_else(|| {
            FramecutError::NotFound(format!("No metadata for {}", path.display()))
        })
    }
}
