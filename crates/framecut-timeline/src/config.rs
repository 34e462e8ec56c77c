//! Timeline tunables.
//!
//! Loaded from JSON; every field is optional and falls back to the default.

use framecut_core::{FramecutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::track::TrackKind;

/// A track created when a timeline is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSpec {
    pub name: String,
    pub kind: TrackKind,
}

impl TrackSpec {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Configuration for a `Timeline` instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Pixels per second on a fresh timeline.
    pub initial_scale: f64,
    /// Lower zoom bound (pixels per second).
    pub min_scale: f64,
    /// Upper zoom bound (pixels per second).
    pub max_scale: f64,
    /// Snap grid for clip placement, in pixels.
    pub grid_px: f64,
    /// Maximum number of undo steps kept.
    pub undo_depth: usize,
    /// Timeline duration floor before padding, in seconds.
    pub min_duration: f64,
    /// Seconds appended after the last clip.
    pub trailing_padding: f64,
    /// Split and trim points closer than this to a clip edge are rejected.
    pub edit_epsilon: f64,
    /// Duration given to clips whose media could not be probed.
    pub placeholder_duration: f64,
    /// Frame rate used for the ruler timecode.
    pub timecode_fps: f64,
    /// Tracks created with the timeline, in order.
    pub default_tracks: Vec<TrackSpec>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            initial_scale: 100.0,
            min_scale: 10.0,
            max_scale: 500.0,
            grid_px: 10.0,
            undo_depth: 20,
            min_duration: 10.0,
            trailing_padding: 5.0,
            edit_epsilon: 1e-3,
            placeholder_duration: 1.0,
            timecode_fps: 30.0,
            default_tracks: vec![
                TrackSpec::new("V1", TrackKind::Video),
                TrackSpec::new("A1", TrackKind::Audio),
            ],
        }
    }
}

impl TimelineConfig {
    /// Deserialize from JSON bytes and validate.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| FramecutError::Serialization(format!("Invalid timeline config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| FramecutError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("min_scale", self.min_scale),
            ("grid_px", self.grid_px),
            ("trailing_padding", self.trailing_padding),
            ("edit_epsilon", self.edit_epsilon),
            ("placeholder_duration", self.placeholder_duration),
            ("timecode_fps", self.timecode_fps),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{field} must be positive, got {value}")));
            }
        }
        if !(self.min_duration.is_finite() && self.min_duration >= 0.0) {
            return Err(invalid(format!(
                "min_duration must be non-negative, got {}",
                self.min_duration
            )));
        }
        if !(self.min_scale <= self.initial_scale && self.initial_scale <= self.max_scale) {
            return Err(invalid(format!(
                "initial_scale {} must lie within [{}, {}]",
                self.initial_scale, self.min_scale, self.max_scale
            )));
        }
        if self.undo_depth == 0 {
            return Err(invalid("undo_depth must be at least 1".into()));
        }
        if self.default_tracks.is_empty() {
            return Err(invalid("at least one default track is required".into()));
        }
        let mut seen = HashSet::new();
        for spec in &self.default_tracks {
            if !seen.insert(spec.name.as_str()) {
                return Err(invalid(format!("duplicate default track '{}'", spec.name)));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> FramecutError {
    FramecutError::InvalidParameter(msg)
}
