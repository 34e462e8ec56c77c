//! Time representation for timeline editing
//!
//! Timeline positions are floating-point seconds. Pixel geometry is always
//! derived from these values, never the other way around, so conversions do
//! not compound across zoom steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack applied before flooring a frame count, so that values such as
/// `0.7 * 30.0 = 20.999999999999996` still count as 21 frames.
const FRAME_FLOOR_SLACK: f64 = 1e-9;

/// Number of whole frames covered by `duration` seconds at `fps`.
///
/// Degenerate inputs (fps of zero, negative or non-finite values) count as
/// zero frames instead of dividing or overflowing.
#[inline]
pub fn frames_in(duration: f64, fps: f64) -> u64 {
    if !fps.is_finite() || fps <= 0.0 || !duration.is_finite() || duration <= 0.0 {
        return 0;
    }
    (duration * fps + FRAME_FLOOR_SLACK).floor() as u64
}

/// Format seconds as `HH:MM:SS:FF` using `fps` for the frame field.
pub fn format_timecode(seconds: f64, fps: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole = seconds.floor() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    let frames = frames_in(seconds.fract(), fps);
    format!("{hours:02}:{minutes:02}:{secs:02}:{frames:02}")
}

/// A time range with inclusive start and exclusive end, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: f64,
    /// Duration of the range
    pub duration: f64,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> f64 {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if `time` lies strictly inside the range, at least `epsilon`
    /// away from either boundary.
    #[inline]
    pub fn contains_strictly(self, time: f64, epsilon: f64) -> bool {
        time > self.start + epsilon && time < self.end() - epsilon
    }

    /// Strict overlap: ranges that only touch at a boundary do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start.max(other.start) < self.end().min(other.end())
    }

    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: 0.0,
        duration: 0.0,
    };
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}s, {:.3}s)", self.start, self.end())
    }
}
