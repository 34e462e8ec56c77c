//! Clip records.

use framecut_core::{frames_in, TimeRange};
use framecut_media::MediaInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-bounded reference to media placed on a track.
///
/// Holds no presentation handles; views key their own items by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Owning track, by name
    pub track_name: String,
    /// Timeline position in seconds
    pub start_time: f64,
    /// Length on the timeline in seconds
    pub duration: f64,
    /// Path to the source media
    pub media_path: String,
    /// Display name (source file name)
    pub name: String,
    /// Frames covered by this clip
    pub frame_count: u64,
    /// Source frame rate; 0 for degenerate media
    pub fps: f64,
    /// Set when the media could not be probed and this is a placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_warning: Option<String>,
}

impl Clip {
    /// Create a clip from probed media.
    pub fn from_media(media: &MediaInfo, track_name: impl Into<String>, start_time: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            track_name: track_name.into(),
            start_time,
            duration: media.duration,
            media_path: media.path.clone(),
            name: media.file_name(),
            frame_count: media.frame_count,
            fps: media.fps,
            probe_warning: None,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Timeline range covered by this clip.
    #[inline]
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.duration)
    }

    /// Whether `[start, end)` contains `time`.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        self.range().contains(time)
    }

    pub fn is_placeholder(&self) -> bool {
        self.probe_warning.is_some()
    }

    /// Frames in the first `offset` seconds, never more than the clip holds.
    fn frames_before(&self, offset: f64) -> u64 {
        frames_in(offset, self.fps).min(self.frame_count)
    }

    /// Cut at absolute time `at` (validated by the caller). `self` keeps the
    /// head, the returned clip is the tail with a fresh id. Tail frames are
    /// the remainder so the two counts always sum to the original.
    pub(crate) fn split_off(&mut self, at: f64) -> Clip {
        let offset = at - self.start_time;
        let head_frames = self.frames_before(offset);

        let tail = Clip {
            id: Uuid::new_v4(),
            start_time: at,
            duration: self.duration - offset,
            frame_count: self.frame_count - head_frames,
            ..self.clone()
        };

        self.duration = offset;
        self.frame_count = head_frames;
        tail
    }

    /// Move the in point to `new_start`, keeping the end fixed.
    pub(crate) fn trim_start_to(&mut self, new_start: f64) {
        let removed = new_start - self.start_time;
        let end = self.end();
        self.frame_count -= self.frames_before(removed);
        self.start_time = new_start;
        self.duration = end - new_start;
    }

    /// Move the out point to `new_end`.
    pub(crate) fn trim_end_to(&mut self, new_end: f64) {
        let kept = new_end - self.start_time;
        self.frame_count = self.frames_before(kept);
        self.duration = kept;
    }

    /// Field-wise equality ignoring the id.
    pub fn same_content(&self, other: &Clip) -> bool {
        self.track_name == other.track_name
            && self.start_time == other.start_time
            && self.duration == other.duration
            && self.media_path == other.media_path
            && self.frame_count == other.frame_count
            && self.fps == other.fps
    }
}
