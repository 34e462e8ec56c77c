//! Copy/paste of clip groups.
//!
//! Entries store media references and offsets, never clip ids, so a paste
//! always produces fresh clips.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;
use uuid::Uuid;

use crate::clip::Clip;
use crate::error::{EditError, EditResult};
use crate::timeline::Timeline;

/// One copied clip, positioned relative to the earliest copied start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub media_path: String,
    pub name: String,
    pub duration: f64,
    pub frame_count: u64,
    pub fps: f64,
    pub track_name: String,
    /// Offset from the group's earliest start, in seconds
    pub relative_start: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe_warning: Option<String>,
}

impl ClipboardEntry {
    fn from_clip(clip: &Clip, origin: f64) -> Self {
        Self {
            media_path: clip.media_path.clone(),
            name: clip.name.clone(),
            duration: clip.duration,
            frame_count: clip.frame_count,
            fps: clip.fps,
            track_name: clip.track_name.clone(),
            relative_start: clip.start_time - origin,
            probe_warning: clip.probe_warning.clone(),
        }
    }

    fn to_clip(&self, track_name: &str, start_time: f64) -> Clip {
        Clip {
            id: Uuid::new_v4(),
            track_name: track_name.to_string(),
            start_time,
            duration: self.duration,
            media_path: self.media_path.clone(),
            name: self.name.clone(),
            frame_count: self.frame_count,
            fps: self.fps,
            probe_warning: self.probe_warning.clone(),
        }
    }
}

/// The most recent copy. Replaced wholesale by each `copy`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    entries: Vec<ClipboardEntry>,
}

impl Clipboard {
    pub fn entries(&self) -> &[ClipboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Timeline {
    /// Copy the selected clips. Returns the number of entries copied.
    pub fn copy(&mut self) -> EditResult<usize> {
        let selected = self.selected_clips();
        if selected.is_empty() {
            return Err(EditError::EmptySelection);
        }
        let origin = selected
            .iter()
            .map(|c| c.start_time)
            .fold(f64::INFINITY, f64::min);
        let entries: Vec<ClipboardEntry> = selected
            .iter()
            .map(|c| ClipboardEntry::from_clip(c, origin))
            .collect();

        debug!(count = entries.len(), origin, "Copied clips");
        self.clipboard.entries = entries;
        Ok(self.clipboard.len())
    }

    /// Paste the clipboard so its earliest clip starts at `target_time`.
    ///
    /// Entries whose track no longer exists land on the first track. The
    /// pasted clips become the selection.
    pub fn paste(&mut self, target_time: f64) -> EditResult<SmallVec<[Uuid; 4]>> {
        if self.clipboard.is_empty() {
            return Err(EditError::EmptyClipboard);
        }
        let fallback = match self.tracks.first() {
            Some(track) => track.name.clone(),
            None => return Err(EditError::NoTracksAvailable),
        };
        let target = if target_time.is_finite() {
            target_time.max(0.0)
        } else {
            0.0
        };

        let pasted: Vec<Clip> = self
            .clipboard
            .entries
            .iter()
            .map(|entry| {
                let track = if self.tracks.contains(&entry.track_name) {
                    entry.track_name.as_str()
                } else {
                    fallback.as_str()
                };
                entry.to_clip(track, target + entry.relative_start)
            })
            .collect();

        self.checkpoint();
        let ids: SmallVec<[Uuid; 4]> = pasted.iter().map(|c| c.id).collect();
        for clip in pasted {
            self.clips.insert(clip);
        }
        self.selection.clear();
        self.selection.extend(ids.iter().copied());
        debug!(count = ids.len(), target, "Pasted clips");
        self.settle();
        Ok(ids)
    }
}
