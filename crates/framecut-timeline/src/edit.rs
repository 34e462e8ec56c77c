//! Edit operations with undo/redo support.
//!
//! Every command validates first, then records a snapshot of the untouched
//! state, then mutates. A refused command therefore never leaves a history
//! entry behind.

use std::path::Path;

use framecut_media::{MediaInfo, MediaProbe};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clip::Clip;
use crate::error::{EditError, EditResult};
use crate::timeline::Timeline;
use crate::track::{Track, TrackKind};

/// Where a moved clip ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// Grid-snapped start time
    pub start_time: f64,
    /// Track the clip is on after the move
    pub track_name: String,
    /// True when the requested track had a different kind and was ignored
    pub track_change_rejected: bool,
}

impl Timeline {
    // ── Tracks ──────────────────────────────────────────────────

    /// Append a track. Refused while a gesture is in progress, since drags
    /// address tracks by row.
    pub fn add_track(&mut self, name: &str, kind: TrackKind) -> EditResult<()> {
        self.ensure_idle()?;
        if self.tracks.contains(name) {
            return Err(EditError::DuplicateTrackName { name: name.into() });
        }
        self.checkpoint();
        self.tracks.add(Track::new(name, kind))?;
        info!(track = name, kind = %kind, "Track added");
        self.settle();
        Ok(())
    }

    /// Delete a track and every clip on it. Returns the removed clip ids.
    pub fn delete_track(&mut self, name: &str) -> EditResult<Vec<Uuid>> {
        self.ensure_idle()?;
        if !self.tracks.contains(name) {
            return Err(EditError::TrackNotFound { name: name.into() });
        }
        if self.tracks.len() <= 1 {
            return Err(EditError::LastTrackProtected { name: name.into() });
        }
        self.checkpoint();
        let removed = self.clips.remove_on_track(name);
        self.tracks.remove(name)?;
        info!(track = name, clips = removed.len(), "Track deleted");
        self.settle();
        Ok(removed)
    }

    pub fn set_track_muted(&mut self, name: &str, muted: bool) -> EditResult<()> {
        self.update_track_flag(name, muted, |t| &mut t.muted)
    }

    pub fn set_track_solo(&mut self, name: &str, solo: bool) -> EditResult<()> {
        self.update_track_flag(name, solo, |t| &mut t.solo)
    }

    fn update_track_flag(
        &mut self,
        name: &str,
        value: bool,
        field: fn(&mut Track) -> &mut bool,
    ) -> EditResult<()> {
        self.ensure_idle()?;
        let current = match self.tracks.get_mut(name) {
            Some(track) => *field(track),
            None => return Err(EditError::TrackNotFound { name: name.into() }),
        };
        if current == value {
            return Ok(());
        }
        self.checkpoint();
        if let Some(track) = self.tracks.get_mut(name) {
            *field(track) = value;
        }
        debug!(track = name, value, "Track flag changed");
        Ok(())
    }

    // ── Adding clips ────────────────────────────────────────────

    /// Place media on `track_name` at a grid-snapped start.
    pub fn add_clip(&mut self, media: &MediaInfo, track_name: &str, start_hint: f64) -> EditResult<Uuid> {
        self.ensure_placeable(track_name)?;
        Ok(self.place(media, track_name, start_hint, None))
    }

    /// Probe `path` and place the result. A probe failure still adds the
    /// clip, as a placeholder carrying the failure as its warning.
    pub fn add_media(
        &mut self,
        probe: &dyn MediaProbe,
        path: impl AsRef<Path>,
        track_name: &str,
        start_hint: f64,
    ) -> EditResult<Uuid> {
        self.ensure_placeable(track_name)?;
        let path = path.as_ref();
        match probe.probe(path) {
            Ok(media) => Ok(self.place(&media, track_name, start_hint, None)),
            Err(e) => {
                let failure = EditError::MediaProbeFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                };
                warn!(path = %path.display(), error = %e, "Probe failed, adding placeholder clip");
                let media = MediaInfo::new(path.to_string_lossy(), 0.0, 0, 0.0);
                Ok(self.place(&media, track_name, start_hint, Some(failure.to_string())))
            }
        }
    }

    fn ensure_placeable(&self, track_name: &str) -> EditResult<()> {
        if self.tracks.is_empty() {
            return Err(EditError::NoTracksAvailable);
        }
        if !self.tracks.contains(track_name) {
            return Err(EditError::TrackNotFound {
                name: track_name.into(),
            });
        }
        Ok(())
    }

    fn place(&mut self, media: &MediaInfo, track_name: &str, start_hint: f64, warning: Option<String>) -> Uuid {
        let start = self.snap(start_hint);
        let clip = self.build_clip(media, track_name, start, warning);
        let id = clip.id;
        self.checkpoint();
        debug!(clip = %id, track = track_name, start, duration = clip.duration, "Clip added");
        self.clips.insert(clip);
        self.settle();
        id
    }

    /// Clip record for `media`, with degenerate metadata made safe.
    fn build_clip(
        &self,
        media: &MediaInfo,
        track_name: &str,
        start: f64,
        mut warning: Option<String>,
    ) -> Clip {
        let mut clip = Clip::from_media(media, track_name, start.max(0.0));
        if !(clip.duration.is_finite() && clip.duration > 0.0) {
            clip.duration = self.config.placeholder_duration;
            clip.frame_count = 0;
            warning.get_or_insert_with(|| {
                format!("Media '{}' reported no usable duration", media.path)
            });
        }
        if !(clip.fps.is_finite() && clip.fps > 0.0) {
            clip.fps = 0.0;
            clip.frame_count = 0;
        }
        clip.probe_warning = warning;
        clip
    }

    /// Grid-snap a requested start at the current zoom.
    fn snap(&self, time: f64) -> f64 {
        if !time.is_finite() {
            return 0.0;
        }
        self.scale.snap(time, self.config.grid_px)
    }

    // ── Moving ──────────────────────────────────────────────────

    /// Move a clip to a grid-snapped start and, if the kinds match, to
    /// `new_track_name`. A kind mismatch keeps the current track but still
    /// applies the new start.
    pub fn move_clip(&mut self, id: Uuid, new_start_hint: f64, new_track_name: &str) -> EditResult<MoveOutcome> {
        let clip = self.clips.get(id).ok_or(EditError::ClipNotFound(id))?;
        if !self.tracks.contains(new_track_name) {
            return Err(EditError::TrackNotFound {
                name: new_track_name.into(),
            });
        }
        let outcome = self.resolve_move(&clip.track_name, new_start_hint, new_track_name);

        self.checkpoint();
        self.apply_move(id, &outcome);
        if outcome.track_change_rejected {
            warn!(clip = %id, target = new_track_name, "Track change rejected: kind mismatch");
        }
        self.settle();
        Ok(outcome)
    }

    /// Work out the landing spot of a clip currently on `current_track`.
    pub(crate) fn resolve_move(&self, current_track: &str, start_hint: f64, target_track: &str) -> MoveOutcome {
        let start_time = self.snap(start_hint);
        if target_track == current_track {
            return MoveOutcome {
                start_time,
                track_name: current_track.to_string(),
                track_change_rejected: false,
            };
        }
        let compatible = match (self.tracks.kind_of(current_track), self.tracks.kind_of(target_track)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        MoveOutcome {
            start_time,
            track_name: if compatible { target_track } else { current_track }.to_string(),
            track_change_rejected: !compatible,
        }
    }

    pub(crate) fn apply_move(&mut self, id: Uuid, outcome: &MoveOutcome) {
        if let Some(clip) = self.clips.get_mut(id) {
            clip.start_time = outcome.start_time;
            if clip.track_name != outcome.track_name {
                clip.track_name = outcome.track_name.clone();
            }
        }
    }

    // ── Split & trim ────────────────────────────────────────────

    /// Cut a clip at `at_time`. The clip keeps the head; the tail is a
    /// new clip whose id is returned.
    pub fn split_clip(&mut self, id: Uuid, at_time: f64) -> EditResult<Uuid> {
        let clip = self.clips.get(id).ok_or(EditError::ClipNotFound(id))?;
        if !clip.range().contains_strictly(at_time, self.config.edit_epsilon) {
            return Err(EditError::SplitOutOfRange {
                id,
                at: at_time,
                start: clip.start_time,
                end: clip.end(),
            });
        }

        self.checkpoint();
        let tail = match self.clips.get_mut(id) {
            Some(head) => head.split_off(at_time),
            None => return Err(EditError::ClipNotFound(id)),
        };
        let tail_id = tail.id;
        debug!(clip = %id, tail = %tail_id, at = at_time, "Clip split");
        self.clips.insert(tail);
        self.settle();
        Ok(tail_id)
    }

    /// Split the clip under the playhead.
    pub fn split_at_playhead(&mut self) -> EditResult<Uuid> {
        let at = self.playhead.time();
        let id = self
            .clips
            .clip_at_time(at)
            .map(|c| c.id)
            .ok_or(EditError::NoClipAtPlayhead)?;
        self.split_clip(id, at)
    }

    /// Move a clip's in point to `new_start`, keeping its end.
    pub fn trim_start(&mut self, id: Uuid, new_start: f64) -> EditResult<()> {
        self.check_trim_point(id, new_start)?;
        self.checkpoint();
        if let Some(clip) = self.clips.get_mut(id) {
            clip.trim_start_to(new_start);
            debug!(clip = %id, start = new_start, frames = clip.frame_count, "Trimmed start");
        }
        self.settle();
        Ok(())
    }

    /// Move a clip's out point to `new_end`.
    pub fn trim_end(&mut self, id: Uuid, new_end: f64) -> EditResult<()> {
        self.check_trim_point(id, new_end)?;
        self.checkpoint();
        if let Some(clip) = self.clips.get_mut(id) {
            clip.trim_end_to(new_end);
            debug!(clip = %id, end = new_end, frames = clip.frame_count, "Trimmed end");
        }
        self.settle();
        Ok(())
    }

    pub fn trim_start_to_playhead(&mut self, id: Uuid) -> EditResult<()> {
        self.trim_start(id, self.playhead.time())
    }

    pub fn trim_end_to_playhead(&mut self, id: Uuid) -> EditResult<()> {
        self.trim_end(id, self.playhead.time())
    }

    fn check_trim_point(&self, id: Uuid, at: f64) -> EditResult<()> {
        let clip = self.clips.get(id).ok_or(EditError::ClipNotFound(id))?;
        if clip.range().contains_strictly(at, self.config.edit_epsilon) {
            Ok(())
        } else {
            Err(EditError::TrimOutOfRange {
                id,
                at,
                start: clip.start_time,
                end: clip.end(),
            })
        }
    }

    // ── Deleting ────────────────────────────────────────────────

    /// Remove a clip. Unknown ids are a no-op returning false.
    pub fn delete_clip(&mut self, id: Uuid) -> bool {
        if !self.clips.contains(id) {
            return false;
        }
        self.checkpoint();
        self.clips.remove(id);
        debug!(clip = %id, "Clip deleted");
        self.settle();
        true
    }

    /// Remove every selected clip as one undo step. Returns how many.
    pub fn delete_selected(&mut self) -> usize {
        let ids: Vec<Uuid> = self.selected_clips().iter().map(|c| c.id).collect();
        if ids.is_empty() {
            return 0;
        }
        self.checkpoint();
        for id in &ids {
            self.clips.remove(*id);
        }
        debug!(count = ids.len(), "Selected clips deleted");
        self.settle();
        ids.len()
    }

    /// Remove all clips and rewind the playhead.
    pub fn clear_clips(&mut self) {
        if !self.clips.is_empty() {
            self.checkpoint();
            self.clips.clear();
        }
        self.playhead.move_to(0.0, self.timeline_duration());
        info!("Timeline cleared");
        self.settle();
    }

    // ── History ─────────────────────────────────────────────────

    /// Restore the state before the most recent command.
    pub fn undo(&mut self) -> EditResult<()> {
        let current = self.current_snapshot();
        let snapshot = self.history.take_undo(current).ok_or(EditError::NothingToUndo)?;
        self.restore(snapshot);
        info!(
            clips = self.clips.len(),
            remaining = self.history.undo_count(),
            "Undo"
        );
        Ok(())
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self) -> EditResult<()> {
        let current = self.current_snapshot();
        let snapshot = self.history.take_redo(current).ok_or(EditError::NothingToRedo)?;
        self.restore(snapshot);
        info!(
            clips = self.clips.len(),
            remaining = self.history.redo_count(),
            "Redo"
        );
        Ok(())
    }
}
