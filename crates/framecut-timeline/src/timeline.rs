//! The timeline controller: one value owning all editing state.
//!
//! Queries live here together with the playhead, selection and zoom
//! commands. Clip and track edits are in `edit.rs`, copy/paste in
//! `clipboard.rs` and multi-event gestures in `gesture.rs`.

use std::collections::HashSet;

use framecut_core::format_timecode;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::clip::Clip;
use crate::clipboard::Clipboard;
use crate::config::TimelineConfig;
use crate::error::{EditError, EditResult};
use crate::gesture::Gesture;
use crate::playhead::Playhead;
use crate::scale::{TimeScale, ZoomChange};
use crate::selection::{Region, Selection};
use crate::store::ClipStore;
use crate::track::{Track, TrackRegistry};
use crate::undo::{Snapshot, UndoHistory};

/// Authoritative timeline editing state.
#[derive(Debug)]
pub struct Timeline {
    pub(crate) config: TimelineConfig,
    pub(crate) scale: TimeScale,
    pub(crate) tracks: TrackRegistry,
    pub(crate) clips: ClipStore,
    pub(crate) playhead: Playhead,
    pub(crate) selection: Selection,
    pub(crate) history: UndoHistory,
    pub(crate) clipboard: Clipboard,
    pub(crate) gesture: Option<Gesture>,
}

impl Timeline {
    /// Create a timeline with the default configuration (tracks V1 and A1).
    pub fn new() -> Self {
        Self::build(TimelineConfig::default())
    }

    /// Create a timeline from a validated configuration.
    pub fn with_config(config: TimelineConfig) -> framecut_core::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TimelineConfig) -> Self {
        let mut tracks = TrackRegistry::new();
        for spec in &config.default_tracks {
            if let Err(e) = tracks.add(Track::new(spec.name.clone(), spec.kind)) {
                debug!(error = %e, "Skipping default track");
            }
        }
        Self {
            scale: TimeScale::new(config.initial_scale, config.min_scale, config.max_scale),
            history: UndoHistory::new(config.undo_depth),
            tracks,
            clips: ClipStore::new(),
            playhead: Playhead::new(),
            selection: Selection::new(),
            clipboard: Clipboard::default(),
            gesture: None,
            config,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Tracks in row order.
    pub fn tracks(&self) -> &[Track] {
        self.tracks.as_slice()
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    /// Row index of a track.
    pub fn lane_of(&self, track_name: &str) -> Option<usize> {
        self.tracks.position(track_name)
    }

    /// All clips in stacking order (oldest first).
    pub fn clips(&self) -> &[Clip] {
        self.clips.as_slice()
    }

    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.get(id)
    }

    pub fn clips_on_track<'a>(&'a self, track_name: &'a str) -> impl Iterator<Item = &'a Clip> + 'a {
        self.clips.on_track(track_name)
    }

    /// `max(last clip end, min_duration) + trailing_padding`.
    pub fn timeline_duration(&self) -> f64 {
        let content = self.clips.max_end().unwrap_or(0.0);
        content.max(self.config.min_duration) + self.config.trailing_padding
    }

    pub fn playhead_time(&self) -> f64 {
        self.playhead.time()
    }

    /// Playhead x position at the current zoom.
    pub fn playhead_px(&self) -> f64 {
        self.scale.time_to_px(self.playhead.time())
    }

    /// Playhead position as `HH:MM:SS:FF`.
    pub fn timecode(&self) -> String {
        format_timecode(self.playhead.time(), self.config.timecode_fps)
    }

    pub fn selection(&self) -> &HashSet<Uuid> {
        self.selection.ids()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selection.contains(id)
    }

    /// Selected clips in stacking order.
    pub fn selected_clips(&self) -> Vec<&Clip> {
        self.clips
            .iter()
            .filter(|c| self.selection.contains(c.id))
            .collect()
    }

    /// Pixels per second.
    pub fn scale(&self) -> f64 {
        self.scale.pixels_per_second()
    }

    pub fn time_scale(&self) -> &TimeScale {
        &self.scale
    }

    /// `(x, width)` of a clip in pixels, derived from its times.
    pub fn clip_extent_px(&self, id: Uuid) -> Option<(f64, f64)> {
        self.clips.get(id).map(|c| {
            (
                self.scale.time_to_px(c.start_time),
                self.scale.time_to_px(c.duration),
            )
        })
    }

    /// Topmost clip under `time`.
    pub fn clip_at_time(&self, time: f64) -> Option<&Clip> {
        self.clips.clip_at_time(time)
    }

    /// Clip under the playhead, driving preview.
    pub fn active_clip(&self) -> Option<&Clip> {
        self.clips.clip_at_time(self.playhead.time())
    }

    /// Clips strictly overlapping a region, in stacking order.
    pub fn clips_intersecting_region(&self, region: &Region) -> Vec<Uuid> {
        self.clips
            .clips_intersecting_region(region, |name| self.tracks.position(name))
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_count()
    }

    // ── Playhead ────────────────────────────────────────────────

    /// Move the playhead, clamped to `[0, timeline_duration]`.
    pub fn move_playhead(&mut self, time: f64) -> f64 {
        let max = self.timeline_duration();
        let t = self.playhead.move_to(time, max);
        trace!(requested = time, time = t, "Playhead moved");
        t
    }

    pub fn play(&mut self) {
        if self.playhead.time() >= self.timeline_duration() {
            self.playhead.move_to(0.0, self.timeline_duration());
        }
        self.playhead.play();
        debug!(time = self.playhead.time(), "Playback started");
    }

    pub fn pause(&mut self) {
        self.playhead.pause();
        debug!(time = self.playhead.time(), "Playback paused");
    }

    pub fn is_playing(&self) -> bool {
        self.playhead.is_playing()
    }

    /// Advance playback by `elapsed` seconds and return the active clip.
    ///
    /// Ignored while a gesture is in progress so a tick never interleaves
    /// with a drag or scrub.
    pub fn tick(&mut self, elapsed: f64) -> Option<&Clip> {
        if self.gesture.is_none() {
            let max = self.timeline_duration();
            self.playhead.advance(elapsed, max);
        }
        self.active_clip()
    }

    // ── Zoom ────────────────────────────────────────────────────

    /// Scale by `factor` around `anchor_time`. Clip and playhead geometry
    /// is re-derived from time on the next query.
    pub fn zoom(&mut self, factor: f64, anchor_time: f64) -> EditResult<ZoomChange> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(EditError::InvalidZoomFactor(factor));
        }
        let change = self.scale.zoom(factor, anchor_time);
        debug!(
            from = change.previous_scale,
            to = change.scale,
            anchor = anchor_time,
            "Zoomed"
        );
        Ok(change)
    }

    /// Zoom keeping the playhead's time as the anchor.
    pub fn zoom_at_playhead(&mut self, factor: f64) -> EditResult<ZoomChange> {
        self.zoom(factor, self.playhead.time())
    }

    // ── Selection ───────────────────────────────────────────────

    /// Add a live clip to the selection.
    pub fn select(&mut self, id: Uuid) -> EditResult<()> {
        if !self.clips.contains(id) {
            return Err(EditError::ClipNotFound(id));
        }
        self.selection.insert(id);
        Ok(())
    }

    /// Replace the selection with a single clip.
    pub fn select_only(&mut self, id: Uuid) -> EditResult<()> {
        if !self.clips.contains(id) {
            return Err(EditError::ClipNotFound(id));
        }
        self.selection.clear();
        self.selection.insert(id);
        Ok(())
    }

    /// Returns true if the clip was selected.
    pub fn deselect(&mut self, id: Uuid) -> bool {
        self.selection.remove(id)
    }

    /// Flip a clip's membership. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: Uuid) -> EditResult<bool> {
        if !self.selection.contains(id) && !self.clips.contains(id) {
            return Err(EditError::ClipNotFound(id));
        }
        Ok(self.selection.toggle(id))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Rubber-band selection. Without `additive` the previous selection is
    /// dropped first. Returns the selection size.
    pub fn select_in_region(&mut self, region: Region, additive: bool) -> usize {
        let hits = self.clips_intersecting_region(&region);
        if !additive {
            self.selection.clear();
        }
        self.selection.extend(hits);
        debug!(
            region = ?region,
            additive,
            selected = self.selection.len(),
            "Region selection"
        );
        self.selection.len()
    }

    // ── Internal bookkeeping ────────────────────────────────────

    /// Capture the pre-mutation state. No-op while restoring.
    pub(crate) fn checkpoint(&mut self) {
        let snapshot = Snapshot::capture(&self.tracks, &self.clips);
        if self.history.push(snapshot) {
            trace!(depth = self.history.undo_count(), "Checkpoint");
        }
    }

    /// Bring derived state back in line after clips or tracks changed.
    pub(crate) fn settle(&mut self) {
        let clips = &self.clips;
        self.selection.retain(|id| clips.contains(id));
        let max = self.timeline_duration();
        self.playhead.reclamp(max);
        self.debug_check_invariants();
    }

    /// Replace clips and tracks with a snapshot without recording history.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.history.begin_restore();
        let (tracks, clips) = snapshot.into_parts();
        self.tracks.replace_all(tracks);
        self.clips.replace_all(clips);
        self.gesture = None;
        self.settle();
        self.history.end_restore();
    }

    pub(crate) fn current_snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.tracks, &self.clips)
    }

    fn debug_check_invariants(&self) {
        if cfg!(debug_assertions) {
            debug_assert!(!self.tracks.is_empty(), "timeline has no tracks");
            debug_assert!(self.tracks.is_consistent(), "track registry inconsistent");
            for clip in self.clips.iter() {
                debug_assert!(clip.duration > 0.0, "clip {} has duration {}", clip.id, clip.duration);
                debug_assert!(clip.start_time >= 0.0, "clip {} starts at {}", clip.id, clip.start_time);
                debug_assert!(
                    self.tracks.contains(&clip.track_name),
                    "clip {} references missing track '{}'",
                    clip.id,
                    clip.track_name
                );
            }
            let t = self.playhead.time();
            debug_assert!(t >= 0.0 && t <= self.timeline_duration(), "playhead out of range");
            debug_assert!(
                self.selection.ids().iter().all(|id| self.clips.contains(*id)),
                "selection holds a stale id"
            );
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
