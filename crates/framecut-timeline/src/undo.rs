//! Snapshot-based undo/redo history.
//!
//! Every mutating command pushes a snapshot of the state *before* it runs.
//! Undo swaps the current state onto the redo stack and restores the
//! snapshot; redo does the reverse.

use crate::clip::Clip;
use crate::store::ClipStore;
use crate::track::{Track, TrackRegistry};

/// Immutable deep copy of the editable timeline state.
///
/// Tracks are captured alongside clips so a restored clip never refers to a
/// track that no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    tracks: Vec<Track>,
    clips: Vec<Clip>,
}

impl Snapshot {
    pub(crate) fn capture(tracks: &TrackRegistry, clips: &ClipStore) -> Self {
        Self {
            tracks: tracks.as_slice().to_vec(),
            clips: clips.as_slice().to_vec(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub(crate) fn into_parts(self) -> (Vec<Track>, Vec<Clip>) {
        (self.tracks, self.clips)
    }
}

/// Undo/redo history stack.
#[derive(Debug)]
pub struct UndoHistory {
    /// States before each executed command (most recent last).
    undo: Vec<Snapshot>,
    /// States replaced by undo (most recent last).
    redo: Vec<Snapshot>,
    /// Maximum history depth.
    max_depth: usize,
    /// Set while a snapshot is being restored; pushes are ignored.
    restoring: bool,
}

impl UndoHistory {
    /// Create a new history with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
            restoring: false,
        }
    }

    /// Record the pre-mutation state. Clears the redo stack (a new action
    /// invalidates redo history). Ignored while restoring.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        if self.restoring {
            return false;
        }
        self.redo.clear();
        push_bounded(&mut self.undo, snapshot, self.max_depth);
        true
    }

    /// Pop the most recent snapshot for undo, parking `current` for redo.
    pub fn take_undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo.pop()?;
        push_bounded(&mut self.redo, current, self.max_depth);
        Some(snapshot)
    }

    /// Pop the most recent undone snapshot, parking `current` for undo.
    pub fn take_redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo.pop()?;
        push_bounded(&mut self.undo, current, self.max_depth);
        Some(snapshot)
    }

    pub(crate) fn begin_restore(&mut self) {
        debug_assert!(!self.restoring, "nested undo restore");
        self.restoring = true;
    }

    pub(crate) fn end_restore(&mut self) {
        self.restoring = false;
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(20)
    }
}

fn push_bounded(stack: &mut Vec<Snapshot>, snapshot: Snapshot, max_depth: usize) {
    stack.push(snapshot);
    if stack.len() > max_depth {
        stack.remove(0);
    }
}
