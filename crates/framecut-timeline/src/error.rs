//! Error types for timeline editing.
//!
//! Every variant is an expected, recoverable condition. A command that
//! returns one of these has left the timeline untouched.

use thiserror::Error;
use uuid::Uuid;

/// Reasons a timeline command can be refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("A track named '{name}' already exists")]
    DuplicateTrackName { name: String },

    #[error("Track '{name}' is the last track and cannot be deleted")]
    LastTrackProtected { name: String },

    #[error("No tracks available to place the clip on")]
    NoTracksAvailable,

    #[error("Track not found: {name}")]
    TrackNotFound { name: String },

    #[error("Clip not found: {0}")]
    ClipNotFound(Uuid),

    #[error("Split time {at:.3}s is outside clip {id} ({start:.3}s..{end:.3}s)")]
    SplitOutOfRange {
        id: Uuid,
        at: f64,
        start: f64,
        end: f64,
    },

    #[error("Trim point {at:.3}s is outside clip {id} ({start:.3}s..{end:.3}s)")]
    TrimOutOfRange {
        id: Uuid,
        at: f64,
        start: f64,
        end: f64,
    },

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// Not returned by `add_media`, which degrades to a placeholder clip;
    /// the message is stored on the clip as its probe warning.
    #[error("Could not read media '{path}': {reason}")]
    MediaProbeFailed { path: String, reason: String },

    #[error("Invalid zoom factor: {0}")]
    InvalidZoomFactor(f64),

    #[error("No clip under the playhead")]
    NoClipAtPlayhead,

    #[error("A gesture is in progress")]
    GestureInProgress,

    #[error("No matching gesture is in progress")]
    NoActiveGesture,
}

/// Result type alias for timeline commands.
pub type EditResult<T> = std::result::Result<T, EditError>;
