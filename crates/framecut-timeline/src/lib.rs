//! Framecut Timeline - Editing model for a non-linear video editor
//!
//! Owns everything a timeline view edits and keeps it consistent:
//! - Named video/audio tracks and the clips placed on them
//! - Playhead, selection and zoom scale
//! - Split, trim, move, delete, copy/paste
//! - Snapshot undo/redo and multi-event gestures (drag, scrub, rubber band)
//!
//! The model never touches pixels or codecs. Geometry is derived from time
//! through [`TimeScale`] on every query.

pub mod clip;
pub mod clipboard;
pub mod config;
pub mod edit;
pub mod error;
pub mod gesture;
pub mod playhead;
pub mod scale;
pub mod selection;
pub mod shared;
pub mod store;
pub mod timeline;
pub mod track;
pub mod undo;

pub use clip::Clip;
pub use clipboard::{Clipboard, ClipboardEntry};
pub use config::{TimelineConfig, TrackSpec};
pub use edit::MoveOutcome;
pub use error::{EditError, EditResult};
pub use gesture::{ClipDrag, DragOrigin, Gesture, RegionSelect, Scrub};
pub use playhead::Playhead;
pub use scale::{TimeScale, ZoomChange};
pub use selection::{Region, Selection};
pub use shared::{spawn_playback, PlaybackEvent, PlaybackThread, SharedTimeline};
pub use store::ClipStore;
pub use timeline::Timeline;
pub use track::{Track, TrackKind, TrackRegistry};
pub use undo::{Snapshot, UndoHistory};
