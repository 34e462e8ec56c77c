//! Track types and the ordered track registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EditError, EditResult};

/// Kind of track. Clips only move between tracks of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => f.write_str("video"),
            TrackKind::Audio => f.write_str("audio"),
        }
    }
}

/// A lane on the timeline. Clips refer to it by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track name, unique within a timeline
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Row position, dense from 0
    pub order_index: usize,
    /// Is track muted
    pub muted: bool,
    /// Is track soloed
    pub solo: bool,
}

impl Track {
    /// Create a new video track.
    pub fn new_video(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Video)
    }

    /// Create a new audio track.
    pub fn new_audio(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Audio)
    }

    /// Create a track of the given kind. The registry assigns `order_index`.
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            name: name.into(),
            kind,
            order_index: 0,
            muted: false,
            solo: false,
        }
    }
}

/// Ordered set of tracks with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track. Fails if the name is taken.
    pub fn add(&mut self, mut track: Track) -> EditResult<&Track> {
        if self.contains(&track.name) {
            return Err(EditError::DuplicateTrackName { name: track.name });
        }
        track.order_index = self.tracks.len();
        self.tracks.push(track);
        Ok(&self.tracks[self.tracks.len() - 1])
    }

    /// Remove a track and renumber the rest 0..N-1 in their existing order.
    ///
    /// Refuses to remove the last remaining track. Clip cascades are the
    /// caller's job; the registry knows nothing about clips.
    pub fn remove(&mut self, name: &str) -> EditResult<Track> {
        let index = self
            .position(name)
            .ok_or_else(|| EditError::TrackNotFound { name: name.into() })?;
        if self.tracks.len() <= 1 {
            return Err(EditError::LastTrackProtected { name: name.into() });
        }
        let removed = self.tracks.remove(index);
        self.reindex();
        Ok(removed)
    }

    fn reindex(&mut self) {
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.order_index = i;
        }
    }

    pub fn get(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Row index of a track.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    /// Track at a row index.
    pub fn at(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// First track in registry order.
    pub fn first(&self) -> Option<&Track> {
        self.tracks.first()
    }

    pub fn kind_of(&self, name: &str) -> Option<TrackKind> {
        self.get(name).map(|t| t.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn as_slice(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Replace every track verbatim (undo restore).
    pub(crate) fn replace_all(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    /// Names unique and order indices dense.
    pub(crate) fn is_consistent(&self) -> bool {
        self.tracks.iter().enumerate().all(|(i, t)| {
            t.order_index == i && self.tracks[..i].iter().all(|other| other.name != t.name)
        })
    }
}
