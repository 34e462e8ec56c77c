//! Clip storage and spatial/temporal queries.

use uuid::Uuid;

use crate::clip::Clip;
use crate::selection::Region;

/// All live clips, kept in insertion order.
///
/// Insertion order doubles as stacking order: later clips sit on top, which
/// is how overlapping clips are resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipStore {
    clips: Vec<Clip>,
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip on top of the stack.
    pub fn insert(&mut self, clip: Clip) {
        debug_assert!(self.get(clip.id).is_none(), "duplicate clip id {}", clip.id);
        self.clips.push(clip);
    }

    pub fn get(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Remove a clip by id. Returns the removed clip.
    pub fn remove(&mut self, id: Uuid) -> Option<Clip> {
        let pos = self.clips.iter().position(|c| c.id == id)?;
        Some(self.clips.remove(pos))
    }

    /// Remove every clip on a track. Returns the removed ids.
    pub fn remove_on_track(&mut self, track_name: &str) -> Vec<Uuid> {
        let mut removed = Vec::new();
        self.clips.retain(|c| {
            if c.track_name == track_name {
                removed.push(c.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Drop every clip.
    pub fn clear(&mut self) {
        self.clips.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter()
    }

    pub fn as_slice(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clips on a track, in stacking order.
    pub fn on_track<'a>(&'a self, track_name: &'a str) -> impl Iterator<Item = &'a Clip> + 'a {
        self.clips.iter().filter(move |c| c.track_name == track_name)
    }

    /// Latest end time of any clip, if there are clips.
    pub fn max_end(&self) -> Option<f64> {
        self.clips.iter().map(Clip::end).reduce(f64::max)
    }

    /// Topmost clip whose `[start, end)` contains `time`.
    pub fn clip_at_time(&self, time: f64) -> Option<&Clip> {
        self.clips.iter().rev().find(|c| c.contains(time))
    }

    /// Ids of clips strictly overlapping `region`, in stacking order.
    ///
    /// A clip occupies `[start, end)` horizontally and `[lane, lane + 1)`
    /// vertically; `lane_of` maps its track name to a lane.
    pub fn clips_intersecting_region<F>(&self, region: &Region, lane_of: F) -> Vec<Uuid>
    where
        F: Fn(&str) -> Option<usize>,
    {
        self.clips
            .iter()
            .filter(|c| {
                lane_of(&c.track_name)
                    .map(|lane| region.intersects(c.start_time, c.end(), lane))
                    .unwrap_or(false)
            })
            .map(|c| c.id)
            .collect()
    }

    /// Replace every clip verbatim (undo restore).
    pub(crate) fn replace_all(&mut self, clips: Vec<Clip>) {
        self.clips = clips;
    }
}
