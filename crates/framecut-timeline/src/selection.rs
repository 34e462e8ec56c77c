//! Multi-clip selection and rubber-band regions.

use std::collections::HashSet;
use uuid::Uuid;

/// A rectangle in timeline space: seconds horizontally, lanes (track rows)
/// vertically. Corners may be given in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub time_start: f64,
    pub time_end: f64,
    pub lane_start: f64,
    pub lane_end: f64,
}

impl Region {
    /// Build a normalized region from two corners.
    pub fn new(time_a: f64, time_b: f64, lane_a: f64, lane_b: f64) -> Self {
        Self {
            time_start: time_a.min(time_b),
            time_end: time_a.max(time_b),
            lane_start: lane_a.min(lane_b),
            lane_end: lane_a.max(lane_b),
        }
    }

    /// Strict overlap with a clip spanning `[start, end)` on `lane`.
    /// Touching an edge is not an overlap.
    pub fn intersects(&self, start: f64, end: f64, lane: usize) -> bool {
        let lane = lane as f64;
        strictly_overlaps(self.time_start, self.time_end, start, end)
            && strictly_overlaps(self.lane_start, self.lane_end, lane, lane + 1.0)
    }
}

#[inline]
fn strictly_overlaps(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}

/// Set of selected clip ids.
///
/// Liveness of the ids is maintained by the timeline, which prunes the set
/// whenever clips disappear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: HashSet<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was newly added.
    pub fn insert(&mut self, id: Uuid) -> bool {
        self.ids.insert(id)
    }

    /// Returns true if the id was present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        self.ids.remove(&id)
    }

    /// Flip membership. Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.ids.extend(ids);
    }

    /// Keep only ids accepted by `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(Uuid) -> bool) {
        self.ids.retain(|id| keep(*id));
    }

    pub fn ids(&self) -> &HashSet<Uuid> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
