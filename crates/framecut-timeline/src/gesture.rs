//! Multi-event interactions: clip drag, playhead scrub and rubber-band
//! selection.
//!
//! A gesture records its origin when it begins. Each update carries the
//! total offset from that origin, so rounding never accumulates across
//! pointer events. Only one gesture runs at a time.

use std::collections::HashSet;

use smallvec::SmallVec;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EditError, EditResult};
use crate::selection::Region;
use crate::timeline::Timeline;

/// The gesture currently in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    ClipDrag(ClipDrag),
    Scrub(Scrub),
    RegionSelect(RegionSelect),
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::ClipDrag(_) => "clip drag",
            Gesture::Scrub(_) => "scrub",
            Gesture::RegionSelect(_) => "region select",
        }
    }
}

/// Where a dragged clip was when the drag began.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOrigin {
    pub id: Uuid,
    pub start_time: f64,
    pub track_name: String,
    pub lane: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipDrag {
    origins: SmallVec<[DragOrigin; 4]>,
    delta_time: f64,
    lane_delta: isize,
    /// Set once the drag has moved something and holds an undo step
    recorded: bool,
}

impl ClipDrag {
    pub fn origins(&self) -> &[DragOrigin] {
        &self.origins
    }

    /// Offset of the last update, in seconds and lanes.
    pub fn delta(&self) -> (f64, isize) {
        (self.delta_time, self.lane_delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrub {
    origin_time: f64,
    delta: f64,
}

impl Scrub {
    pub fn origin_time(&self) -> f64 {
        self.origin_time
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSelect {
    anchor_time: f64,
    anchor_lane: f64,
    current_time: f64,
    current_lane: f64,
    /// Selection kept underneath the band for additive selection
    base: HashSet<Uuid>,
}

impl RegionSelect {
    /// The band spanned so far.
    pub fn region(&self) -> Region {
        Region::new(
            self.anchor_time,
            self.current_time,
            self.anchor_lane,
            self.current_lane,
        )
    }
}

impl Timeline {
    pub(crate) fn ensure_idle(&self) -> EditResult<()> {
        match &self.gesture {
            Some(g) => {
                debug!(active = g.name(), "Gesture refused");
                Err(EditError::GestureInProgress)
            }
            None => Ok(()),
        }
    }

    // ── Clip drag ───────────────────────────────────────────────

    /// Start dragging `grabbed` together with the rest of the selection.
    ///
    /// Grabbing an unselected clip selects it, replacing the selection
    /// unless `additive`. The whole drag is one undo step, recorded by the
    /// first update that actually moves a clip.
    pub fn begin_clip_drag(&mut self, grabbed: Uuid, additive: bool) -> EditResult<()> {
        self.ensure_idle()?;
        if !self.clips.contains(grabbed) {
            return Err(EditError::ClipNotFound(grabbed));
        }
        if !self.selection.contains(grabbed) {
            if !additive {
                self.selection.clear();
            }
            self.selection.insert(grabbed);
        }

        let origins: SmallVec<[DragOrigin; 4]> = self
            .selected_clips()
            .into_iter()
            .map(|c| DragOrigin {
                id: c.id,
                start_time: c.start_time,
                track_name: c.track_name.clone(),
                lane: self.tracks.position(&c.track_name).unwrap_or(0),
            })
            .collect();

        debug!(grabbed = %grabbed, clips = origins.len(), "Clip drag started");
        self.gesture = Some(Gesture::ClipDrag(ClipDrag {
            origins,
            delta_time: 0.0,
            lane_delta: 0,
            recorded: false,
        }));
        Ok(())
    }

    /// Place the dragged clips at `origin + delta_time`, `lane_delta` rows
    /// away from where they started. Lanes clamp to the existing tracks.
    pub fn update_clip_drag(&mut self, delta_time: f64, lane_delta: isize) -> EditResult<()> {
        let (origins, recorded) = match &mut self.gesture {
            Some(Gesture::ClipDrag(drag)) => {
                drag.delta_time = delta_time;
                drag.lane_delta = lane_delta;
                (drag.origins.clone(), drag.recorded)
            }
            _ => return Err(EditError::NoActiveGesture),
        };
        let before = (!recorded).then(|| self.current_snapshot());

        let last_lane = self.tracks.len().saturating_sub(1) as isize;
        for origin in &origins {
            if !self.clips.contains(origin.id) {
                continue;
            }
            let lane = (origin.lane as isize + lane_delta).clamp(0, last_lane) as usize;
            let target = match self.tracks.at(lane) {
                Some(track) => track.name.clone(),
                None => origin.track_name.clone(),
            };
            let outcome = self.resolve_move(&origin.track_name, origin.start_time + delta_time, &target);
            self.apply_move(origin.id, &outcome);
        }

        if let Some(before) = before {
            if before != self.current_snapshot() {
                self.history.push(before);
                if let Some(Gesture::ClipDrag(drag)) = &mut self.gesture {
                    drag.recorded = true;
                }
            }
        }
        self.settle();
        Ok(())
    }

    // ── Scrub ───────────────────────────────────────────────────

    /// Grab the playhead at `time`.
    pub fn begin_scrub(&mut self, time: f64) -> EditResult<f64> {
        self.ensure_idle()?;
        let origin_time = self.move_playhead(time);
        self.gesture = Some(Gesture::Scrub(Scrub {
            origin_time,
            delta: 0.0,
        }));
        Ok(origin_time)
    }

    /// Move the playhead to `origin + delta`. Returns the clamped time.
    pub fn update_scrub(&mut self, delta: f64) -> EditResult<f64> {
        let origin_time = match &mut self.gesture {
            Some(Gesture::Scrub(scrub)) => {
                scrub.delta = delta;
                scrub.origin_time
            }
            _ => return Err(EditError::NoActiveGesture),
        };
        Ok(self.move_playhead(origin_time + delta))
    }

    // ── Region select ───────────────────────────────────────────

    /// Anchor a rubber band at (`time`, `lane`).
    pub fn begin_region_select(&mut self, time: f64, lane: f64, additive: bool) -> EditResult<()> {
        self.ensure_idle()?;
        let base = if additive {
            self.selection.ids().clone()
        } else {
            self.selection.clear();
            HashSet::new()
        };
        self.gesture = Some(Gesture::RegionSelect(RegionSelect {
            anchor_time: time,
            anchor_lane: lane,
            current_time: time,
            current_lane: lane,
            base,
        }));
        Ok(())
    }

    /// Stretch the band to (`time`, `lane`) and reselect. Returns the
    /// selection size.
    pub fn update_region_select(&mut self, time: f64, lane: f64) -> EditResult<usize> {
        let (region, base) = match &mut self.gesture {
            Some(Gesture::RegionSelect(band)) => {
                band.current_time = time;
                band.current_lane = lane;
                (band.region(), band.base.clone())
            }
            _ => return Err(EditError::NoActiveGesture),
        };
        let hits = self.clips_intersecting_region(&region);
        self.selection.clear();
        self.selection
            .extend(base.into_iter().filter(|id| self.clips.contains(*id)));
        self.selection.extend(hits);
        Ok(self.selection.len())
    }

    // ── Common ──────────────────────────────────────────────────

    /// Finish the current gesture, keeping its last state.
    pub fn end_gesture(&mut self) -> EditResult<Gesture> {
        let gesture = self.gesture.take().ok_or(EditError::NoActiveGesture)?;
        debug!(gesture = gesture.name(), "Gesture ended");
        self.settle();
        Ok(gesture)
    }
}
