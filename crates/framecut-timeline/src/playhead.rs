//! Playhead position and playback transport.

/// The single current-time cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Playhead {
    time: f64,
    playing: bool,
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Set the position, clamped to `[0, max]`. Returns the stored time.
    pub fn move_to(&mut self, time: f64, max: f64) -> f64 {
        self.time = if time.is_nan() { 0.0 } else { time.clamp(0.0, max) };
        self.time
    }

    /// Re-apply the upper bound after the timeline length changed.
    pub fn reclamp(&mut self, max: f64) {
        self.time = self.time.clamp(0.0, max);
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advance by `elapsed` seconds while playing. Stops at `max`.
    /// Returns true if the playhead moved.
    pub fn advance(&mut self, elapsed: f64, max: f64) -> bool {
        if !self.playing || !(elapsed.is_finite() && elapsed > 0.0) {
            return false;
        }
        let before = self.time;
        self.time = (self.time + elapsed).min(max);
        if self.time >= max {
            self.playing = false;
        }
        self.time != before
    }
}
