//! Time ↔ pixel mapping and zoom state.

/// Pixels-per-second conversion factor, the only zoom state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pixels_per_second: f64,
    min: f64,
    max: f64,
}

/// Result of a zoom step.
///
/// The anchor keeps its time; its pixel position moves, and the presentation
/// layer scrolls by `scroll_delta()` to keep it under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomChange {
    pub previous_scale: f64,
    pub scale: f64,
    pub anchor_time: f64,
    pub anchor_px_before: f64,
    pub anchor_px_after: f64,
}

impl ZoomChange {
    /// Horizontal scroll adjustment that keeps the anchor visually fixed.
    pub fn scroll_delta(&self) -> f64 {
        self.anchor_px_after - self.anchor_px_before
    }

    /// False when the scale was already at a bound and did not change.
    pub fn changed(&self) -> bool {
        self.scale != self.previous_scale
    }
}

impl TimeScale {
    /// Create a scale clamped into `[min, max]`.
    pub fn new(pixels_per_second: f64, min: f64, max: f64) -> Self {
        Self {
            pixels_per_second: pixels_per_second.clamp(min, max),
            min,
            max,
        }
    }

    #[inline]
    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[inline]
    pub fn time_to_px(&self, time: f64) -> f64 {
        time * self.pixels_per_second
    }

    #[inline]
    pub fn px_to_time(&self, px: f64) -> f64 {
        px / self.pixels_per_second
    }

    /// Multiply the scale by `factor`, clamped to the bounds.
    ///
    /// Callers validate `factor`; non-positive values would flip the axis.
    pub fn zoom(&mut self, factor: f64, anchor_time: f64) -> ZoomChange {
        let previous_scale = self.pixels_per_second;
        let anchor_px_before = self.time_to_px(anchor_time);
        self.pixels_per_second = (previous_scale * factor).clamp(self.min, self.max);
        ZoomChange {
            previous_scale,
            scale: self.pixels_per_second,
            anchor_time,
            anchor_px_before,
            anchor_px_after: self.time_to_px(anchor_time),
        }
    }

    /// Quantize `time` to the pixel grid at the current scale, clamped ≥ 0.
    pub fn snap(&self, time: f64, grid_px: f64) -> f64 {
        let snapped = (time * self.pixels_per_second / grid_px).round() * grid_px
            / self.pixels_per_second;
        snapped.max(0.0)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(100.0, 10.0, 500.0)
    }
}
