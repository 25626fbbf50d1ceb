//! Gesture-to-navigation mapping and pinch/pan zoom state
//!
//! Gesture recognition itself happens in the view layer; this module only
//! interprets the finished gestures it reports.

/// Minimum travel and speed a horizontal swipe needs to turn the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    /// Logical pixels
    pub distance_px: f32,
    /// Logical pixels per second
    pub velocity_px_per_sec: f32,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            distance_px: 100.0,
            velocity_px_per_sec: 500.0,
        }
    }
}

/// Page turn requested by a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTurn {
    Next,
    Previous,
}

/// Final values of a pan gesture as reported by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanEnd {
    pub translation_x: f32,
    pub translation_y: f32,
    pub velocity_x: f32,
}

/// What a finished pan did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanOutcome {
    /// The zoomed image was moved
    Panned,
    /// The swipe was strong enough to turn the page
    Turn(PageTurn),
    /// Below threshold; the page slides back into place
    SnapBack,
}

impl SwipeThresholds {
    /// Classifies a horizontal swipe
    ///
    /// Both distance and velocity must exceed their thresholds in the same
    /// direction. Leftward turns to the next page, rightward to the previous.
    pub fn classify(&self, translation_x: f32, velocity_x: f32) -> Option<PageTurn> {
        if translation_x < -self.distance_px && velocity_x < -self.velocity_px_per_sec {
            Some(PageTurn::Next)
        } else if translation_x > self.distance_px && velocity_x > self.velocity_px_per_sec {
            Some(PageTurn::Previous)
        } else {
            None
        }
    }
}

/// Allowed zoom range and the double-tap target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    pub double_tap: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 3.0,
            double_tap: 2.0,
        }
    }
}

/// Live and committed transform of the page image
///
/// `scale`/`translate_*` follow the fingers; the `saved_*` values are what
/// the last finished gesture committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    limits: ZoomLimits,
    scale: f32,
    saved_scale: f32,
    translate_x: f32,
    translate_y: f32,
    saved_translate_x: f32,
    saved_translate_y: f32,
}

impl ZoomState {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            limits,
            scale: limits.min,
            saved_scale: limits.min,
            translate_x: 0.0,
            translate_y: 0.0,
            saved_translate_x: 0.0,
            saved_translate_y: 0.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translation(&self) -> (f32, f32) {
        (self.translate_x, self.translate_y)
    }

    /// True once a committed zoom is above the minimum; pans then move the image
    pub fn is_zoomed(&self) -> bool {
        self.saved_scale > self.limits.min
    }

    pub fn pinch_update(&mut self, factor: f32) {
        self.scale = self.saved_scale * factor;
    }

    pub fn pinch_end(&mut self) {
        if self.scale < self.limits.min {
            self.reset();
        } else if self.scale > self.limits.max {
            self.scale = self.limits.max;
            self.saved_scale = self.limits.max;
        } else {
            self.saved_scale = self.scale;
        }
    }

    pub fn pan_update(&mut self, translation_x: f32, translation_y: f32) {
        if self.is_zoomed() {
            self.translate_x = self.saved_translate_x + translation_x;
            self.translate_y = self.saved_translate_y + translation_y;
        } else {
            self.translate_x = translation_x;
        }
    }

    /// Finishes a pan; only an unzoomed page can be swiped to another page
    pub fn pan_end(&mut self, pan: PanEnd, thresholds: &SwipeThresholds) -> PanOutcome {
        if self.is_zoomed() {
            self.saved_translate_x = self.translate_x;
            self.saved_translate_y = self.translate_y;
            return PanOutcome::Panned;
        }

        self.translate_x = 0.0;
        match thresholds.classify(pan.translation_x, pan.velocity_x) {
            Some(turn) => PanOutcome::Turn(turn),
            None => PanOutcome::SnapBack,
        }
    }

    /// Toggles between the double-tap zoom and the unzoomed page
    pub fn double_tap(&mut self) {
        if self.scale > self.limits.min {
            self.reset();
        } else {
            self.scale = self.limits.double_tap;
            self.saved_scale = self.limits.double_tap;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}
