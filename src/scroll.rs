use crate::foundation::error::{ScrublineError, ScrublineResult};

/// Receives normalized scroll progress updates.
///
/// The renderer side of the scroll-trigger seam: implementors only consume
/// progress values, they never read scroll state themselves.
pub trait ProgressListener {
    fn progress_changed(&mut self, progress: f64);
}

/// Contiguous vertical span of the document that drives one sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerRegion {
    pub id: String,
    /// Document offset where progress is 0.
    pub top: f64,
    /// Document offset where progress is 1.
    pub bottom: f64,
}

impl TriggerRegion {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> ScrublineResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ScrublineError::validation("trigger region id must be non-empty"));
        }
        if !(top.is_finite() && bottom.is_finite()) || top >= bottom {
            return Err(ScrublineError::validation(
                "trigger region must have finite top < bottom",
            ));
        }
        Ok(Self { id, top, bottom })
    }

    /// Normalized progress of a scroll offset through this region, clamped to
    /// `[0, 1]`.
    pub fn progress(&self, scroll_y: f64) -> f64 {
        ((scroll_y - self.top) / (self.bottom - self.top)).clamp(0.0, 1.0)
    }
}

/// Seconds the smoothed scrub position takes to catch up with the scroll bar.
pub const DEFAULT_SCRUB_SMOOTHING: f64 = 0.5;

/// Smoothed scrub position over a trigger region.
///
/// Scroll offsets set the target; `tick` advances the published value toward
/// it with a fixed catch-up time, which turns a jumpy scroll wheel into the
/// even frame cadence the cross-fade expects.
#[derive(Clone, Debug)]
pub struct ScrollTimeline {
    region: TriggerRegion,
    smoothing: f64,
    target: f64,
    value: f64,
}

impl ScrollTimeline {
    pub fn new(region: TriggerRegion) -> Self {
        Self {
            region,
            smoothing: DEFAULT_SCRUB_SMOOTHING,
            target: 0.0,
            value: 0.0,
        }
    }

    pub fn with_smoothing(mut self, seconds: f64) -> Self {
        self.smoothing = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self
    }

    pub fn region(&self) -> &TriggerRegion {
        &self.region
    }

    /// Most recently published progress value.
    pub fn progress(&self) -> f64 {
        self.value
    }

    /// Point the timeline at a new scroll offset.
    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.target = self.region.progress(scroll_y);
    }

    /// Advance the smoothed value by `dt` seconds toward the current target
    /// and return it.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() || dt < 0.0 {
            return self.value;
        }
        if self.smoothing <= 0.0 || dt >= self.smoothing {
            self.value = self.target;
        } else {
            self.value += (self.target - self.value) * (dt / self.smoothing);
        }
        self.value
    }

    /// Feed a scroll offset, advance by `dt`, and notify the listener when the
    /// published value changed.
    pub fn drive(&mut self, scroll_y: f64, dt: f64, listener: &mut dyn ProgressListener) {
        self.scroll_to(scroll_y);
        let before = self.value;
        let value = self.tick(dt);
        if value != before {
            listener.progress_changed(value);
        }
    }
}
