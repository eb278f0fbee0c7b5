use std::sync::Arc;

use crate::{
    assets::{fetch::AssetFetcher, loader::{SequenceLoader, SequenceState}},
    foundation::{core::Viewport, error::ScrublineResult},
    loading::LoadTracker,
    model::SequenceSpec,
    render::{draw::draw_frame_over, fit::ViewportFit, surface::Surface},
    scroll::ProgressListener,
};

/// Cross-fade pair selected for one progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBlend {
    /// 0-based index drawn at full opacity.
    pub lower: usize,
    /// 0-based index drawn on top at `blend` opacity.
    pub upper: usize,
    /// Cross-fade weight toward `upper`, in `[0, 1)`.
    pub blend: f64,
}

/// Map normalized progress to the adjacent frame pair it falls between.
///
/// `progress` is clamped to `[0, 1]`. At `progress == 1.0` the selection is
/// pinned to the last frame with zero blend; sequences of one frame (or none)
/// always select frame 0.
pub fn frame_blend(progress: f64, frame_count: usize) -> FrameBlend {
    if frame_count <= 1 {
        return FrameBlend {
            lower: 0,
            upper: 0,
            blend: 0.0,
        };
    }

    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let float_index = progress * (frame_count - 1) as f64;
    let lower = (float_index.floor() as usize).min(frame_count - 1);
    let upper = (lower + 1).min(frame_count - 1);
    FrameBlend {
        lower,
        upper,
        blend: float_index - lower as f64,
    }
}

/// Scroll-synchronized frame renderer for one sequence.
///
/// Owns the sequence's preloader and drawing surface, caches the most recent
/// progress value so a resize can redraw without consulting any external
/// scroll state, and redraws on every progress update once the sequence is
/// ready. Drawing never fails outward: a frame that is missing at draw time
/// leaves the previous surface contents in place.
pub struct SequenceScrubber {
    loader: SequenceLoader,
    surface: Surface,
    progress: f64,
}

impl SequenceScrubber {
    pub fn new(spec: SequenceSpec, viewport: Viewport) -> ScrublineResult<Self> {
        Ok(Self {
            loader: SequenceLoader::new(spec)?,
            surface: Surface::new(viewport),
            progress: 0.0,
        })
    }

    /// Register with the tracker and begin preloading. Idempotent.
    pub fn attach(&mut self, tracker: &LoadTracker, fetcher: Arc<dyn AssetFetcher>) {
        self.loader.start(tracker, fetcher);
    }

    pub fn state(&self) -> SequenceState {
        self.loader.state()
    }

    pub fn is_ready(&self) -> bool {
        self.loader.is_ready()
    }

    pub fn spec(&self) -> &SequenceSpec {
        self.loader.spec()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Drain pending load completions; draws the initial frame when the
    /// sequence just became ready. Returns the number of frames applied.
    pub fn pump(&mut self) -> usize {
        let was_ready = self.loader.is_ready();
        let applied = self.loader.pump();
        if !was_ready && self.loader.is_ready() {
            self.redraw();
        }
        applied
    }

    /// Block until the sequence is ready, then draw the current frame.
    pub fn wait_ready(&mut self) {
        self.loader.wait_ready();
        self.redraw();
    }

    /// Update the cached progress value and redraw.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            self.progress
        };
        self.redraw();
    }

    /// Adopt a new viewport and redraw from the cached progress value.
    pub fn resize(&mut self, viewport: Viewport) {
        self.surface.resize(viewport);
        self.redraw();
    }

    #[tracing::instrument(skip(self))]
    fn redraw(&mut self) {
        if !self.loader.is_ready() {
            return;
        }

        let selected = frame_blend(self.progress, self.spec().frame_count);
        // A lower frame that failed to load skips the whole update; the
        // surface keeps whatever was drawn last.
        let Some(lower) = self.loader.frame(selected.lower) else {
            return;
        };

        let fit = match ViewportFit::contain(self.surface.viewport(), lower.width, lower.height) {
            Ok(fit) => fit,
            Err(err) => {
                tracing::debug!(%err, "skipping draw");
                return;
            }
        };

        self.surface.clear();
        if let Err(err) = draw_frame_over(&mut self.surface, lower, &fit, 1.0) {
            tracing::debug!(%err, "lower frame draw failed");
            return;
        }

        if selected.blend > 0.0 && selected.upper != selected.lower {
            if let Some(upper) = self.loader.frame(selected.upper) {
                if let Err(err) =
                    draw_frame_over(&mut self.surface, upper, &fit, selected.blend as f32)
                {
                    tracing::debug!(%err, "upper frame draw failed");
                }
            }
        }
    }
}

impl ProgressListener for SequenceScrubber {
    fn progress_changed(&mut self, progress: f64) {
        self.set_progress(progress);
    }
}
