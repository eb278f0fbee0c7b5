use crate::foundation::error::{ScrublineError, ScrublineResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Drawing-surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a validated viewport with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> ScrublineResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScrublineError::validation(
                "viewport width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width-over-height aspect ratio.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Number of bytes in one RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}
