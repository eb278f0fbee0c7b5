use kurbo::Rect;

use crate::foundation::{
    core::Viewport,
    error::{ScrublineError, ScrublineResult},
};

/// Placement of a contain-fitted image inside a viewport.
///
/// Derived per draw and per resize from the current viewport and one frame's
/// intrinsic aspect ratio; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFit {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewportFit {
    /// Scale the image to fit entirely inside the viewport without cropping,
    /// centered, letterboxing or pillarboxing the axis the aspect ratios
    /// disagree on.
    pub fn contain(
        viewport: Viewport,
        image_width: u32,
        image_height: u32,
    ) -> ScrublineResult<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(ScrublineError::validation(
                "image width/height must be > 0",
            ));
        }

        let vw = f64::from(viewport.width);
        let vh = f64::from(viewport.height);
        let ratio = f64::from(image_width) / f64::from(image_height);

        let (draw_width, draw_height) = if viewport.aspect() > ratio {
            // Viewport proportionally wider than the image: height constrains.
            (vh * ratio, vh)
        } else {
            (vw, vw / ratio)
        };

        Ok(Self {
            draw_width,
            draw_height,
            offset_x: (vw - draw_width) / 2.0,
            offset_y: (vh - draw_height) / 2.0,
        })
    }

    /// Destination rectangle in surface coordinates.
    pub fn dest_rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.offset_x + self.draw_width,
            self.offset_y + self.draw_height,
        )
    }
}
