use crate::{
    ScrublineResult,
    assets::PreparedFrame,
    foundation::error::ScrublineError,
    render::{fit::ViewportFit, surface::Surface},
};

/// Composite `frame` over the surface inside the fitted rectangle.
///
/// The frame is resampled bilinearly to the fit's dimensions and blended with
/// straight-alpha `over` at the given opacity. Pixels outside the fitted
/// rectangle are untouched.
pub fn draw_frame_over(
    surface: &mut Surface,
    frame: &PreparedFrame,
    fit: &ViewportFit,
    opacity: f32,
) -> ScrublineResult<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.rgba8_premul.len() != expected {
        return Err(ScrublineError::render(
            "frame buffer does not match width*height*4",
        ));
    }
    if !(fit.draw_width.is_finite() && fit.draw_height.is_finite())
        || fit.draw_width <= 0.0
        || fit.draw_height <= 0.0
    {
        return Err(ScrublineError::render("fit rectangle must be positive"));
    }

    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    // Cover exactly the destination pixels whose centers fall inside the rect.
    let x_start = (fit.offset_x - 0.5).ceil().max(0.0) as u32;
    let y_start = (fit.offset_y - 0.5).ceil().max(0.0) as u32;
    let x_end = ((fit.offset_x + fit.draw_width - 0.5).ceil().max(0.0) as u32)
        .min(surface.width());
    let y_end = ((fit.offset_y + fit.draw_height - 0.5).ceil().max(0.0) as u32)
        .min(surface.height());

    let surface_width = surface.width() as usize;
    let data = surface.data_mut();

    for y in y_start..y_end {
        let cy = f64::from(y) + 0.5;
        let v = (cy - fit.offset_y) / fit.draw_height * f64::from(frame.height) - 0.5;
        for x in x_start..x_end {
            let cx = f64::from(x) + 0.5;
            let u = (cx - fit.offset_x) / fit.draw_width * f64::from(frame.width) - 0.5;

            let src = sample_bilinear(frame, u, v);
            let idx = (y as usize * surface_width + x as usize) * 4;
            let dst = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
            let out = over_premul(dst, src, op);
            data[idx..idx + 4].copy_from_slice(&out);
        }
    }

    Ok(())
}

fn sample_bilinear(frame: &PreparedFrame, u: f64, v: f64) -> [u8; 4] {
    let max_x = f64::from(frame.width - 1);
    let max_y = f64::from(frame.height - 1);
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);

    let x0 = u.floor() as u32;
    let y0 = v.floor() as u32;
    let x1 = (x0 + 1).min(frame.width - 1);
    let y1 = (y0 + 1).min(frame.height - 1);
    let fx = u - f64::from(x0);
    let fy = v - f64::from(y0);

    let p00 = frame_pixel(frame, x0, y0);
    let p10 = frame_pixel(frame, x1, y0);
    let p01 = frame_pixel(frame, x0, y1);
    let p11 = frame_pixel(frame, x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn frame_pixel(frame: &PreparedFrame, x: u32, y: u32) -> [u8; 4] {
    let idx = (y as usize * frame.width as usize + x as usize) * 4;
    let px = &frame.rgba8_premul[idx..idx + 4];
    [px[0], px[1], px[2], px[3]]
}

fn over_premul(dst: [u8; 4], src: [u8; 4], op: u16) -> [u8; 4] {
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa as u16;

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));
    for c in 0..3 {
        let sc = mul_div255(u16::from(src[c]), op);
        let dc = mul_div255(u16::from(dst[c]), inv);
        out[c] = sc.saturating_add(dc);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::foundation::core::Viewport;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> PreparedFrame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        PreparedFrame {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    fn exact_fit(viewport: Viewport) -> ViewportFit {
        ViewportFit {
            draw_width: f64::from(viewport.width),
            draw_height: f64::from(viewport.height),
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    #[test]
    fn opaque_draw_fills_dest_rect() {
        let viewport = Viewport::new(8, 8).unwrap();
        let mut surface = Surface::new(viewport);
        let frame = solid_frame(4, 4, [255, 0, 0, 255]);

        draw_frame_over(&mut surface, &frame, &exact_fit(viewport), 1.0).unwrap();
        assert_eq!(surface.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(7, 7), [255, 0, 0, 255]);
    }

    #[test]
    fn zero_opacity_is_noop() {
        let viewport = Viewport::new(4, 4).unwrap();
        let mut surface = Surface::new(viewport);
        let frame = solid_frame(4, 4, [255, 255, 255, 255]);

        draw_frame_over(&mut surface, &frame, &exact_fit(viewport), 0.0).unwrap();
        assert!(surface.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn half_opacity_blends_over_existing_pixels() {
        let viewport = Viewport::new(2, 2).unwrap();
        let mut surface = Surface::new(viewport);
        let red = solid_frame(2, 2, [255, 0, 0, 255]);
        let green = solid_frame(2, 2, [0, 255, 0, 255]);

        draw_frame_over(&mut surface, &red, &exact_fit(viewport), 1.0).unwrap();
        draw_frame_over(&mut surface, &green, &exact_fit(viewport), 0.5).unwrap();
        // op 128: src scaled to 128, dst scaled by the remaining 127.
        assert_eq!(surface.pixel(0, 0), [127, 128, 0, 255]);
    }

    #[test]
    fn pixels_outside_fit_rect_are_untouched() {
        let viewport = Viewport::new(8, 4).unwrap();
        let mut surface = Surface::new(viewport);
        let frame = solid_frame(4, 4, [0, 0, 255, 255]);
        let fit = ViewportFit {
            draw_width: 4.0,
            draw_height: 4.0,
            offset_x: 2.0,
            offset_y: 0.0,
        };

        draw_frame_over(&mut surface, &frame, &fit, 1.0).unwrap();
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(2, 0), [0, 0, 255, 255]);
        assert_eq!(surface.pixel(5, 3), [0, 0, 255, 255]);
        assert_eq!(surface.pixel(6, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn rejects_mismatched_frame_buffer() {
        let viewport = Viewport::new(2, 2).unwrap();
        let mut surface = Surface::new(viewport);
        let frame = PreparedFrame {
            width: 2,
            height: 2,
            rgba8_premul: Arc::new(vec![0u8; 7]),
        };
        assert!(draw_frame_over(&mut surface, &frame, &exact_fit(viewport), 1.0).is_err());
    }
}
