use std::sync::Arc;

pub mod decode;
pub mod fetch;
pub mod loader;

/// Decoded frame ready for compositing.
#[derive(Clone, Debug)]
pub struct PreparedFrame {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedFrame {
    /// Width-over-height aspect ratio.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}
