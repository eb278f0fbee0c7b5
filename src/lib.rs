//! Scrubline turns an ordered set of still images into a scroll-driven
//! playback surface: frames are preloaded concurrently behind a shared
//! loading gate, scroll progress selects a cross-faded pair of adjacent
//! frames, and the pair is composited contain-fitted onto a premultiplied
//! RGBA8 surface.
#![forbid(unsafe_code)]

pub mod assets;
pub mod catalog;
pub mod foundation;
pub mod loading;
pub mod model;
pub mod render;
pub mod scroll;
pub mod scrub;

pub use assets::PreparedFrame;
pub use assets::decode::decode_frame;
pub use assets::fetch::{AssetFetcher, DirFetcher, MemFetcher};
pub use assets::loader::{FrameSlot, SequenceLoader, SequenceState};
pub use catalog::{Product, ProductCatalog};
pub use foundation::core::Viewport;
pub use foundation::error::{ScrublineError, ScrublineResult};
pub use loading::LoadTracker;
pub use model::SequenceSpec;
pub use render::draw::draw_frame_over;
pub use render::fit::ViewportFit;
pub use render::surface::Surface;
pub use scroll::{ProgressListener, ScrollTimeline, TriggerRegion};
pub use scrub::{FrameBlend, SequenceScrubber, frame_blend};
