use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use scrubline::{
    LoadTracker, MemFetcher, ProgressListener, ScrollTimeline, SequenceScrubber, SequenceSpec,
    TriggerRegion, Viewport,
};

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];

/// Three-frame sequence: red, green, and a third frame that fails to load.
fn scrubber_with_failed_tail(viewport: Viewport) -> SequenceScrubber {
    let spec = SequenceSpec::new("seq", 3, "f-")
        .with_extension("png")
        .with_trigger_region("hero-scroll");
    let mut fetcher = MemFetcher::new();
    fetcher.insert(spec.frame_file(1), png_bytes(RED));
    fetcher.insert(spec.frame_file(2), png_bytes(GREEN));

    let tracker = LoadTracker::with_warm_up(Duration::ZERO);
    let mut scrubber = SequenceScrubber::new(spec, viewport).unwrap();
    scrubber.attach(&tracker, Arc::new(fetcher));
    scrubber.wait_ready();
    scrubber
}

#[test]
fn ready_sequence_draws_first_frame_at_progress_zero() {
    let scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    assert!(scrubber.is_ready());
    assert_eq!(scrubber.progress(), 0.0);
    assert_eq!(scrubber.surface().pixel(0, 0), RED);
    assert_eq!(scrubber.surface().pixel(7, 7), RED);
}

#[test]
fn integer_float_index_draws_a_single_frame() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    // progress 0.5 of 3 frames lands exactly on frame 1: no blend.
    scrubber.set_progress(0.5);
    assert_eq!(scrubber.surface().pixel(3, 3), GREEN);
}

#[test]
fn blend_composites_upper_frame_over_lower() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    // Halfway between frames 0 and 1.
    scrubber.set_progress(0.25);
    assert_eq!(scrubber.surface().pixel(4, 4), [127, 128, 0, 255]);
}

#[test]
fn failed_upper_frame_is_not_drawn() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    // Halfway between frame 1 and the failed frame 2: only frame 1 draws.
    scrubber.set_progress(0.75);
    assert_eq!(scrubber.surface().pixel(4, 4), GREEN);
}

#[test]
fn failed_lower_frame_retains_previous_surface() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    scrubber.set_progress(0.25);
    let before = scrubber.surface().pixel(4, 4);

    // progress 1.0 selects the failed last frame; the update is skipped.
    scrubber.set_progress(1.0);
    assert_eq!(scrubber.progress(), 1.0);
    assert_eq!(scrubber.surface().pixel(4, 4), before);
}

#[test]
fn resize_redraws_from_cached_progress() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    scrubber.set_progress(0.25);

    // Wider surface pillarboxes the square frame, still at progress 0.25.
    scrubber.resize(Viewport::new(16, 8).unwrap());
    assert_eq!(scrubber.progress(), 0.25);
    assert_eq!(scrubber.surface().pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(scrubber.surface().pixel(3, 4), [0, 0, 0, 0]);
    assert_eq!(scrubber.surface().pixel(8, 4), [127, 128, 0, 255]);
    assert_eq!(scrubber.surface().pixel(12, 4), [0, 0, 0, 0]);
}

#[test]
fn drawing_is_a_noop_before_the_sequence_is_ready() {
    let spec = SequenceSpec::new("seq", 3, "f-").with_extension("png");
    let mut scrubber =
        SequenceScrubber::new(spec, Viewport::new(8, 8).unwrap()).unwrap();

    scrubber.set_progress(0.8);
    assert!(!scrubber.is_ready());
    assert!(scrubber.surface().data().iter().all(|&b| b == 0));
}

#[test]
fn scroll_timeline_drives_the_scrubber() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    let region = TriggerRegion::new("hero-scroll", 0.0, 1000.0).unwrap();
    let mut timeline = ScrollTimeline::new(region).with_smoothing(0.0);

    timeline.drive(500.0, 0.016, &mut scrubber);
    assert_eq!(scrubber.progress(), 0.5);
    assert_eq!(scrubber.surface().pixel(3, 3), GREEN);
}

#[test]
fn listener_updates_cached_progress() {
    let mut scrubber = scrubber_with_failed_tail(Viewport::new(8, 8).unwrap());
    scrubber.progress_changed(0.25);
    assert_eq!(scrubber.progress(), 0.25);
    assert_eq!(scrubber.surface().pixel(4, 4), [127, 128, 0, 255]);
}
