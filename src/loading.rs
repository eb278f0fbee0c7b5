use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Warm-up window during which [`LoadTracker::is_loading`] stays `true` so
/// every sequence on a page gets a chance to register before the loading
/// indicator can disappear.
pub const DEFAULT_WARM_UP: Duration = Duration::from_millis(100);

/// Shared load-progress tracker for all sequences on a page.
///
/// A cloneable handle over two monotone counters: frames registered and frames
/// completed. Preloaders write, a loading display reads. Handles are passed to
/// every consumer explicitly; there is no global instance.
#[derive(Clone, Debug)]
pub struct LoadTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug)]
struct TrackerInner {
    registered: AtomicU64,
    loaded: AtomicU64,
    created: Instant,
    warm_up: Duration,
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::with_warm_up(DEFAULT_WARM_UP)
    }

    pub fn with_warm_up(warm_up: Duration) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                registered: AtomicU64::new(0),
                loaded: AtomicU64::new(0),
                created: Instant::now(),
                warm_up,
            }),
        }
    }

    /// Add `count` frames to the registered total. Additive and
    /// order-independent across callers.
    pub fn register(&self, count: u64) {
        // Monotone counter; relaxed ordering is enough.
        self.inner.registered.fetch_add(count, Ordering::Relaxed);
    }

    /// Record `count` completed frame loads (success and failure alike).
    pub fn report_progress(&self, count: u64) {
        self.inner.loaded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn registered(&self) -> u64 {
        self.inner.registered.load(Ordering::Relaxed)
    }

    /// Completed count, clamped to the registered total so that
    /// `loaded() <= registered()` holds under any report interleaving.
    pub fn loaded(&self) -> u64 {
        self.inner
            .loaded
            .load(Ordering::Relaxed)
            .min(self.registered())
    }

    /// Percentage of registered frames completed, rounded to the nearest
    /// integer. `0` while nothing is registered.
    pub fn percentage(&self) -> u8 {
        let registered = self.registered();
        if registered == 0 {
            return 0;
        }
        ((self.loaded() as f64 / registered as f64) * 100.0).round() as u8
    }

    /// `true` while registered frames are outstanding, and unconditionally
    /// during the warm-up window after construction.
    pub fn is_loading(&self) -> bool {
        if self.inner.created.elapsed() < self.inner.warm_up {
            return true;
        }
        let registered = self.registered();
        registered > 0 && self.loaded() < registered
    }
}
