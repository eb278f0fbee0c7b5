use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::{
    ScrublineResult,
    assets::{PreparedFrame, decode::decode_frame, fetch::AssetFetcher},
    loading::LoadTracker,
    model::SequenceSpec,
};

/// Terminal-or-pending state of one frame in a sequence.
///
/// A failed frame stays `Failed` forever; it counts toward progress but never
/// draws.
#[derive(Clone, Debug, Default)]
pub enum FrameSlot {
    #[default]
    Pending,
    Ready(PreparedFrame),
    Failed,
}

impl FrameSlot {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn frame(&self) -> Option<&PreparedFrame> {
        match self {
            Self::Ready(frame) => Some(frame),
            _ => None,
        }
    }
}

/// Lifecycle of a sequence instance. `Ready` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    Unregistered,
    Loading,
    Ready,
}

struct Completion {
    index: usize,
    frame: Option<PreparedFrame>,
}

/// Concurrent best-effort preloader for one frame sequence.
///
/// `start` registers the sequence's frame count with the shared [`LoadTracker`]
/// exactly once, then issues every frame load on its own worker thread with no
/// bound on parallelism. Completions arrive in whatever order the fetches
/// finish; each frame reports exactly one progress increment on its terminal
/// event, success or failure alike. Once every frame is terminal the loader is
/// `Ready` and the ordered slot list is published.
///
/// There is no retry, no timeout, and no cancellation: a frame that never
/// settles leaves the sequence loading forever, and dropping the loader simply
/// abandons in-flight work.
pub struct SequenceLoader {
    spec: SequenceSpec,
    slots: Vec<FrameSlot>,
    state: SequenceState,
    completed: usize,
    tracker: Option<LoadTracker>,
    events: Option<Receiver<Completion>>,
}

impl SequenceLoader {
    pub fn new(spec: SequenceSpec) -> ScrublineResult<Self> {
        spec.validate()?;
        let slots = vec![FrameSlot::default(); spec.frame_count];
        Ok(Self {
            spec,
            slots,
            state: SequenceState::Unregistered,
            completed: 0,
            tracker: None,
            events: None,
        })
    }

    pub fn spec(&self) -> &SequenceSpec {
        &self.spec
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SequenceState::Ready
    }

    pub fn slots(&self) -> &[FrameSlot] {
        &self.slots
    }

    /// Frame at `index` (0-based), if it loaded successfully.
    pub fn frame(&self, index: usize) -> Option<&PreparedFrame> {
        self.slots.get(index).and_then(FrameSlot::frame)
    }

    /// Register with the tracker and issue every frame load.
    ///
    /// Idempotent per loader: calls after the first are no-ops, so the tracker
    /// sees this sequence's count exactly once.
    pub fn start(&mut self, tracker: &LoadTracker, fetcher: Arc<dyn AssetFetcher>) {
        if self.state != SequenceState::Unregistered {
            return;
        }

        tracker.register(self.spec.frame_count as u64);
        self.tracker = Some(tracker.clone());

        let (tx, rx) = mpsc::channel();
        for index in 1..=self.spec.frame_count {
            let tx = tx.clone();
            let fetcher = Arc::clone(&fetcher);
            let path = self.spec.frame_file(index);
            thread::spawn(move || {
                let frame = match fetcher.fetch(&path).and_then(|bytes| decode_frame(&bytes)) {
                    Ok(frame) => Some(frame),
                    Err(err) => {
                        tracing::debug!(%path, %err, "frame load failed");
                        None
                    }
                };
                // The receiver is gone when the sequence was dropped mid-load.
                let _ = tx.send(Completion {
                    index: index - 1,
                    frame,
                });
            });
        }

        self.events = Some(rx);
        self.state = SequenceState::Loading;
    }

    /// Drain every completion that has arrived so far without blocking.
    /// Returns the number of frames that reached a terminal state.
    #[tracing::instrument(skip(self))]
    pub fn pump(&mut self) -> usize {
        let mut drained = Vec::new();
        if let Some(rx) = self.events.as_ref() {
            while let Ok(completion) = rx.try_recv() {
                drained.push(completion);
            }
        }

        let applied = drained.len();
        for completion in drained {
            self.apply(completion);
        }
        if self.state == SequenceState::Ready {
            self.events = None;
        }
        applied
    }

    /// Block until every frame is terminal (or the channel disconnects, which
    /// cannot happen before all workers have sent).
    pub fn wait_ready(&mut self) {
        while self.state == SequenceState::Loading {
            let completion = match self.events.as_ref() {
                Some(rx) => match rx.recv() {
                    Ok(completion) => completion,
                    Err(_) => break,
                },
                None => break,
            };
            self.apply(completion);
        }
        if self.state == SequenceState::Ready {
            self.events = None;
        }
    }

    fn apply(&mut self, completion: Completion) {
        let Some(slot) = self.slots.get_mut(completion.index) else {
            return;
        };
        if slot.is_terminal() {
            return;
        }

        *slot = match completion.frame {
            Some(frame) => FrameSlot::Ready(frame),
            None => FrameSlot::Failed,
        };
        self.completed += 1;
        if let Some(tracker) = &self.tracker {
            tracker.report_progress(1);
        }

        if self.completed == self.spec.frame_count {
            self.state = SequenceState::Ready;
            tracing::debug!(
                folder = %self.spec.folder,
                frames = self.spec.frame_count,
                "sequence ready"
            );
        }
    }
}
