use super::constants::ANALYSIS_BUFFER_SIZE;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// One windowed, zero-padded analysis frame
pub type AnalysisFrame = [f32; ANALYSIS_BUFFER_SIZE];

/// Publication state of the shared analysis frame
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Nothing has been published yet
    NotReady = 0,
    /// A frame is waiting for the analysis thread
    Ready = 1,
    /// The last published frame has been transformed, the slot is free again
    Consumed = 2,
}

impl FrameState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Ready,
            2 => Self::Consumed,
            _ => Self::NotReady,
        }
    }
}

/// Single-slot exchange between the audio thread and the analysis thread
///
/// The `state` flag decides who owns `frame`: the sender while it is not
/// `Ready`, the receiver while it is. The release store that flips the flag
/// makes every write to the frame visible to the side that observes the new
/// state with an acquire load.
struct Shared {
    state: AtomicU8,
    frame: UnsafeCell<Box<AnalysisFrame>>,
    published: AtomicU64,
    dropped: AtomicU64,
}

// SAFETY: `frame` is only ever accessed by the single `FrameSender` while the state
// is not `Ready`, and by the single `FrameReceiver` while it is. Neither handle is
// `Clone` and both require `&mut self`, so there are never two live references.
unsafe impl Send for Shared {}
unsafe impl Sync for Shared {}

impl Shared {
    fn state(&self) -> FrameState {
        FrameState::from_u8(self.state.load(Ordering::Acquire))
    }
}

/// Creates the sender (audio thread) and receiver (analysis thread) pair
pub fn frame_exchange() -> (FrameSender, FrameReceiver) {
    let shared = Arc::new(Shared {
        state: AtomicU8::new(FrameState::NotReady as u8),
        frame: UnsafeCell::new(Box::new([0.0; ANALYSIS_BUFFER_SIZE])),
        published: AtomicU64::new(0),
        dropped: AtomicU64::new(0),
    });

    (
        FrameSender {
            shared: shared.clone(),
        },
        FrameReceiver { shared },
    )
}

/// Audio thread side. Never blocks, never allocates
pub struct FrameSender {
    shared: Arc<Shared>,
}

impl FrameSender {
    /// Fill and publish a frame unless the previous one is still pending
    ///
    /// Returns `false` when the new frame was dropped. The pending frame is left
    /// untouched in that case.
    pub fn try_publish(&mut self, fill: impl FnOnce(&mut AnalysisFrame)) -> bool {
        if self.shared.state() == FrameState::Ready {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: the state is not `Ready`, so the receiver does not touch the frame
        // until we store `Ready` below. The acquire load above synchronizes with the
        // receiver's release store of `Consumed`.
        let frame = unsafe { &mut **self.shared.frame.get() };
        fill(frame);

        self.shared
            .state
            .store(FrameState::Ready as u8, Ordering::Release);
        self.shared.published.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn state(&self) -> FrameState {
        self.shared.state()
    }

    pub fn published_frames(&self) -> u64 {
        self.shared.published.load(Ordering::Relaxed)
    }

    pub fn dropped_frames(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

/// Analysis thread side
pub struct FrameReceiver {
    shared: Arc<Shared>,
}

impl FrameReceiver {
    /// Run `read` over the pending frame, if any, then mark it consumed
    ///
    /// The frame may be modified in place; it is dead once this returns.
    pub fn try_consume<R>(&mut self, read: impl FnOnce(&mut AnalysisFrame) -> R) -> Option<R> {
        if self.shared.state() != FrameState::Ready {
            return None;
        }

        // SAFETY: the state is `Ready`, so the sender will not write the frame until we
        // store `Consumed`. The acquire load above synchronizes with its release store.
        let frame = unsafe { &mut **self.shared.frame.get() };
        let result = read(frame);

        self.shared
            .state
            .store(FrameState::Consumed as u8, Ordering::Release);
        Some(result)
    }

    pub fn state(&self) -> FrameState {
        self.shared.state()
    }

    pub fn published_frames(&self) -> u64 {
        self.shared.published.load(Ordering::Relaxed)
    }

    pub fn dropped_frames(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}
