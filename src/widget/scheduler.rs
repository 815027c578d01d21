/// Handle of one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host frame-callback mechanism (`requestAnimationFrame`-style).
///
/// The host later invokes the owner's frame callback with the returned
/// handle unless the request was cancelled first.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler whose frames fire only when the caller drains them.
#[derive(Debug, Default)]
pub struct ManualFrameScheduler {
    next: u64,
    pending: Vec<FrameHandle>,
    cancelled: usize,
}

impl ManualFrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }

    /// Frames due now, in request order. They are no longer pending.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}
