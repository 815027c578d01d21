use std::cell::RefCell;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::PaneId;
use crate::widget::UpdateLevel;

/// Upward request asking the owning chart to update a pane.
///
/// Fire-and-forget; may be called many times per frame and the receiver
/// coalesces.
pub trait RedrawTrigger {
    fn request_redraw(&self, pane: PaneId, level: UpdateLevel);
}

/// Receiver-side trigger coalescing requests per pane until drained.
#[derive(Debug, Default)]
pub struct RedrawQueue {
    pending: RefCell<IndexMap<PaneId, UpdateLevel>>,
}

impl RedrawQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending_level(&self, pane: PaneId) -> Option<UpdateLevel> {
        self.pending.borrow().get(&pane).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Removes and returns the merged request for `pane`.
    pub fn take(&self, pane: PaneId) -> Option<UpdateLevel> {
        self.pending.borrow_mut().shift_remove(&pane)
    }

    /// Drains every pane's merged request, in first-request order.
    pub fn take_pending(&self) -> Vec<(PaneId, UpdateLevel)> {
        self.pending.borrow_mut().drain(..).collect()
    }
}

impl RedrawTrigger for RedrawQueue {
    fn request_redraw(&self, pane: PaneId, level: UpdateLevel) {
        let mut pending = self.pending.borrow_mut();
        let merged = pending
            .get(&pane)
            .map_or(level, |previous| previous.merge(level));
        trace!(%pane, ?level, ?merged, "redraw requested");
        pending.insert(pane, merged);
    }
}
