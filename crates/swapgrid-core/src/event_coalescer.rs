#![forbid(unsafe_code)]

//! Per-frame coalescing of pointer moves.
//!
//! Pointer devices report moves far more often than a display refreshes.
//! Hit testing re-measures every tile, so evaluating each report would be
//! wasted work: only the position at the next frame matters.
//!
//! [`MoveCoalescer`] keeps the latest pending move ("latest wins") and hands it
//! out once per frame via [`MoveCoalescer::take_for_frame`]. Presses,
//! releases, and cancels are never coalesced; [`MoveCoalescer::push`] returns
//! them to the caller immediately.
//!
//! # Usage
//!
//! ```
//! use std::time::Instant;
//! use swapgrid_core::event::PointerEvent;
//! use swapgrid_core::event_coalescer::MoveCoalescer;
//!
//! let now = Instant::now();
//! let mut coalescer = MoveCoalescer::new();
//!
//! assert!(coalescer.push(PointerEvent::moved(1.0, 1.0, now)).is_none());
//! assert!(coalescer.push(PointerEvent::moved(5.0, 7.0, now)).is_none());
//!
//! // Releases pass straight through.
//! assert!(coalescer.push(PointerEvent::up(5.0, 7.0, now)).is_some());
//!
//! // One frame sees one move: the latest.
//! let latest = coalescer.take_for_frame().unwrap();
//! assert_eq!(latest.position.x, 5.0);
//! assert!(coalescer.take_for_frame().is_none());
//! ```

use crate::event::{PointerEvent, PointerKind};

/// Coalesces pointer moves so at most one is processed per frame.
///
/// Not thread-safe; owned by the single UI loop that feeds it.
#[derive(Debug, Clone, Default)]
pub struct MoveCoalescer {
    pending: Option<PointerEvent>,
    /// Moves folded into `pending` since the last frame, for diagnostics.
    folded: u32,
}

impl MoveCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an event.
    ///
    /// Moves replace any pending move and return `None`. Every other kind is
    /// returned unchanged for immediate handling; the pending move is left in
    /// place (the caller decides whether to flush or [`clear`](Self::clear)).
    pub fn push(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        match event.kind {
            PointerKind::Move => {
                if self.pending.is_some() {
                    self.folded = self.folded.saturating_add(1);
                }
                self.pending = Some(event);
                None
            }
            PointerKind::Down | PointerKind::Up | PointerKind::Cancel => Some(event),
        }
    }

    /// Take the pending move for this frame, if any.
    pub fn take_for_frame(&mut self) -> Option<PointerEvent> {
        self.folded = 0;
        self.pending.take()
    }

    /// Check whether a move is waiting for the next frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of moves dropped in favour of a later one since the last frame.
    #[must_use]
    pub fn folded_count(&self) -> u32 {
        self.folded
    }

    /// Discard any pending move without processing it.
    pub fn clear(&mut self) {
        self.pending = None;
        self.folded = 0;
    }
}
