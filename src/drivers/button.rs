//! ISR-debounced set-point buttons.
//!
//! ## Hardware
//!
//! Two active-low momentary switches (raise / lower) with external pull-ups.
//! Each GPIO fires on the falling edge; the ISR calls [`DebouncedButton::on_raw_edge`]
//! with the current monotonic millisecond timestamp.
//!
//! ## Debounce contract
//!
//! A raw edge is accepted as a genuine press only if it arrives at least one
//! debounce window after the previously accepted edge.  Accepted presses set
//! a **single-slot** pending flag — not a queue — so a burst of bounces or
//! rapid re-presses collapses to at most one event per window, and one
//! physical press can never register as two set-point steps.  A discarded
//! bounce is not an error; it is the intended behaviour.
//!
//! All state is per-instance atomics: the ISR path is lock-free, and tests
//! can run any number of independent buttons.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Sentinel for "no edge accepted yet".  An uptime of `u32::MAX` ms is
/// ~49.7 days; colliding with it merely re-arms the first-press fast path.
const NEVER: u32 = u32::MAX;

/// Set-point adjustment carried by an accepted press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Raise the set point one step.
    Increment,
    /// Lower the set point one step.
    Decrement,
}

/// Debounce state machine for one physical button.
pub struct DebouncedButton {
    event: ButtonEvent,
    debounce_ms: u32,
    /// Timestamp of the last accepted edge.  Monotonically non-decreasing
    /// (modulo u32 wrap) because it only ever stores the ISR's `now_ms`.
    last_accepted_ms: AtomicU32,
    /// Single-slot pending event flag.
    pending: AtomicBool,
}

impl DebouncedButton {
    pub fn new(event: ButtonEvent, debounce_ms: u32) -> Self {
        Self {
            event,
            debounce_ms,
            last_accepted_ms: AtomicU32::new(NEVER),
            pending: AtomicBool::new(false),
        }
    }

    /// Feed one raw electrical edge.  Safe to call from interrupt context:
    /// two atomic accesses, no locks, no allocation.
    ///
    /// `now_ms` must come from a monotonic clock.  Edges inside the debounce
    /// window are silently discarded.
    pub fn on_raw_edge(&self, now_ms: u32) {
        let last = self.last_accepted_ms.load(Ordering::Relaxed);
        if last != NEVER && now_ms.wrapping_sub(last) < self.debounce_ms {
            return; // bounce — discard
        }
        self.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending event, if any.  Called from the main loop once
    /// per control tick; at most one event is ever returned per call.
    pub fn take(&self) -> Option<ButtonEvent> {
        if self.pending.swap(false, Ordering::Acquire) {
            Some(self.event)
        } else {
            None
        }
    }

    /// Timestamp of the last accepted edge (None before the first press).
    pub fn last_accepted_ms(&self) -> Option<u32> {
        match self.last_accepted_ms.load(Ordering::Relaxed) {
            NEVER => None,
            t => Some(t),
        }
    }
}
