//! Event flags shared between the radio interrupt lines and the receive loop.
//!
//! The interrupt side only ever raises a flag; the receive loop is the only
//! reader and the only party that clears one. A raise that happens while a
//! flag is already set is absorbed, so several edges between two polls are
//! observed as one event.

use core::sync::atomic::{AtomicBool, Ordering};

/// Packet/preamble detected and channel busy/timeout signals.
#[derive(Debug)]
pub struct EventFlags {
    detected: AtomicBool,
    timeout: AtomicBool,
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFlags {
    /// Both flags lowered.
    pub const fn new() -> Self {
        Self { detected: AtomicBool::new(false), timeout: AtomicBool::new(false) }
    }

    /// Raise the detected flag. Safe to call from interrupt context.
    pub fn on_detected(&self) {
        self.detected.store(true, Ordering::Release);
    }

    /// Raise the timeout flag. Safe to call from interrupt context.
    pub fn on_timeout_signal(&self) {
        self.timeout.store(true, Ordering::Release);
    }

    /// Consume the detected flag, returning whether it was raised.
    pub(crate) fn take_detected(&self) -> bool {
        self.detected.swap(false, Ordering::Acquire)
    }

    /// Consume the timeout flag, returning whether it was raised.
    pub(crate) fn take_timeout(&self) -> bool {
        self.timeout.swap(false, Ordering::Acquire)
    }

    /// Whether a detected edge is waiting to be consumed.
    pub fn is_detected_pending(&self) -> bool {
        self.detected.load(Ordering::Acquire)
    }

    /// Whether a timeout edge is waiting to be consumed.
    pub fn is_timeout_pending(&self) -> bool {
        self.timeout.load(Ordering::Acquire)
    }
}

/// Process-wide flags for setups where the interrupt handlers are free functions.
pub static EVENT_FLAGS: EventFlags = EventFlags::new();

/// Handler for the rising edge of the packet/preamble detected line.
pub fn on_detected() {
    EVENT_FLAGS.on_detected();
}

/// Handler for the rising edge of the channel busy/timeout line.
pub fn on_timeout_signal() {
    EVENT_FLAGS.on_timeout_signal();
}
