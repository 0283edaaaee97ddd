//! Interrupt-driven pedestrian call latch

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Pending pedestrian-crossing request, shared between the call-button
/// interrupt (writer) and the control arbiter (reader/clearer).
///
/// Safe for use in interrupt contexts: the flag and the edge timestamp are
/// the only data shared across the two execution contexts, and both are
/// single atomic words.
pub struct PedestrianRequest {
    pending: AtomicBool,
    last_edge_ms: AtomicU32,
}

impl PedestrianRequest {
    /// Create a new latch with no request pending
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            last_edge_ms: AtomicU32::new(0),
        }
    }

    /// Record a falling edge on the call-button line (called from the
    /// interrupt handler).
    ///
    /// Edges landing inside the debounce window of the last accepted edge
    /// are absorbed. Returns whether the edge was accepted. Latching while
    /// a request is already pending coalesces into the pending one.
    ///
    /// # Safety
    /// This function is safe to call from interrupt context
    pub fn signal(&self, now_ms: u32, debounce_ms: u32) -> bool {
        let last = self.last_edge_ms.load(Ordering::Relaxed);
        if now_ms.saturating_sub(last) >= debounce_ms {
            self.pending.store(true, Ordering::Relaxed);
            self.last_edge_ms.store(now_ms, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Check whether a crossing request is waiting to be serviced
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Relaxed)
    }

    /// Consume the request. Called by the arbiter only, after the crossing
    /// hold has run to completion — presses that arrived during the hold
    /// are wiped together with the serviced one.
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Relaxed);
    }

    /// Timestamp of the last accepted edge, ms
    pub fn last_edge_ms(&self) -> u32 {
        self.last_edge_ms.load(Ordering::Relaxed)
    }

    /// Reset latch state (for testing)
    #[cfg(feature = "test-utils")]
    pub fn reset(&self) {
        self.pending.store(false, Ordering::Relaxed);
        self.last_edge_ms.store(0, Ordering::Relaxed);
    }
}

impl Default for PedestrianRequest {
    fn default() -> Self {
        Self::new()
    }
}
