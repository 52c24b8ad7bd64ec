//! Dispatch counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub(crate) struct Counters {
    broadcasts: AtomicU64,
    deliveries: AtomicU64,
    type_mismatches: AtomicU64,
    pruned: AtomicU64,
    rejected: AtomicU64,
}

impl Counters {
    pub(crate) fn broadcast(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn delivered(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn type_mismatch(&self) {
        self.type_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn pruned(&self, count: usize) {
        self.pruned.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            type_mismatches: self.type_mismatches.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time dispatch statistics for a bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Broadcasts started, including ones that reached no listener.
    pub broadcasts: u64,
    /// Listener callbacks invoked.
    pub deliveries: u64,
    /// Listeners skipped because the payload type did not match.
    pub type_mismatches: u64,
    /// Listeners removed because their owner was gone.
    pub pruned: u64,
    /// Calls rejected at the marshaling boundary.
    pub rejected: u64,
}

impl fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} broadcasts, {} deliveries, {} type mismatches, {} pruned, {} rejected",
            self.broadcasts, self.deliveries, self.type_mismatches, self.pruned, self.rejected
        )
    }
}
