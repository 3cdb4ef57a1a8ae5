//! Ideal functionality utilities.

use std::sync::{Arc, Barrier};

/// Creates a new call synchronizer between two parties.
pub fn call_sync() -> (CallSync, CallSync) {
    let barrier = Arc::new(Barrier::new(2));
    (
        CallSync {
            barrier: Arc::clone(&barrier),
        },
        CallSync { barrier },
    )
}

/// Synchronizes function calls between two parties running on separate
/// threads.
#[derive(Debug)]
pub struct CallSync {
    barrier: Arc<Barrier>,
}

impl CallSync {
    /// Synchronizes a call.
    ///
    /// Blocks until both parties have called, then runs `f` for exactly one of
    /// them. Returns `Some` to the party which ran `f`.
    pub fn call<F: FnOnce() -> R, R>(&mut self, f: F) -> Option<R> {
        // Wait for both parties to call.
        let is_leader = self.barrier.wait().is_leader();

        let ret = if is_leader { Some(f()) } else { None };

        // Wait for the call to return.
        self.barrier.wait();

        ret
    }
}
