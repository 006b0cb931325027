//! Admission gate bounding concurrent calls into a shared resource.
//!
//! A counting semaphore built on `Mutex + Condvar`. An unbounded gate
//! admits every caller without touching a lock.

use std::sync::{Condvar, Mutex};

/// Counting semaphore sized to a resource's concurrency bound.
pub struct Gate {
    /// `None` = unbounded
    state: Option<Mutex<usize>>,
    cond: Condvar,
}

/// RAII guard that releases one permit on drop.
pub struct GateGuard<'a>(Option<&'a Gate>);

impl Gate {
    /// Gate admitting at most `permits` holders at once.
    ///
    /// A gate with zero permits never admits anyone.
    pub fn new(permits: usize) -> Self {
        Self {
            state: Some(Mutex::new(permits)),
            cond: Condvar::new(),
        }
    }

    /// Gate that admits every caller immediately.
    pub fn unbounded() -> Self {
        Self {
            state: None,
            cond: Condvar::new(),
        }
    }

    /// `Some(n)` builds a bounded gate, `None` an unbounded one.
    pub fn with_bound(permits: Option<usize>) -> Self {
        permits.map_or_else(Self::unbounded, Self::new)
    }

    pub fn is_bounded(&self) -> bool {
        self.state.is_some()
    }

    /// Block until a permit is available, then take it.
    pub fn acquire(&self) -> GateGuard<'_> {
        let Some(state) = &self.state else {
            return GateGuard(None);
        };
        let mut count = state.lock().expect("gate holder panicked");
        while *count == 0 {
            count = self.cond.wait(count).expect("gate holder panicked");
        }
        *count -= 1;
        GateGuard(Some(self))
    }

    /// Run `f` while holding one permit.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.acquire();
        f()
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        let Some(gate) = self.0 else {
            return;
        };
        if let Some(state) = &gate.state {
            // Release even if another holder poisoned the lock
            let mut count = state.lock().unwrap_or_else(|e| e.into_inner());
            *count += 1;
            gate.cond.notify_one();
        }
    }
}
