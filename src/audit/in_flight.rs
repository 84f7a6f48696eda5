//! # In-Flight Tracking
//!
//! Callers of the audit workflow block re-submission while an audit is pending and
//! must clear that state however the audit ends. [`InFlight`] holds the flag;
//! [`InFlightGuard`] clears it on drop, including on early return and on panic.
//! [`InFlight::run`] holds a guard for the lifetime of one future, which is how the
//! CLI wraps each audit.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pending-operation flag shared by a submit control and its result view
#[derive(Debug, Default)]
pub struct InFlight {
    pending: AtomicBool,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as started, or `None` if one is already pending
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag: self })
    }

    /// Drive `operation` while holding the flag, or `None` without polling it if
    /// another operation is pending. The flag is cleared whatever the output is.
    pub async fn run<F>(&self, operation: F) -> Option<F::Output>
    where
        F: Future,
    {
        let _guard = self.try_begin()?;
        Some(operation.await)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Clears the pending flag when dropped
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    flag: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.pending.store(false, Ordering::Release);
    }
}
