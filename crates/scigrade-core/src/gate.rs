//! Single-flight guard for submissions.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, ScigradeError};

/// Admits at most one submission at a time. A second attempt while one is
/// in flight is rejected rather than queued.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    in_flight: AtomicBool,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Result<SubmissionGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScigradeError::Busy)?;
        Ok(SubmissionGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped, including on error paths
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    gate: &'a SubmissionGate,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}
