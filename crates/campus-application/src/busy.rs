//! In-flight markers for workflow calls.
//!
//! The flag is cleared by [`BusyGuard`] on drop, so a caller that abandons
//! the future (timeout, `select!`) leaves the workflow usable.

use campus_core::{PortalError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub(crate) struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Marks the call as running, or fails with [`PortalError::Busy`] if one already is.
    pub(crate) fn enter(&self) -> Result<BusyGuard> {
        if self.0.swap(true, Ordering::SeqCst) {
            return Err(PortalError::Busy);
        }
        Ok(BusyGuard(Arc::clone(&self.0)))
    }
}

#[must_use]
pub(crate) struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
