//! Model-set lifecycle management
//!
//! Owns the store-manager handle for the life of one model set. The slot is
//! explicit state, not ambient: exactly one manager is tracked, and
//! shutdown is idempotent. Even when the underlying shutdown fails, the
//! slot is released so repeated calls stay no-ops.

use std::sync::Mutex;

use tracing::debug;

use crate::error::StoreResult;
use crate::store::StoreManager;

/// Single-slot owner of one store manager
#[derive(Default)]
pub struct LifecycleManager {
    slot: Mutex<Option<StoreManager>>,
}

impl LifecycleManager {
    /// Create an empty lifecycle manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a manager for later teardown. Replaces any previously
    /// registered manager; the replaced one is returned to the caller
    /// rather than silently dropped.
    pub fn register(&self, manager: StoreManager) -> Option<StoreManager> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        debug!(root = %manager.path().display(), "store manager registered");
        slot.replace(manager)
    }

    /// Check if a manager is currently registered
    pub fn is_registered(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.is_some()
    }

    /// Release the registered manager: close all its stores and remove the
    /// working directory. Calling with an empty slot, or calling twice, is
    /// a no-op. The slot is cleared even when shutdown reports a failure.
    pub fn shutdown(&self) -> StoreResult<()> {
        let manager = {
            let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
            slot.take()
        };
        match manager {
            None => Ok(()),
            Some(manager) => manager.shutdown(),
        }
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LifecycleManager {{ registered: {} }}", self.is_registered())
    }
}
