//! The client holder: at most one transport of each mode per host.

use std::sync::Arc;

use parking_lot::Mutex;
use wirecall_core::{AsyncTransport, Transport};
use wirecall_model::{Error, Result};

/// Holds at most one blocking and one suspending transport.
///
/// Retrieval is cheap and concurrent-safe; setting an occupied slot is a
/// configuration error. Replacing a client while in-flight calls still hold
/// a reference is the caller's responsibility — slots hand out `Arc` clones
/// and the manager does no further reference counting.
#[derive(Default)]
pub struct ClientManager {
    blocking: Mutex<Option<Arc<dyn Transport>>>,
    suspending: Mutex<Option<Arc<dyn AsyncTransport>>>,
}

impl std::fmt::Debug for ClientManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientManager")
            .field("blocking", &self.blocking.lock().is_some())
            .field("suspending", &self.suspending.lock().is_some())
            .finish()
    }
}

impl ClientManager {
    /// An empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the blocking transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the blocking slot is occupied.
    pub fn set_blocking(&self, transport: Arc<dyn Transport>) -> Result<()> {
        let mut slot = self.blocking.lock();
        if slot.is_some() {
            return Err(Error::configuration(
                "a blocking client is already set; pop it before setting another",
            ));
        }
        *slot = Some(transport);
        Ok(())
    }

    /// Store the suspending transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the suspending slot is occupied.
    pub fn set(&self, transport: Arc<dyn AsyncTransport>) -> Result<()> {
        let mut slot = self.suspending.lock();
        if slot.is_some() {
            return Err(Error::configuration(
                "an async client is already set; pop it before setting another",
            ));
        }
        *slot = Some(transport);
        Ok(())
    }

    /// Retrieve the blocking transport without removing it.
    #[must_use]
    pub fn get_blocking(&self) -> Option<Arc<dyn Transport>> {
        self.blocking.lock().clone()
    }

    /// Retrieve the suspending transport without removing it.
    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn AsyncTransport>> {
        self.suspending.lock().clone()
    }

    /// Remove and return the blocking transport.
    #[must_use]
    pub fn pop_blocking(&self) -> Option<Arc<dyn Transport>> {
        self.blocking.lock().take()
    }

    /// Remove and return the suspending transport.
    #[must_use]
    pub fn pop(&self) -> Option<Arc<dyn AsyncTransport>> {
        self.suspending.lock().take()
    }

    /// Whether the blocking slot is empty.
    #[must_use]
    pub fn is_empty_blocking(&self) -> bool {
        self.blocking.lock().is_none()
    }

    /// Whether the suspending slot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suspending.lock().is_none()
    }
}
