//! A host bound to its client holder: the top-level invocation surface.

use std::sync::Arc;

use wirecall_core::{Arguments, Host, Operation};
use wirecall_model::Result;

use crate::manager::ClientManager;
use crate::transport::{BlockingTransport, ReqwestTransport};

/// A [`Host`] paired with a [`ClientManager`].
///
/// Calls go through the managed transport when one is set; otherwise a
/// transient client is created for the call, so a session works out of the
/// box and callers opt into connection reuse by setting a long-lived client.
#[derive(Debug)]
pub struct Session {
    host: Host,
    manager: Arc<ClientManager>,
}

impl Session {
    /// Create a session with an empty client holder.
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            host,
            manager: Arc::new(ClientManager::new()),
        }
    }

    /// The underlying host declaration.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Mutable access to the host, for post-hoc hook registration.
    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// The client holder.
    #[must_use]
    pub fn manager(&self) -> &ClientManager {
        &self.manager
    }

    /// Invoke an operation on the blocking path.
    ///
    /// # Errors
    ///
    /// Propagates compilation, transport, and materialization errors; also
    /// fails when a transient blocking client cannot be constructed.
    pub fn call_blocking<R>(&self, operation: &Operation<R>, arguments: Arguments) -> Result<R> {
        match self.manager.get_blocking() {
            Some(transport) => {
                operation.invoke_blocking(&self.host, transport.as_ref(), arguments)
            }
            None => {
                tracing::debug!(base_url = %self.host.base_url(), "creating transient blocking client");
                let transport = BlockingTransport::new(self.host.base_url())?;
                operation.invoke_blocking(&self.host, &transport, arguments)
            }
        }
    }

    /// Invoke an operation on the async path.
    ///
    /// # Errors
    ///
    /// Propagates compilation, transport, and materialization errors.
    pub async fn call<R>(&self, operation: &Operation<R>, arguments: Arguments) -> Result<R> {
        match self.manager.get() {
            Some(transport) => operation.invoke(&self.host, transport.as_ref(), arguments).await,
            None => {
                tracing::debug!(base_url = %self.host.base_url(), "creating transient async client");
                let transport = ReqwestTransport::new(self.host.base_url());
                operation.invoke(&self.host, &transport, arguments).await
            }
        }
    }
}
