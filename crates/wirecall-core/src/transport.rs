//! The transport capability consumed by the execution engine.
//!
//! Connection pooling, TLS, and HTTP framing all live behind these traits;
//! the engine only hands over a compiled [`WireRequest`] and receives a
//! status/headers/body triple back. Implementations must reuse connections
//! across repeated calls through a long-lived client handle.

use async_trait::async_trait;
use wirecall_model::{TransportError, WireRequest, WireResponse};

/// Blocking transport: executes the round-trip on the calling thread.
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on connection or protocol failure; a
    /// non-2xx response is not an error at this boundary.
    fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError>;

    /// The base URL this transport is bound to, without a trailing slash.
    ///
    /// The engine rejects a transport whose base URL differs from the host
    /// it is used with.
    fn base_url(&self) -> &str;
}

/// Suspending transport: the round-trip is the async path's second
/// suspension point (the rate-limiter wait being the first).
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Execute one request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on connection or protocol failure; a
    /// non-2xx response is not an error at this boundary.
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError>;

    /// The base URL this transport is bound to, without a trailing slash.
    fn base_url(&self) -> &str;
}
