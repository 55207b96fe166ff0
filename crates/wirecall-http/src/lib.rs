//! reqwest-backed transports and client management for Wirecall.
//!
//! `wirecall-core` consumes the transport capability behind its
//! [`Transport`](wirecall_core::Transport) and
//! [`AsyncTransport`](wirecall_core::AsyncTransport) traits; this crate
//! provides the reqwest implementations of both, the per-host client holder,
//! and the [`Session`] convenience surface tying a host to its clients.

mod manager;
mod session;
mod transport;

pub use manager::ClientManager;
pub use session::Session;
pub use transport::{BlockingTransport, ReqwestTransport};
