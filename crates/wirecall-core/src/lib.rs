//! Request compilation, hook resolution, and response materialization.
//!
//! This crate is the engine behind Wirecall's declared operations: it turns
//! a [`RouteDefinition`](wirecall_model::RouteDefinition) plus bound argument
//! values into a wire request, runs pre-request and post-response hooks in
//! deterministic cross-scope order, throttles throughput with a shared
//! token-bucket limiter, and decodes responses according to the declared
//! result category. The transport itself stays behind the [`Transport`] and
//! [`AsyncTransport`] traits; `wirecall-http` provides the reqwest-backed
//! implementations.

pub mod builder;
pub mod cases;
mod engine;
pub mod hooks;
mod host;
mod limiter;
mod materialize;
mod scope;
mod transport;

pub use builder::{Arguments, build_args};
pub use cases::{
    ResolvedCases, camel_case, constant_case, header_case, identity, kebab_case, pascal_case,
    resolve_cases, snake_case,
};
pub use engine::Operation;
pub use hooks::{JsonFinalizer, Preparer, ResponseFinalizer};
pub use host::Host;
pub use limiter::RateLimit;
pub use scope::{OperationGroup, ScopeConfig};
pub use transport::{AsyncTransport, Transport};
