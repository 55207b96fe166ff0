//! Data model for the Wirecall operation engine.
//!
//! This crate holds the pure declaration-time and per-call data structures
//! shared by the rest of the workspace: parameter descriptors and their
//! origins, the route definition built once per declared operation, the
//! mutable request descriptor threaded through preparer hooks, the result
//! category classification, and the wire-level request/response types that
//! form the transport boundary.

mod args;
mod error;
mod origin;
mod param;
mod result;
mod route;
mod wire;

pub use args::{Args, FilePart};
pub use error::{Error, Result, TransportError};
pub use origin::{ParamOrigin, method_accepts_body, method_is_bodyless};
pub use param::{Constraints, ParamDescriptor};
pub use result::ResultKind;
pub use route::{CaseConverter, CaseMap, RouteDefinition, path_placeholders};
pub use wire::{WireBody, WireRequest, WireResponse};
