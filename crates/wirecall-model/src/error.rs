//! Error types shared across the Wirecall workspace.

use crate::wire::WireResponse;

/// Errors raised by the transport capability.
///
/// The engine never interprets these beyond passing them through; retry and
/// backoff policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport's own timeout elapsed.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be encoded or the response could not be read.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Error type for declaring and invoking operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An argument or response value failed schema validation.
    ///
    /// Surfaced to the caller unmodified, never retried.
    #[error("validation failed for parameter `{param}`: {message}")]
    Validation {
        /// The declared parameter (or response field) that failed.
        param: String,
        /// Human-readable description of the failure.
        message: String,
    },

    /// Structural misuse detected at declaration or first-call time.
    ///
    /// These are programmer errors, not runtime data errors: a missing
    /// response finalizer for a non-auto-decodable result, ambiguous
    /// non-embedded body parameters, an unresolved path placeholder, a
    /// mismatched base URL between a host and an externally supplied client.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The server answered with a non-2xx status and no response finalizer
    /// was registered to interpret it.
    ///
    /// Carries the raw response so the caller can inspect status, headers,
    /// and body.
    #[error("request failed with status {status}", status = .response.status)]
    Status {
        /// The raw wire response.
        response: WireResponse,
    },

    /// The transport failed before a response was produced.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be decoded as the declared result shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] value.
    pub fn validation(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Configuration`] value.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Convenience result type for Wirecall operations.
pub type Result<T> = std::result::Result<T, Error>;
