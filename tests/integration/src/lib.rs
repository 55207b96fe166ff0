//! End-to-end tests for the Wirecall operation engine.
//!
//! These tests drive declared operations through the full pipeline —
//! argument binding, case conversion, hook chains, rate limiting, and
//! response materialization — against an in-memory [`RecordingTransport`]
//! instead of a live server, so they run hermetically under `cargo test`.

use std::collections::VecDeque;
use std::sync::Once;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use wirecall_core::{AsyncTransport, Host, Transport};
use wirecall_model::{TransportError, WireRequest, WireResponse};

mod test_compile;
mod test_hooks;
mod test_limiter;

/// Base URL all test hosts and transports share.
pub const BASE_URL: &str = "http://testserver";

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A host bound to the test base URL.
#[must_use]
pub fn test_host() -> Host {
    init_tracing();
    Host::new(BASE_URL)
}

/// In-memory transport: records every request and replays queued responses.
///
/// Implements both transport modes over the same state, so the blocking and
/// async drivers exercise identical plumbing. When the response queue is
/// empty, calls get `200 OK` with an empty JSON object.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<WireRequest>>,
    responses: Mutex<VecDeque<WireResponse>>,
}

impl RecordingTransport {
    /// An empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response with the given status.
    pub fn push_json(&self, status: u16, body: &Value) {
        let response = WireResponse::new(
            http::StatusCode::from_u16(status).expect("valid status"),
            json_headers(),
            serde_json::to_vec(body).expect("serializable body"),
        );
        self.responses.lock().push_back(response);
    }

    /// Queue an arbitrary response.
    pub fn push_response(&self, response: WireResponse) {
        self.responses.lock().push_back(response);
    }

    /// All requests seen so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().clone()
    }

    /// The single request seen so far.
    ///
    /// # Panics
    ///
    /// Panics when zero or more than one request was recorded.
    #[must_use]
    pub fn only_request(&self) -> WireRequest {
        let requests = self.requests.lock();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn round_trip(&self, request: WireRequest) -> WireResponse {
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or_else(|| {
            WireResponse::new(http::StatusCode::OK, json_headers(), "{}")
        })
    }
}

fn json_headers() -> http::HeaderMap {
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    headers
}

impl Transport for RecordingTransport {
    fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        Ok(self.round_trip(request))
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }
}

#[async_trait]
impl AsyncTransport for RecordingTransport {
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        Ok(self.round_trip(request))
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }
}
