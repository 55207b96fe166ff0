//! Wire-level request and response types: the transport boundary.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::args::{Args, FilePart};
use crate::error::{Error, Result};

/// The request payload, at most one variant per request.
#[derive(Debug, Clone, Default)]
pub enum WireBody {
    /// No payload.
    #[default]
    Empty,
    /// JSON payload.
    Json(Value),
    /// URL-encoded form payload.
    Form(Vec<(String, String)>),
    /// Multipart payload: text fields plus raw file parts.
    Multipart {
        /// Text form fields.
        fields: Vec<(String, String)>,
        /// Raw file parts.
        files: Vec<FilePart>,
    },
}

/// A fully compiled request, consumed exactly once by the transport.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL with all placeholders resolved.
    pub url: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Cookies in insertion order.
    pub cookies: Vec<(String, String)>,
    /// Request payload.
    pub body: WireBody,
}

impl WireRequest {
    /// Assemble a wire request from a prepared descriptor.
    ///
    /// Files force a multipart body (folding any form fields in as text
    /// parts); otherwise a form body wins over JSON only when JSON is absent.
    #[must_use]
    pub fn from_args(method: Method, args: Args) -> Self {
        let body = if !args.files.is_empty() {
            WireBody::Multipart {
                fields: args.form_body,
                files: args.files,
            }
        } else if !args.form_body.is_empty() {
            WireBody::Form(args.form_body)
        } else if let Some(json) = args.json_body {
            WireBody::Json(json)
        } else {
            WireBody::Empty
        };

        Self {
            method,
            url: args.url,
            query: args.query,
            headers: args.headers,
            cookies: args.cookies,
            body,
        }
    }
}

/// The raw response handed back by the transport.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Bytes,
}

impl WireResponse {
    /// Create a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body is not valid UTF-8.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| Error::Decode(format!("body is not valid UTF-8: {e}")))
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::Decode(format!("body is not valid JSON: {e}")))
    }

    /// The response headers as a JSON object of string values.
    ///
    /// Used to materialize untyped-mapping results of bodyless methods.
    #[must_use]
    pub fn headers_as_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.headers {
            if let Ok(v) = value.to_str() {
                map.insert(name.as_str().to_owned(), Value::String(v.to_owned()));
            }
        }
        Value::Object(map)
    }
}
