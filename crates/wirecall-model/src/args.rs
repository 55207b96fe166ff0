//! The mutable request descriptor threaded through preparer hooks.

use bytes::Bytes;
use serde_json::Value;

/// One file part of a multipart request.
///
/// File content is raw bytes end to end: it never passes through the
/// serialized form path or any string transcoding.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Part name on the wire.
    pub name: String,
    /// Raw content.
    pub content: Bytes,
    /// Optional filename reported in the part headers.
    pub filename: Option<String>,
    /// Optional media type of the part.
    pub media_type: Option<String>,
}

impl FilePart {
    /// Create a part from a name and raw content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            filename: None,
            media_type: None,
        }
    }
}

/// An in-flight request descriptor.
///
/// Created fresh per call by the request builder, handed through the preparer
/// chain by value, and consumed exactly once by the transport. Preparers may
/// rewrite any field; the URL may still contain unresolved placeholders only
/// inside the builder, never once the descriptor leaves it.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Request path or absolute URL.
    pub url: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub json_body: Option<Value>,
    /// URL-encoded form fields in insertion order.
    pub form_body: Vec<(String, String)>,
    /// Multipart file parts in insertion order.
    pub files: Vec<FilePart>,
    /// HTTP headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Cookies in insertion order.
    pub cookies: Vec<(String, String)>,
}

impl Args {
    /// Create an empty descriptor for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Look up a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Append a header.
    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Whether any body payload (JSON, form, or files) is present.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.json_body.is_some() || !self.form_body.is_empty() || !self.files.is_empty()
    }
}
