//! Parameter origins and their resolution rules.

use std::fmt;

use http::Method;

/// Where a declared parameter lands in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamOrigin {
    /// Substituted into a `{placeholder}` token of the path template.
    Path,
    /// Appended to the URL query string.
    Query,
    /// Serialized into the JSON request body.
    Body,
    /// Sent as an HTTP header.
    Header,
    /// Sent in the `Cookie` header.
    Cookie,
    /// Sent as a URL-encoded form field.
    Form,
    /// Sent as a raw multipart file part. Never serialized or case-converted.
    File,
}

impl ParamOrigin {
    /// The origin assigned to a parameter declared without an explicit one:
    /// `Body` for methods that carry a request payload, `Query` otherwise.
    #[must_use]
    pub fn implicit_for(method: &Method) -> Self {
        if method_accepts_body(method) {
            Self::Body
        } else {
            Self::Query
        }
    }

    /// Stable lowercase name, used in error messages and tracing fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Form => "form",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ParamOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the method is expected to carry a request body.
#[must_use]
pub fn method_accepts_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Whether the method is semantically expected to return no response body.
///
/// Responses to these methods may source untyped-mapping results from the
/// response headers instead.
#[must_use]
pub fn method_is_bodyless(method: &Method) -> bool {
    matches!(*method, Method::HEAD | Method::OPTIONS)
}
