//! Result category classification for declared operations.

use std::fmt;

/// The declared shape of an operation's result.
///
/// The first six categories decode automatically; [`ResultKind::Custom`]
/// requires a response finalizer registered on the operation, and its absence
/// is a configuration error raised before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// Discard the body, return nothing.
    None,
    /// Return the decoded textual body.
    Text,
    /// Return the raw body bytes.
    Bytes,
    /// Return the decoded JSON structure as-is, skipping record validation.
    ///
    /// On bodyless methods (HEAD/OPTIONS) this category materializes the
    /// response headers as a string map instead of reading the body.
    Json,
    /// Decode JSON and construct one instance of the declared record type.
    Record,
    /// Decode a JSON array and construct one record instance per element.
    RecordList,
    /// Anything else: a response finalizer produces the result value.
    Custom,
}

impl ResultKind {
    /// Whether this category decodes without a response finalizer.
    #[must_use]
    pub fn is_auto(self) -> bool {
        !matches!(self, Self::Custom)
    }

    /// Whether the JSON post-processing chain (response-case conversion and
    /// the JSON finalizer) applies to this category.
    #[must_use]
    pub fn decodes_json(self) -> bool {
        matches!(self, Self::Json | Self::Record | Self::RecordList)
    }

    /// Stable lowercase name for error messages and tracing fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Json => "json",
            Self::Record => "record",
            Self::RecordList => "record_list",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
