//! Scope configuration: defaults a host or operation group supplies.

use std::fmt;

use serde_json::Value;
use wirecall_model::{Args, CaseMap, Result};

use crate::hooks::{JsonFinalizer, Preparer};

/// Configuration held by a host or by an operation group.
///
/// A group's configuration replaces the host's for any slot it sets
/// explicitly; unset slots defer to the host. Immutable once the first
/// operation is invoked — the engine only ever reads it.
#[derive(Clone, Default)]
pub struct ScopeConfig {
    /// Default case converters per origin.
    pub cases: CaseMap,
    /// Default pre-request hook.
    pub preparer: Option<Preparer>,
    /// Default JSON-postprocessing hook.
    pub json_finalizer: Option<JsonFinalizer>,
}

impl ScopeConfig {
    /// An empty scope: no converters, no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The conventional host scope: headers convert to `Header-Case`,
    /// everything else passes through untouched.
    #[must_use]
    pub fn for_host() -> Self {
        Self {
            cases: CaseMap {
                header: Some(crate::cases::header_case),
                ..CaseMap::default()
            },
            ..Self::default()
        }
    }

    /// Set the per-origin case converters.
    #[must_use]
    pub fn with_cases(mut self, cases: CaseMap) -> Self {
        self.cases = cases;
        self
    }

    /// Register the scope preparer.
    #[must_use]
    pub fn with_preparer<F>(mut self, f: F) -> Self
    where
        F: Fn(Args) -> Result<Args> + Send + Sync + 'static,
    {
        self.preparer = Some(Preparer::sync(f));
        self
    }

    /// Register a suspending scope preparer.
    #[must_use]
    pub fn with_suspending_preparer(mut self, preparer: Preparer) -> Self {
        self.preparer = Some(preparer);
        self
    }

    /// Register the scope JSON finalizer.
    #[must_use]
    pub fn with_json_finalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.json_finalizer = Some(std::sync::Arc::new(f));
        self
    }
}

impl fmt::Debug for ScopeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeConfig")
            .field("cases", &self.cases)
            .field("preparer", &self.preparer.as_ref().map(|_| "..."))
            .field("json_finalizer", &self.json_finalizer.as_ref().map(|_| "..."))
            .finish()
    }
}

/// An operation group: a record type that both validates response data and
/// issues requests, sharing scope configuration across its operations.
///
/// Declaring group operations with `Self` as the record target keeps results
/// subtype-correct: the invoking concrete type is constructed, not the type
/// the operation was first written for.
pub trait OperationGroup: serde::de::DeserializeOwned + Sized {
    /// The configuration this group supplies. Slots set here replace the
    /// host's; unset slots defer to it.
    #[must_use]
    fn scope() -> ScopeConfig {
        ScopeConfig::new()
    }
}
