//! Hook types and their cross-scope resolution.
//!
//! Two hook kinds exist with different cardinality semantics. Preparers form
//! an order list: every applicable one runs, scope level first (a group-scope
//! preparer replaces the host-scope one), then route-scope preparers in
//! registration order. JSON and response finalizers are priority selections:
//! at most one of each runs per call.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use wirecall_model::{Args, Error, Result, WireResponse};

type SyncPreparerFn = dyn Fn(Args) -> Result<Args> + Send + Sync;
type AsyncPreparerFn = dyn Fn(Args) -> BoxFuture<'static, Result<Args>> + Send + Sync;

/// A pre-request callback rewriting the request descriptor.
///
/// Either synchronous or suspending; a suspending preparer attached to an
/// operation invoked on the blocking path is a configuration error.
#[derive(Clone)]
pub enum Preparer {
    /// Runs inline on both execution paths.
    Sync(Arc<SyncPreparerFn>),
    /// Suspends; only valid on the async execution path.
    Async(Arc<AsyncPreparerFn>),
}

impl Preparer {
    /// Wrap a synchronous preparer.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Args) -> Result<Args> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wrap a suspending preparer.
    pub fn suspending<F>(f: F) -> Self
    where
        F: Fn(Args) -> BoxFuture<'static, Result<Args>> + Send + Sync + 'static,
    {
        Self::Async(Arc::new(f))
    }

    /// Run on the blocking path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a suspending preparer, or
    /// whatever the preparer itself returns.
    pub fn call_blocking(&self, args: Args) -> Result<Args> {
        match self {
            Self::Sync(f) => f(args),
            Self::Async(_) => Err(Error::configuration(
                "suspending preparer attached to a blocking operation",
            )),
        }
    }

    /// Run on the async path.
    pub async fn call(&self, args: Args) -> Result<Args> {
        match self {
            Self::Sync(f) => f(args),
            Self::Async(f) => f(args).await,
        }
    }
}

impl fmt::Debug for Preparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Self::Sync(_) => "Sync",
            Self::Async(_) => "Async",
        };
        f.debug_tuple("Preparer").field(&variant).finish()
    }
}

/// A post-response callback over decoded JSON, before record construction.
///
/// Registrable at host or group scope only; a group-scope finalizer replaces
/// the host-scope one.
pub type JsonFinalizer = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

type SyncFinalizerFn<R> = dyn Fn(WireResponse) -> Result<R> + Send + Sync;
type AsyncFinalizerFn<R> = dyn Fn(WireResponse) -> BoxFuture<'static, Result<R>> + Send + Sync;

/// A route-scope callback producing the final result from the raw response.
///
/// Required whenever the declared result category is not auto-decodable.
/// When registered, it receives the raw response regardless of status and
/// decides how to interpret it.
#[derive(Clone)]
pub enum ResponseFinalizer<R> {
    /// Runs inline on both execution paths.
    Sync(Arc<SyncFinalizerFn<R>>),
    /// Suspends; only valid on the async execution path.
    Async(Arc<AsyncFinalizerFn<R>>),
}

impl<R> ResponseFinalizer<R> {
    /// Wrap a synchronous finalizer.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(WireResponse) -> Result<R> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wrap a suspending finalizer.
    pub fn suspending<F>(f: F) -> Self
    where
        F: Fn(WireResponse) -> BoxFuture<'static, Result<R>> + Send + Sync + 'static,
    {
        Self::Async(Arc::new(f))
    }

    /// Run on the blocking path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a suspending finalizer, or
    /// whatever the finalizer itself returns.
    pub fn call_blocking(&self, response: WireResponse) -> Result<R> {
        match self {
            Self::Sync(f) => f(response),
            Self::Async(_) => Err(Error::configuration(
                "suspending response finalizer attached to a blocking operation",
            )),
        }
    }

    /// Run on the async path.
    pub async fn call(&self, response: WireResponse) -> Result<R> {
        match self {
            Self::Sync(f) => f(response),
            Self::Async(f) => f(response).await,
        }
    }
}

impl<R> fmt::Debug for ResponseFinalizer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Self::Sync(_) => "Sync",
            Self::Async(_) => "Async",
        };
        f.debug_tuple("ResponseFinalizer").field(&variant).finish()
    }
}

/// Assemble the preparer order list for one call.
///
/// Order: the scope preparer (group replaces host) first, then route-scope
/// preparers in registration order. `skip_scope` drops the inherited scope
/// preparer only, never the route-scope ones.
#[must_use]
pub fn assemble_preparers(
    route_preparers: &[Preparer],
    group: Option<&Preparer>,
    host: Option<&Preparer>,
    skip_scope: bool,
) -> Vec<Preparer> {
    let mut chain = Vec::with_capacity(route_preparers.len() + 1);
    if !skip_scope {
        if let Some(scope) = group.or(host) {
            chain.push(scope.clone());
        }
    }
    chain.extend_from_slice(route_preparers);
    chain
}

/// Select the JSON finalizer for one call: group scope replaces host scope;
/// `skip_scope` suppresses both.
#[must_use]
pub fn select_json_finalizer(
    group: Option<&JsonFinalizer>,
    host: Option<&JsonFinalizer>,
    skip_scope: bool,
) -> Option<JsonFinalizer> {
    if skip_scope {
        None
    } else {
        group.or(host).cloned()
    }
}
