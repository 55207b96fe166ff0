//! The host: the base-address grouping construct operations are invoked under.

use std::sync::Arc;

use serde_json::Value;
use typed_builder::TypedBuilder;
use wirecall_model::{Args, Error, Result};

use crate::limiter::RateLimit;
use crate::scope::ScopeConfig;

/// Strip trailing slashes so path joining stays deterministic.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}

/// A host groups operations under one base address and supplies their
/// default scope configuration and rate budget.
///
/// Immutable once calls start; concurrent calls to operations of the same
/// host contend only on the rate limiter.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Host {
    /// Base address, e.g. `https://api.example.com`. Normalized to carry no
    /// trailing slash.
    #[builder(setter(transform = |url: &str| normalize_base_url(url)))]
    base_url: String,

    /// Optional port, appended to the base address when joining paths.
    #[builder(default)]
    port: Option<u16>,

    /// Default case converters and hooks for operations of this host.
    #[builder(default = ScopeConfig::for_host())]
    scope: ScopeConfig,

    /// Rate budget shared by operations of this host that do not carry
    /// their own.
    #[builder(default)]
    rate_limit: Option<Arc<RateLimit>>,
}

impl Host {
    /// A host with the conventional defaults: header-case header names, no
    /// hooks, no rate budget.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(&base_url.into()).build()
    }

    /// The normalized base address, with the port folded in when set.
    #[must_use]
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.base_url),
            None => self.base_url.clone(),
        }
    }

    /// The host's scope configuration.
    #[must_use]
    pub fn scope(&self) -> &ScopeConfig {
        &self.scope
    }

    /// The host's default rate budget, if any.
    #[must_use]
    pub fn rate_limit(&self) -> Option<&Arc<RateLimit>> {
        self.rate_limit.as_ref()
    }

    /// Register the host-scope preparer after construction.
    pub fn prepare<F>(&mut self, f: F)
    where
        F: Fn(Args) -> Result<Args> + Send + Sync + 'static,
    {
        self.scope = std::mem::take(&mut self.scope).with_preparer(f);
    }

    /// Register the host-scope JSON finalizer after construction.
    pub fn finalize_json<F>(&mut self, f: F)
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.scope = std::mem::take(&mut self.scope).with_json_finalizer(f);
    }

    /// Resolve a request path against the base address. Absolute URLs pass
    /// through untouched so preparers may redirect a call wholesale.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let base = self.base_url();
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Reject a transport bound to a different base address than this host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on mismatch.
    pub fn ensure_transport_matches(&self, transport_base_url: &str) -> Result<()> {
        let ours = self.base_url();
        let theirs = normalize_base_url(transport_base_url);
        if ours == theirs {
            Ok(())
        } else {
            Err(Error::configuration(format!(
                "transport base URL `{theirs}` does not match host base URL `{ours}`"
            )))
        }
    }
}
