//! Typed operations and the shared execution core.
//!
//! An [`Operation`] ties an immutable [`RouteDefinition`] to a result type,
//! route-scope hooks, and an optional rate budget. Invocation compiles the
//! bound arguments into a request descriptor, runs the preparer chain,
//! acquires a rate-limit token, executes the transport round-trip, and
//! materializes the declared result. The blocking and suspending drivers
//! share all of that logic; they differ only at the two suspension points.

use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wirecall_model::{
    Args, Error, Result, ResultKind, RouteDefinition, WireRequest, WireResponse,
};

use crate::builder::{Arguments, build_args};
use crate::cases::{ResolvedCases, resolve_cases};
use crate::hooks::{
    JsonFinalizer, Preparer, ResponseFinalizer, assemble_preparers, select_json_finalizer,
};
use crate::host::Host;
use crate::limiter::RateLimit;
use crate::materialize::{decode_record, decode_records, decoded_json};
use crate::scope::{OperationGroup, ScopeConfig};
use crate::transport::{AsyncTransport, Transport};

/// Decodes an auto-decodable result category. `None` for the custom
/// category, where the response finalizer produces the result.
type Decoder<R> =
    fn(&RouteDefinition, &WireResponse, &ResolvedCases, Option<&JsonFinalizer>) -> Result<R>;

/// A declared operation with its result type fixed.
///
/// Construct with the category-matching constructor ([`Operation::unit`],
/// [`Operation::text`], [`Operation::bytes`], [`Operation::json`],
/// [`Operation::record`], [`Operation::records`], or [`Operation::custom`]),
/// then attach hooks, a group scope, or a rate budget. The operation itself
/// is immutable during calls and can be shared freely.
pub struct Operation<R> {
    route: Arc<RouteDefinition>,
    group: Option<ScopeConfig>,
    preparers: Vec<Preparer>,
    finalizer: Option<ResponseFinalizer<R>>,
    rate_limit: Option<Arc<RateLimit>>,
    decoder: Option<Decoder<R>>,
}

impl<R> std::fmt::Debug for Operation<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("route", &self.route)
            .field("preparers", &self.preparers.len())
            .field("finalizer", &self.finalizer.is_some())
            .field("rate_limit", &self.rate_limit.is_some())
            .finish()
    }
}

fn check_kind(route: &RouteDefinition, expected: ResultKind) -> Result<()> {
    if route.result == expected {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "route `{}` declares result category `{}` but the operation was constructed for `{expected}`",
            route.path, route.result
        )))
    }
}

impl Operation<()> {
    /// An operation that discards the response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the route's declared category
    /// is not [`ResultKind::None`].
    pub fn unit(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::None)?;
        Ok(Self::with_decoder(route, |_, _, _, _| Ok(())))
    }
}

impl Operation<String> {
    /// An operation returning the decoded textual body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a category mismatch.
    pub fn text(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::Text)?;
        Ok(Self::with_decoder(route, |_, response, _, _| response.text()))
    }
}

impl Operation<Bytes> {
    /// An operation returning the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a category mismatch.
    pub fn bytes(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::Bytes)?;
        Ok(Self::with_decoder(route, |_, response, _, _| {
            Ok(response.body.clone())
        }))
    }
}

impl Operation<Value> {
    /// An operation returning untyped JSON, skipping record validation.
    ///
    /// On HEAD/OPTIONS routes the result is the response headers as a
    /// string map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a category mismatch.
    pub fn json(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::Json)?;
        Ok(Self::with_decoder(route, decoded_json))
    }
}

impl<R: DeserializeOwned> Operation<R> {
    /// An operation constructing one validated record instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a category mismatch.
    pub fn record(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::Record)?;
        Ok(Self::with_decoder(route, |route, response, cases, finalize| {
            decode_record(decoded_json(route, response, cases, finalize)?)
        }))
    }
}

impl<R: DeserializeOwned> Operation<Vec<R>> {
    /// An operation constructing one validated record per array element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a category mismatch.
    pub fn records(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::RecordList)?;
        Ok(Self::with_decoder(route, |route, response, cases, finalize| {
            decode_records(decoded_json(route, response, cases, finalize)?)
        }))
    }
}

impl<R> Operation<R> {
    /// An operation whose result is produced entirely by a response
    /// finalizer. Invoking it without one registered is a configuration
    /// error raised before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a category mismatch.
    pub fn custom(route: RouteDefinition) -> Result<Self> {
        check_kind(&route, ResultKind::Custom)?;
        Ok(Self {
            route: Arc::new(route),
            group: None,
            preparers: Vec::new(),
            finalizer: None,
            rate_limit: None,
            decoder: None,
        })
    }

    fn with_decoder(route: RouteDefinition, decoder: Decoder<R>) -> Self {
        Self {
            route: Arc::new(route),
            group: None,
            preparers: Vec::new(),
            finalizer: None,
            rate_limit: None,
            decoder: Some(decoder),
        }
    }

    /// The underlying route definition.
    #[must_use]
    pub fn route(&self) -> &RouteDefinition {
        &self.route
    }

    /// Attach a group scope: its explicitly set slots replace the host's.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeConfig) -> Self {
        self.group = Some(scope);
        self
    }

    /// Attach the scope of an [`OperationGroup`] type. Declaring inside the
    /// group's own `impl` with `G = Self` keeps results subtype-correct.
    #[must_use]
    pub fn in_group<G: OperationGroup>(self) -> Self {
        self.with_scope(G::scope())
    }

    /// Give the operation its own rate budget, overriding the host's.
    #[must_use]
    pub fn with_rate_limit(mut self, limit: Arc<RateLimit>) -> Self {
        self.rate_limit = Some(limit);
        self
    }

    /// Append a route-scope preparer. Route preparers run after the
    /// inherited scope preparer, in registration order.
    #[must_use]
    pub fn prepare<F>(mut self, f: F) -> Self
    where
        F: Fn(Args) -> Result<Args> + Send + Sync + 'static,
    {
        self.preparers.push(Preparer::sync(f));
        self
    }

    /// Append a suspending route-scope preparer.
    #[must_use]
    pub fn prepare_suspending<F>(mut self, f: F) -> Self
    where
        F: Fn(Args) -> BoxFuture<'static, Result<Args>> + Send + Sync + 'static,
    {
        self.preparers.push(Preparer::suspending(f));
        self
    }

    /// Register the response finalizer. It receives the raw response
    /// regardless of status and produces the final result.
    #[must_use]
    pub fn finalize<F>(mut self, f: F) -> Self
    where
        F: Fn(WireResponse) -> Result<R> + Send + Sync + 'static,
    {
        self.finalizer = Some(ResponseFinalizer::sync(f));
        self
    }

    /// Register a suspending response finalizer.
    #[must_use]
    pub fn finalize_suspending<F>(mut self, f: F) -> Self
    where
        F: Fn(WireResponse) -> BoxFuture<'static, Result<R>> + Send + Sync + 'static,
    {
        self.finalizer = Some(ResponseFinalizer::suspending(f));
        self
    }

    /// Fail fast on contract violations, before any token is consumed or
    /// request sent.
    fn check_contract(&self, chain: &[Preparer], blocking: bool) -> Result<()> {
        if self.decoder.is_none() && self.finalizer.is_none() {
            return Err(Error::configuration(format!(
                "route `{}` has result category `custom` but no response finalizer is registered",
                self.route.path
            )));
        }
        if blocking {
            if chain.iter().any(|p| matches!(p, Preparer::Async(_))) {
                return Err(Error::configuration(
                    "suspending preparer attached to a blocking operation",
                ));
            }
            if matches!(self.finalizer, Some(ResponseFinalizer::Async(_))) {
                return Err(Error::configuration(
                    "suspending response finalizer attached to a blocking operation",
                ));
            }
        }
        Ok(())
    }

    /// Everything shared by the two drivers up to the first suspension
    /// point: case resolution, descriptor building, and hook selection.
    fn compile(
        &self,
        host: &Host,
        transport_base_url: &str,
        arguments: Arguments,
        blocking: bool,
    ) -> Result<(Args, Vec<Preparer>, ResolvedCases, Option<JsonFinalizer>)> {
        host.ensure_transport_matches(transport_base_url)?;

        let chain = assemble_preparers(
            &self.preparers,
            self.group.as_ref().and_then(|g| g.preparer.as_ref()),
            host.scope().preparer.as_ref(),
            self.route.skip_preparer,
        );
        self.check_contract(&chain, blocking)?;

        let cases = resolve_cases(
            &self.route,
            self.group.as_ref().map(|g| &g.cases),
            &host.scope().cases,
        );
        let json_finalizer = select_json_finalizer(
            self.group.as_ref().and_then(|g| g.json_finalizer.as_ref()),
            host.scope().json_finalizer.as_ref(),
            self.route.skip_finalizer,
        );

        let args = build_args(&self.route, &cases, arguments)?;
        tracing::debug!(
            method = %self.route.method,
            url = %args.url,
            result = %self.route.result,
            "compiled request descriptor"
        );

        Ok((args, chain, cases, json_finalizer))
    }

    fn rate_limit<'a>(&'a self, host: &'a Host) -> Option<&'a Arc<RateLimit>> {
        self.rate_limit.as_ref().or_else(|| host.rate_limit())
    }

    fn materialize_auto(
        &self,
        response: WireResponse,
        cases: &ResolvedCases,
        json_finalizer: Option<&JsonFinalizer>,
    ) -> Result<R> {
        if !response.is_success() {
            return Err(Error::Status { response });
        }
        let Some(decoder) = self.decoder else {
            return Err(Error::configuration(
                "no decoder and no response finalizer for this operation",
            ));
        };
        decoder(&self.route, &response, cases, json_finalizer)
    }

    /// Invoke on the blocking path: the calling thread sleeps through the
    /// rate-limiter wait and the transport round-trip.
    ///
    /// # Errors
    ///
    /// Configuration and validation errors surface before the request is
    /// sent; transport, status, and decode errors after.
    pub fn invoke_blocking<T>(
        &self,
        host: &Host,
        transport: &T,
        arguments: Arguments,
    ) -> Result<R>
    where
        T: Transport + ?Sized,
    {
        let (mut args, chain, cases, json_finalizer) =
            self.compile(host, transport.base_url(), arguments, true)?;

        for preparer in &chain {
            args = preparer.call_blocking(args)?;
        }
        args.url = host.join(&args.url);

        if let Some(limit) = self.rate_limit(host) {
            limit.acquire();
        }

        let request = WireRequest::from_args(self.route.method.clone(), args);
        tracing::debug!(method = %request.method, url = %request.url, "executing request");
        let response = transport.execute(request)?;
        tracing::debug!(status = %response.status, "received response");

        match &self.finalizer {
            Some(finalizer) => finalizer.call_blocking(response),
            None => self.materialize_auto(response, &cases, json_finalizer.as_ref()),
        }
    }

    /// Invoke on the async path: the rate-limiter wait and the transport
    /// round-trip suspend instead of blocking.
    ///
    /// # Errors
    ///
    /// Configuration and validation errors surface before the request is
    /// sent; transport, status, and decode errors after.
    pub async fn invoke<T>(&self, host: &Host, transport: &T, arguments: Arguments) -> Result<R>
    where
        T: AsyncTransport + ?Sized,
    {
        let (mut args, chain, cases, json_finalizer) =
            self.compile(host, transport.base_url(), arguments, false)?;

        for preparer in &chain {
            args = preparer.call(args).await?;
        }
        args.url = host.join(&args.url);

        if let Some(limit) = self.rate_limit(host) {
            limit.acquire_async().await;
        }

        let request = WireRequest::from_args(self.route.method.clone(), args);
        tracing::debug!(method = %request.method, url = %request.url, "executing request");
        let response = transport.execute(request).await?;
        tracing::debug!(status = %response.status, "received response");

        match &self.finalizer {
            Some(finalizer) => finalizer.call(response).await,
            None => self.materialize_auto(response, &cases, json_finalizer.as_ref()),
        }
    }
}
