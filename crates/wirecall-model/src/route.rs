//! Route definitions: the immutable per-operation declaration.

use std::sync::LazyLock;

use http::Method;
use regex::Regex;

use crate::error::{Error, Result};
use crate::origin::ParamOrigin;
use crate::param::ParamDescriptor;
use crate::result::ResultKind;

/// A pure string-case conversion function.
///
/// Converters are plain function pointers so they stay `Copy`, comparable in
/// spirit, and free of captured state; the built-in set lives in
/// `wirecall-core`.
pub type CaseConverter = fn(&str) -> String;

/// Per-origin case converter slots.
///
/// Used at route, group, and host scope. An unset slot defers to the next
/// scope in priority order; a set slot replaces it outright.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseMap {
    /// Converter for query parameter keys.
    pub query: Option<CaseConverter>,
    /// Converter for first-level JSON body and form keys.
    pub body: Option<CaseConverter>,
    /// Converter for cookie names.
    pub cookie: Option<CaseConverter>,
    /// Converter for header names.
    pub header: Option<CaseConverter>,
    /// Converter for first-level keys of decoded response JSON.
    pub response: Option<CaseConverter>,
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// Extract the `{placeholder}` tokens of a path template, in order.
#[must_use]
pub fn path_placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|c| c[1].to_owned())
        .collect()
}

/// One declared operation: method, path template, parameters, and result
/// category, plus per-route case overrides and inheritance skip flags.
///
/// Created once at declaration time, validated eagerly, and shared immutably
/// across all calls.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    /// HTTP method.
    pub method: Method,
    /// Path template, possibly containing `{placeholder}` tokens.
    pub path: String,
    /// Declared parameters in declaration order.
    pub params: Vec<ParamDescriptor>,
    /// Declared result category.
    pub result: ResultKind,
    /// Route-scope case converter overrides.
    pub cases: CaseMap,
    /// Suppress the inherited host/group preparer for this route.
    pub skip_preparer: bool,
    /// Suppress the inherited host/group JSON finalizer for this route.
    pub skip_finalizer: bool,
}

impl RouteDefinition {
    /// Declare a route and validate its construction-time invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a path descriptor has no
    /// matching `{placeholder}` (or vice versa), when more than one
    /// non-embedded body/form parameter is declared, or when a media type is
    /// set on an origin that cannot carry one.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        params: Vec<ParamDescriptor>,
        result: ResultKind,
    ) -> Result<Self> {
        let route = Self {
            method,
            path: path.into(),
            params,
            result,
            cases: CaseMap::default(),
            skip_preparer: false,
            skip_finalizer: false,
        };
        route.validate()?;
        Ok(route)
    }

    /// Set route-scope case converter overrides.
    #[must_use]
    pub fn with_cases(mut self, cases: CaseMap) -> Self {
        self.cases = cases;
        self
    }

    /// Suppress the inherited scope preparer.
    #[must_use]
    pub fn skipping_preparer(mut self) -> Self {
        self.skip_preparer = true;
        self
    }

    /// Suppress the inherited JSON finalizer.
    #[must_use]
    pub fn skipping_finalizer(mut self) -> Self {
        self.skip_finalizer = true;
        self
    }

    /// Descriptors with the given resolved origin, in declaration order.
    pub fn params_with_origin(
        &self,
        origin: ParamOrigin,
    ) -> impl Iterator<Item = &ParamDescriptor> {
        self.params
            .iter()
            .filter(move |p| p.resolved_origin(&self.method) == origin)
    }

    fn validate(&self) -> Result<()> {
        let placeholders = path_placeholders(&self.path);

        for token in &placeholders {
            let claimed = self
                .params_with_origin(ParamOrigin::Path)
                .any(|p| p.matches_placeholder(token));
            if !claimed {
                return Err(Error::configuration(format!(
                    "path template `{}` has placeholder `{{{token}}}` with no matching path parameter",
                    self.path
                )));
            }
        }

        for param in self.params_with_origin(ParamOrigin::Path) {
            let matched = placeholders.iter().any(|t| param.matches_placeholder(t));
            if !matched {
                return Err(Error::configuration(format!(
                    "path parameter `{}` does not match any placeholder in `{}`",
                    param.name, self.path
                )));
            }
        }

        let merged = self
            .params
            .iter()
            .filter(|p| {
                matches!(
                    p.resolved_origin(&self.method),
                    ParamOrigin::Body | ParamOrigin::Form
                ) && !p.embed
            })
            .count();
        if merged > 1 {
            return Err(Error::configuration(format!(
                "route `{}` declares {merged} non-embedded body/form parameters; merging them is ambiguous",
                self.path
            )));
        }

        for param in &self.params {
            if param.media_type.is_some()
                && !matches!(
                    param.resolved_origin(&self.method),
                    ParamOrigin::Body | ParamOrigin::Form | ParamOrigin::File
                )
            {
                return Err(Error::configuration(format!(
                    "parameter `{}` sets a media type but its origin `{}` cannot carry one",
                    param.name,
                    param.resolved_origin(&self.method)
                )));
            }
        }

        Ok(())
    }
}
