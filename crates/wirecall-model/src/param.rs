//! Declared parameter descriptors and field-level constraints.

use http::Method;
use mime::Mime;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::origin::ParamOrigin;

/// Field-level constraints checked against the bound argument value.
///
/// Structural validation (shape, nested fields) is delegated to serde; these
/// cover the bounds a declaration can express directly.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Exclusive lower bound for numbers.
    pub gt: Option<f64>,
    /// Inclusive lower bound for numbers.
    pub ge: Option<f64>,
    /// Exclusive upper bound for numbers.
    pub lt: Option<f64>,
    /// Inclusive upper bound for numbers.
    pub le: Option<f64>,
    /// Minimum length for strings.
    pub min_length: Option<usize>,
    /// Maximum length for strings.
    pub max_length: Option<usize>,
    /// Regex pattern strings must match.
    pub pattern: Option<Regex>,
}

impl Constraints {
    /// Check a bound value against these constraints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming `param` on the first violated
    /// constraint.
    pub fn check(&self, param: &str, value: &Value) -> Result<()> {
        if let Some(n) = value.as_f64() {
            if let Some(gt) = self.gt {
                if n <= gt {
                    return Err(Error::validation(
                        param,
                        format!("must be greater than {gt}"),
                    ));
                }
            }
            if let Some(ge) = self.ge {
                if n < ge {
                    return Err(Error::validation(
                        param,
                        format!("must be greater than or equal to {ge}"),
                    ));
                }
            }
            if let Some(lt) = self.lt {
                if n >= lt {
                    return Err(Error::validation(param, format!("must be less than {lt}")));
                }
            }
            if let Some(le) = self.le {
                if n > le {
                    return Err(Error::validation(
                        param,
                        format!("must be less than or equal to {le}"),
                    ));
                }
            }
        }

        if let Some(s) = value.as_str() {
            let chars = s.chars().count();
            if let Some(min) = self.min_length {
                if chars < min {
                    return Err(Error::validation(
                        param,
                        format!("must be at least {min} characters"),
                    ));
                }
            }
            if let Some(max) = self.max_length {
                if chars > max {
                    return Err(Error::validation(
                        param,
                        format!("must be at most {max} characters"),
                    ));
                }
            }
            if let Some(pattern) = &self.pattern {
                if !pattern.is_match(s) {
                    return Err(Error::validation(
                        param,
                        format!("must match pattern `{pattern}`"),
                    ));
                }
            }
        }

        Ok(())
    }

    /// True if no constraint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gt.is_none()
            && self.ge.is_none()
            && self.lt.is_none()
            && self.le.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
    }
}

/// One declared operation parameter.
///
/// Constructed once when the operation is declared and immutable afterwards;
/// owned by the [`RouteDefinition`](crate::RouteDefinition).
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    /// Declared parameter name, used to bind the argument value.
    pub name: String,
    /// Where the value lands in the request, or `None` to resolve the
    /// implicit origin from the HTTP method at declaration time.
    pub origin: Option<ParamOrigin>,
    /// Override name used on the wire. An explicit alias is used verbatim
    /// and suppresses case conversion for this parameter.
    pub alias: Option<String>,
    /// Field-level constraints checked when the argument is bound.
    pub constraints: Constraints,
    /// Media type, meaningful for `Body`, `Form`, and `File` origins only.
    pub media_type: Option<Mime>,
    /// For `Body`/`Form` origins: whether the value is nested under its own
    /// key (`true`) or its top-level fields merge into the payload (`false`).
    pub embed: bool,
    /// Whether the caller must supply a value.
    pub required: bool,
    /// Fallback value for optional parameters.
    pub default: Option<Value>,
}

impl ParamDescriptor {
    fn new(name: impl Into<String>, origin: Option<ParamOrigin>) -> Self {
        Self {
            name: name.into(),
            origin,
            alias: None,
            constraints: Constraints::default(),
            media_type: None,
            embed: true,
            required: true,
            default: None,
        }
    }

    /// A parameter whose origin is resolved from the HTTP method: body for
    /// payload-carrying methods, query otherwise.
    #[must_use]
    pub fn auto(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// A path parameter, substituted into the path template.
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::Path))
    }

    /// A query-string parameter.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::Query))
    }

    /// A JSON body parameter.
    #[must_use]
    pub fn body(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::Body))
    }

    /// An HTTP header parameter.
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::Header))
    }

    /// A cookie parameter.
    #[must_use]
    pub fn cookie(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::Cookie))
    }

    /// A URL-encoded form field.
    #[must_use]
    pub fn form(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::Form))
    }

    /// A raw multipart file part.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, Some(ParamOrigin::File))
    }

    /// Set the wire-name alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set field-level constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the media type (body, form, and file origins).
    #[must_use]
    pub fn with_media_type(mut self, media_type: Mime) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Control body/form embedding. `false` merges the value's top-level
    /// fields into the payload instead of nesting under the parameter key.
    #[must_use]
    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    /// Make the parameter optional with the given default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// The effective origin for a route using `method`.
    #[must_use]
    pub fn resolved_origin(&self, method: &Method) -> ParamOrigin {
        self.origin
            .unwrap_or_else(|| ParamOrigin::implicit_for(method))
    }

    /// The name this parameter answers to in the path template: the declared
    /// name, with the alias accepted as a fallback token.
    #[must_use]
    pub fn matches_placeholder(&self, token: &str) -> bool {
        self.name == token || self.alias.as_deref() == Some(token)
    }
}
