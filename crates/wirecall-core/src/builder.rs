//! Request descriptor assembly: binding arguments to declared parameters.

use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;
use wirecall_model::{
    Args, CaseConverter, Error, FilePart, ParamDescriptor, ParamOrigin, Result, RouteDefinition,
    path_placeholders,
};

use crate::cases::ResolvedCases;

/// Characters percent-encoded inside a substituted path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Argument values bound to one invocation, keyed by declared parameter name.
///
/// Serializable values are captured eagerly as JSON; file payloads stay raw
/// bytes and never pass through serialization.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<(String, Value)>,
    files: Vec<(String, Bytes)>,
}

impl Arguments {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the value fails to serialize.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Serialize) -> Result<()> {
        let name = name.into();
        let value = serde_json::to_value(value)
            .map_err(|e| Error::validation(&name, format!("failed to serialize: {e}")))?;
        self.values.push((name, value));
        Ok(())
    }

    /// Bind a serializable value, chaining.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the value fails to serialize.
    pub fn with(mut self, name: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Bind a raw file payload.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.files.push((name.into(), content.into()));
        self
    }

    fn take_value(&mut self, name: &str) -> Option<Value> {
        self.values
            .iter()
            .position(|(k, _)| k == name)
            .map(|i| self.values.remove(i).1)
    }

    fn take_file(&mut self, name: &str) -> Option<Bytes> {
        self.files
            .iter()
            .position(|(k, _)| k == name)
            .map(|i| self.files.remove(i).1)
    }
}

/// A scalar rendered for a query/header/cookie/path/form slot: strings keep
/// their content unquoted, composites serialize to compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build the request descriptor for one invocation.
///
/// Binds each declared parameter to its supplied argument (or default),
/// validates constraints, substitutes path placeholders, and distributes
/// values into query/body/form/file/header/cookie slots under case-converted
/// wire names. The preparer chain runs afterwards, in the engine.
///
/// # Errors
///
/// [`Error::Validation`] for a missing required argument, an unknown argument
/// name, a constraint violation, or a non-object value declared to merge into
/// the body. [`Error::Configuration`] when a placeholder survives
/// substitution.
pub fn build_args(
    route: &RouteDefinition,
    cases: &ResolvedCases,
    mut arguments: Arguments,
) -> Result<Args> {
    let mut args = Args::new(route.path.clone());
    let mut content_type: Option<String> = None;

    for param in &route.params {
        let origin = param.resolved_origin(&route.method);

        if origin == ParamOrigin::File {
            let Some(content) = arguments.take_file(&param.name) else {
                if param.required {
                    return Err(Error::validation(&param.name, "missing required file"));
                }
                continue;
            };
            let mut part = FilePart::new(param.alias.clone().unwrap_or_else(|| param.name.clone()), content);
            part.media_type = param.media_type.as_ref().map(ToString::to_string);
            args.files.push(part);
            continue;
        }

        let value = match arguments.take_value(&param.name) {
            Some(value) => value,
            None => match &param.default {
                Some(default) => default.clone(),
                None if param.required => {
                    return Err(Error::validation(&param.name, "missing required argument"));
                }
                None => continue,
            },
        };

        param.constraints.check(&param.name, &value)?;

        if value.is_null() && origin != ParamOrigin::Path {
            // Null stands for "absent": the slot is omitted from the wire.
            continue;
        }

        match origin {
            ParamOrigin::Path => {
                if value.is_null() {
                    return Err(Error::validation(&param.name, "path value must not be null"));
                }
                let rendered =
                    utf8_percent_encode(&render_value(&value), SEGMENT).to_string();
                substitute_placeholder(&mut args.url, param, &rendered);
            }
            ParamOrigin::Query => {
                let key = wire_key(param, cases.query);
                args.query.push((key, render_value(&value)));
            }
            ParamOrigin::Header => {
                let key = wire_key(param, cases.header);
                args.headers.push((key, render_value(&value)));
            }
            ParamOrigin::Cookie => {
                let key = wire_key(param, cases.cookie);
                args.cookies.push((key, render_value(&value)));
            }
            ParamOrigin::Body => {
                let as_form = param
                    .media_type
                    .as_ref()
                    .is_some_and(|m| m.essence_str() == mime::MULTIPART_FORM_DATA.essence_str());
                if as_form {
                    insert_form(&mut args, param, cases, value)?;
                } else {
                    insert_body(&mut args, param, cases, value)?;
                    if let Some(media_type) = &param.media_type {
                        content_type = Some(media_type.to_string());
                    }
                }
            }
            ParamOrigin::Form => {
                insert_form(&mut args, param, cases, value)?;
                if let Some(media_type) = &param.media_type {
                    content_type = Some(media_type.to_string());
                }
            }
            ParamOrigin::File => unreachable!("file origin handled above"),
        }
    }

    if let Some((name, _)) = arguments.values.first() {
        return Err(Error::validation(name, "no parameter with this name is declared"));
    }
    if let Some((name, _)) = arguments.files.first() {
        return Err(Error::validation(name, "no file parameter with this name is declared"));
    }

    let leftover = path_placeholders(&args.url);
    if let Some(token) = leftover.first() {
        return Err(Error::configuration(format!(
            "path placeholder `{{{token}}}` was not resolved in `{}`",
            args.url
        )));
    }

    if let Some(media_type) = content_type {
        if args.header("content-type").is_none() {
            args.push_header("Content-Type", media_type);
        }
    }

    Ok(args)
}

/// The name a parameter takes on the wire: an explicit alias verbatim,
/// otherwise the declared name run through the origin's converter.
fn wire_key(param: &ParamDescriptor, convert: CaseConverter) -> String {
    param
        .alias
        .clone()
        .unwrap_or_else(|| convert(&param.name))
}

fn substitute_placeholder(url: &mut String, param: &ParamDescriptor, rendered: &str) {
    for token in [Some(param.name.as_str()), param.alias.as_deref()]
        .into_iter()
        .flatten()
    {
        let needle = format!("{{{token}}}");
        if url.contains(&needle) {
            *url = url.replace(&needle, rendered);
            return;
        }
    }
}

fn insert_body(
    args: &mut Args,
    param: &ParamDescriptor,
    cases: &ResolvedCases,
    value: Value,
) -> Result<()> {
    let body = args
        .json_body
        .get_or_insert_with(|| Value::Object(serde_json::Map::new()));
    let Some(map) = body.as_object_mut() else {
        return Err(Error::validation(&param.name, "body is no longer an object"));
    };

    if param.embed {
        map.insert(wire_key(param, cases.body), value);
        return Ok(());
    }

    let Value::Object(fields) = value else {
        return Err(Error::validation(
            &param.name,
            "non-embedded body value must be an object",
        ));
    };
    // Case conversion touches first-level keys only.
    for (key, field) in fields {
        if field.is_null() {
            continue;
        }
        map.insert((cases.body)(&key), field);
    }
    Ok(())
}

fn insert_form(
    args: &mut Args,
    param: &ParamDescriptor,
    cases: &ResolvedCases,
    value: Value,
) -> Result<()> {
    if param.embed {
        args.form_body
            .push((wire_key(param, cases.body), render_value(&value)));
        return Ok(());
    }

    let Value::Object(fields) = value else {
        return Err(Error::validation(
            &param.name,
            "non-embedded form value must be an object",
        ));
    };
    for (key, field) in fields {
        if field.is_null() {
            continue;
        }
        args.form_body.push(((cases.body)(&key), render_value(&field)));
    }
    Ok(())
}
