//! Response materialization: mapping raw responses to declared result values.

use serde::de::DeserializeOwned;
use serde_json::Value;
use wirecall_model::{Error, Result, ResultKind, RouteDefinition, WireResponse};

use crate::cases::ResolvedCases;
use crate::hooks::JsonFinalizer;

/// Post-response JSON processing shared by the JSON result categories:
/// first-level response keys are case-converted, then the selected JSON
/// finalizer runs over the decoded structure.
pub(crate) fn postprocess_json(
    value: Value,
    cases: &ResolvedCases,
    json_finalizer: Option<&JsonFinalizer>,
) -> Result<Value> {
    let converted = convert_first_level(value, cases);
    match json_finalizer {
        Some(finalize) => finalize(converted),
        None => Ok(converted),
    }
}

/// Case conversion applies only at the first nesting level; deeper aliasing
/// belongs to serde attributes on the record types.
fn convert_first_level(value: Value, cases: &ResolvedCases) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| ((cases.response)(&k), v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Value::Object(
                        map.into_iter()
                            .map(|(k, v)| ((cases.response)(&k), v))
                            .collect(),
                    ),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

/// Decode the response JSON for a JSON-category result, honoring the
/// header-sourcing rule: bodyless methods materialize the untyped-mapping
/// category from response headers instead of the body.
pub(crate) fn decoded_json(
    route: &RouteDefinition,
    response: &WireResponse,
    cases: &ResolvedCases,
    json_finalizer: Option<&JsonFinalizer>,
) -> Result<Value> {
    let raw = if route.result == ResultKind::Json
        && wirecall_model::method_is_bodyless(&route.method)
    {
        response.headers_as_json()
    } else {
        response.json()?
    };
    postprocess_json(raw, cases, json_finalizer)
}

/// Construct one record instance from finalized JSON.
pub(crate) fn decode_record<R: DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value)
        .map_err(|e| Error::validation("response", format!("record validation failed: {e}")))
}

/// Construct one record instance per element of a finalized JSON array.
pub(crate) fn decode_records<R: DeserializeOwned>(value: Value) -> Result<Vec<R>> {
    let Value::Array(items) = value else {
        return Err(Error::validation(
            "response",
            "expected a JSON array of records",
        ));
    };
    items.into_iter().map(decode_record).collect()
}
