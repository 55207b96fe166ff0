//! String-case converters and their cross-scope resolution.
//!
//! A case converter is a pure `fn(&str) -> String`. The built-in set is
//! closed: every converter first splits its input into lowercase words at
//! delimiter and case boundaries, so applying one converter to the output of
//! any other lands on the same words, and re-applying a converter to its own
//! output is a fixed point.
//!
//! Conversion applies only at the first nesting level of composite values;
//! deeper field aliasing belongs to serde attributes on the record types.

use wirecall_model::{CaseConverter, CaseMap, RouteDefinition};

/// The identity converter: no conversion.
#[must_use]
pub fn identity(s: &str) -> String {
    s.to_owned()
}

/// Split a string into lowercase words at delimiters (`_`, `-`, whitespace,
/// any other non-alphanumeric run) and camel-style case boundaries.
///
/// An uppercase run followed by a lowercase letter keeps the run as its own
/// word up to the last capital: `HTTPServer` splits into `http`, `server`.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).and_then(|j| chars.get(j)).copied();
        let next = chars.get(i + 1).copied();

        let lower_to_upper =
            c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_numeric());
        let upper_run_end = c.is_uppercase()
            && prev.is_some_and(char::is_uppercase)
            && next.is_some_and(char::is_lowercase);

        if (lower_to_upper || upper_run_end) && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert to `snake_case`.
#[must_use]
pub fn snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert to `camelCase`.
#[must_use]
pub fn camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Convert to `PascalCase`.
#[must_use]
pub fn pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert to `CONSTANT_CASE`.
#[must_use]
pub fn constant_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert to `kebab-case`.
#[must_use]
pub fn kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert to `Header-Case`.
#[must_use]
pub fn header_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join("-")
}

/// The converters selected for one call, exactly one per origin.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCases {
    /// Query parameter key converter.
    pub query: CaseConverter,
    /// First-level body and form key converter.
    pub body: CaseConverter,
    /// Cookie name converter.
    pub cookie: CaseConverter,
    /// Header name converter.
    pub header: CaseConverter,
    /// First-level response JSON key converter.
    pub response: CaseConverter,
}

/// Select one converter per origin using strict priority: route override,
/// then group scope, then host scope, then identity.
///
/// This is a priority selection, not a chain. A group slot, when set,
/// replaces the host slot outright for that origin; the host converter is
/// never invoked for it.
#[must_use]
pub fn resolve_cases(
    route: &RouteDefinition,
    group: Option<&CaseMap>,
    host: &CaseMap,
) -> ResolvedCases {
    let pick = |slot: fn(&CaseMap) -> Option<CaseConverter>| {
        slot(&route.cases)
            .or_else(|| group.and_then(slot))
            .or_else(|| slot(host))
            .unwrap_or(identity)
    };

    ResolvedCases {
        query: pick(|m| m.query),
        body: pick(|m| m.body),
        cookie: pick(|m| m.cookie),
        header: pick(|m| m.header),
        response: pick(|m| m.response),
    }
}
