// ABOUTME: Embedded expression support: resolvable extraction, substitution, and item-scoped evaluation
// ABOUTME: Finds {{ ... }} spans in text and evaluates $json paths, $index and JSON literals against an item
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Expressions
//!
//! Templates embed expressions as `{{ ... }}` spans ("resolvables"). Resolution
//! is an explicit two-stage pipeline: [`get_resolvables`] extracts the ordered
//! spans, then [`substitute_resolvables`] evaluates each one and replaces the
//! first remaining occurrence of its exact text.
//!
//! [`evaluate_expression`] is a deliberately small evaluator used by
//! [`crate::context::WorkflowContext`]. It understands:
//!
//! - `$json`, `$json.a.b`, `$json.list[0]`, `$json["some key"]`
//! - `$index` / `$itemIndex`
//! - JSON literals and single-quoted strings
//!
//! A path into data the item does not have is *absent* (`None`), which callers
//! treat differently from an explicit `null`.

use crate::errors::{AppError, AppResult};
use crate::models::Item;
use crate::utils::text::value_to_text;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Get compiled resolvable regex (cached)
fn resolvable_regex() -> Option<&'static Regex> {
    static RESOLVABLE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    RESOLVABLE_REGEX
        .get_or_init(|| Regex::new(r"(?s)\{\{.*?\}\}").ok())
        .as_ref()
}

/// Extract every `{{ ... }}` span from `text`, in order of appearance.
///
/// Spans are matched lazily and may cross line breaks. Repeated spans are
/// returned once per occurrence.
#[must_use]
pub fn get_resolvables(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    resolvable_regex().map_or_else(Vec::new, |regex| {
        regex
            .find_iter(text)
            .map(|found| found.as_str().to_owned())
            .collect()
    })
}

/// Replace each resolvable in `text` with its evaluated value rendered as text.
///
/// Each resolvable replaces the first remaining occurrence of its exact text,
/// so a span appearing twice is evaluated and substituted twice. Absent
/// values render as empty text.
///
/// # Errors
///
/// Returns the first error produced by `evaluate`
pub fn substitute_resolvables<F>(text: &str, mut evaluate: F) -> AppResult<String>
where
    F: FnMut(&str) -> AppResult<Option<Value>>,
{
    let mut resolved = text.to_owned();
    for resolvable in get_resolvables(text) {
        let rendered = evaluate(&resolvable)?
            .as_ref()
            .map_or_else(String::new, value_to_text);
        resolved = resolved.replacen(&resolvable, &rendered, 1);
    }
    Ok(resolved)
}

/// Strip the `{{` / `}}` delimiters and surrounding whitespace
#[must_use]
pub fn expression_body(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed
        .strip_prefix("{{")
        .and_then(|inner| inner.strip_suffix("}}"))
        .unwrap_or(trimmed)
        .trim()
}

/// Evaluate a single expression against one item.
///
/// Paths into missing data evaluate to `None`; a field holding `null` is `Some(Value::Null)`.
///
/// # Errors
///
/// Returns an `ExpressionError` when the expression is not a supported form
pub fn evaluate_expression(
    expression: &str,
    item: &Item,
    item_index: usize,
) -> AppResult<Option<Value>> {
    let body = expression_body(expression);

    match body {
        "$index" | "$itemIndex" => return Ok(Some(Value::from(item_index))),
        "$json" => return Ok(Some(Value::Object(item.json.clone()))),
        _ => {}
    }

    if let Some(path) = body.strip_prefix("$json") {
        let segments = parse_path(path)
            .map_err(|e| e.with_item_index(item_index))?;
        return Ok(lookup(&item.json, &segments));
    }

    if let Some(text) = single_quoted(body) {
        return Ok(Some(Value::String(text.to_owned())));
    }

    serde_json::from_str(body).map(Some).map_err(|_| {
        AppError::expression(format!("Unsupported expression: {body}")).with_item_index(item_index)
    })
}

/// One step of a `$json` path
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

fn parse_path(path: &str) -> AppResult<Vec<PathSegment>> {
    let invalid = || AppError::expression(format!("Invalid $json path: $json{path}"));
    let mut segments = Vec::new();
    let mut rest = path.trim_end();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('.') {
            let end = after.find(['.', '[']).unwrap_or(after.len());
            let key = after[..end].trim();
            if key.is_empty() {
                return Err(invalid());
            }
            segments.push(PathSegment::Key(key.to_owned()));
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']').ok_or_else(invalid)?;
            let inner = after[..end].trim();
            let segment = match quoted(inner) {
                Some(key) => PathSegment::Key(key.to_owned()),
                None => PathSegment::Index(inner.parse().map_err(|_| invalid())?),
            };
            segments.push(segment);
            rest = &after[end + 1..];
        } else {
            return Err(invalid());
        }
    }

    Ok(segments)
}

fn lookup(root: &serde_json::Map<String, Value>, segments: &[PathSegment]) -> Option<Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Value::Object(root.clone()));
    };
    let PathSegment::Key(key) = first else {
        return None;
    };

    let mut current = root.get(key)?;
    for segment in rest {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
            (PathSegment::Index(index), Value::Array(values)) => values.get(*index)?,
            _ => return None,
        };
    }
    Some(current.clone())
}

fn quoted(text: &str) -> Option<&str> {
    single_quoted(text).or_else(|| {
        text.strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
    })
}

fn single_quoted(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }
    text.strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_path_segments() {
        assert_eq!(
            parse_path(".a[0][\"b c\"]").unwrap(),
            vec![
                PathSegment::Key("a".into()),
                PathSegment::Index(0),
                PathSegment::Key("b c".into()),
            ]
        );
        assert!(parse_path(".").is_err());
        assert!(parse_path("[x]").is_err());
        assert!(parse_path("[0").is_err());
    }

    #[test]
    fn test_expression_body() {
        assert_eq!(expression_body("{{ $json.id }}"), "$json.id");
        assert_eq!(expression_body("  $index "), "$index");
    }

    #[test]
    fn test_lookup_through_arrays() {
        let item = Item::new(json!({ "tags": [{ "name": "a" }, { "name": "b" }] }));
        let value = evaluate_expression("{{ $json.tags[1].name }}", &item, 0).unwrap();
        assert_eq!(value, Some(json!("b")));
    }
}
