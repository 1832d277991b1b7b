// ABOUTME: Text helpers for query parameter declarations and expression results
// ABOUTME: Splits comma lists, strips expression markers, and renders JSON values as query text
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde_json::{Number, Value};

/// Split comma-separated text into entries.
///
/// Empty pieces are dropped before trimming, so whitespace-only pieces
/// survive as empty strings: `"a, ,b"` yields `["a", "", "b"]`.
#[must_use]
pub fn split_comma_list(text: &str) -> Vec<String> {
    text.split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.trim().to_owned())
        .collect()
}

/// Strip the leading `=` markers that flag a field as an expression
#[must_use]
pub fn strip_expression_prefix(text: &str) -> &str {
    text.trim_start_matches('=')
}

/// Render a float the way a script host prints numbers (`5`, `2.5`, `-0` as `0`)
#[must_use]
pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        return "NaN".into();
    }
    if number.is_infinite() {
        return if number.is_sign_positive() {
            "Infinity".into()
        } else {
            "-Infinity".into()
        };
    }
    if number == 0.0 {
        return "0".into();
    }
    if number.fract() == 0.0 && number.abs() < 1e21 {
        return format!("{number:.0}");
    }
    number.to_string()
}

/// Render a JSON number as text, keeping integers exact
#[must_use]
pub fn number_to_text(number: &Number) -> String {
    if let Some(integer) = number.as_i64() {
        return integer.to_string();
    }
    if let Some(integer) = number.as_u64() {
        return integer.to_string();
    }
    number.as_f64().map_or_else(String::new, format_number)
}

/// Render an evaluated value for substitution into text.
///
/// Arrays join their elements with commas (null elements render empty),
/// objects render as compact JSON. Comma-split parameter lists keep an
/// evaluated object as a single entry rather than splitting this text.
#[must_use]
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_to_text(number),
        Value::String(text) => text.clone(),
        Value::Array(elements) => elements
            .iter()
            .map(|element| match element {
                Value::Null => String::new(),
                other => value_to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
