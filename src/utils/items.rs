// ABOUTME: Item payload normalization applied before query resolution
// ABOUTME: Replaces empty-string fields with nulls when the node option asks for it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::models::Item;
use serde_json::Value;

/// Replace top-level `""` fields with `null` in every item when `replace` is set.
///
/// Nested objects are left untouched. Returns the items unchanged otherwise.
#[must_use]
pub fn replace_empty_strings_by_nulls(items: Vec<Item>, replace: bool) -> Vec<Item> {
    if !replace {
        return items;
    }

    items
        .into_iter()
        .map(|mut item| {
            for value in item.json.values_mut() {
                if matches!(value, Value::String(text) if text.is_empty()) {
                    *value = Value::Null;
                }
            }
            item
        })
        .collect()
}
