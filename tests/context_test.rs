// ABOUTME: Integration tests for the in-memory workflow execution context
// ABOUTME: Covers raw parameter lookup, =-prefixed expression resolution, and item range checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{node, workflow};
use query_resolver::context::{ExecutionContext, NodeDescriptor};
use query_resolver::errors::ErrorCode;
use query_resolver::models::Item;
use serde_json::{json, Value};

#[test]
fn test_raw_parameter_dotted_lookup() {
    let node = node(
        json!({ "query": "SELECT 1", "options": { "queryReplacement": "={{ $json.id }}" } }),
        2.5,
    );

    assert_eq!(node.raw_parameter("query"), Some(&json!("SELECT 1")));
    assert_eq!(
        node.raw_parameter("options.queryReplacement"),
        Some(&json!("={{ $json.id }}"))
    );
    assert_eq!(node.raw_parameter("options.missing"), None);
    assert_eq!(node.raw_parameter("query.nested"), None);
}

#[test]
fn test_node_descriptor_defaults_when_deserialized() {
    let node: NodeDescriptor = serde_json::from_value(json!({ "name": "Postgres" })).unwrap();

    assert!((node.type_version - 2.5).abs() < f64::EPSILON);
    assert!(node.parameters.is_empty());
}

#[test]
fn test_get_parameter_returns_plain_values_unchanged() {
    let ctx = workflow(
        json!({ "query": "SELECT {{ $json.id }}", "limit": 10 }),
        2.5,
        vec![json!({ "id": 1 })],
    );

    assert_eq!(
        ctx.get_parameter("query", 0, Value::Null).unwrap(),
        json!("SELECT {{ $json.id }}")
    );
    assert_eq!(ctx.get_parameter("limit", 0, Value::Null).unwrap(), json!(10));
    assert_eq!(
        ctx.get_parameter("absent", 0, json!("fallback")).unwrap(),
        json!("fallback")
    );
}

#[test]
fn test_single_resolvable_expression_keeps_type() {
    let ctx = workflow(
        json!({ "ids": "={{ $json.ids }}" }),
        2.5,
        vec![json!({ "ids": [1, 2] }), json!({ "ids": [3] })],
    );

    assert_eq!(ctx.get_parameter("ids", 0, Value::Null).unwrap(), json!([1, 2]));
    assert_eq!(ctx.get_parameter("ids", 1, Value::Null).unwrap(), json!([3]));
}

#[test]
fn test_mixed_expression_resolves_to_text() {
    let ctx = workflow(
        json!({ "label": "=user {{ $json.id }} of {{ $json.total }}" }),
        2.5,
        vec![json!({ "id": 4, "total": 9 })],
    );

    assert_eq!(
        ctx.get_parameter("label", 0, Value::Null).unwrap(),
        json!("user 4 of 9")
    );
}

#[test]
fn test_absent_expression_falls_back_to_default() {
    let ctx = workflow(json!({ "id": "={{ $json.id }}" }), 2.5, vec![json!({ "other": 1 })]);

    assert_eq!(
        ctx.get_parameter("id", 0, json!("fallback")).unwrap(),
        json!("fallback")
    );
}

#[test]
fn test_replaced_items_drive_evaluation() {
    let mut ctx = workflow(json!({ "name": "={{ $json.name }}" }), 2.0, vec![json!({ "name": "" })]);
    assert_eq!(ctx.get_parameter("name", 0, Value::Null).unwrap(), json!(""));

    ctx.replace_items(&[Item::new(json!({ "name": null }))]);

    assert_eq!(ctx.get_parameter("name", 0, json!("fallback")).unwrap(), Value::Null);
    assert_eq!(ctx.evaluate("{{ $json.name }}", 0).unwrap(), Some(Value::Null));
}

#[test]
fn test_expression_for_missing_item_fails() {
    let ctx = workflow(json!({ "id": "={{ $json.id }}" }), 2.5, vec![json!({ "id": 1 })]);

    let error = ctx.get_parameter("id", 3, Value::Null).unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.item_index, Some(3));
    assert_eq!(error.node_name.as_deref(), Some("Postgres"));
}

#[test]
fn test_plain_parameters_do_not_need_items() {
    let ctx = workflow(json!({ "options": { "replaceEmptyStrings": true } }), 2.5, vec![]);

    assert_eq!(
        ctx.get_parameter("options", 0, Value::Null).unwrap(),
        json!({ "replaceEmptyStrings": true })
    );
}

#[test]
fn test_evaluate_errors_carry_node_name() {
    let ctx = workflow(json!({}), 2.5, vec![json!({})]);

    let error = ctx.evaluate("{{ $unknown }}", 0).unwrap_err();

    assert_eq!(error.code, ErrorCode::ExpressionError);
    assert_eq!(error.node_name.as_deref(), Some("Postgres"));
}

#[test]
fn test_raw_node_parameters_are_unevaluated() {
    let ctx = workflow(
        json!({ "options": { "queryReplacement": "={{ $json.id }}" } }),
        2.5,
        vec![json!({ "id": 1 })],
    );

    assert_eq!(
        ctx.raw_node_parameters()["options"]["queryReplacement"],
        json!("={{ $json.id }}")
    );
}
