// ABOUTME: Execute Query operation: resolves the SQL template and query parameters for every input item
// ABOUTME: Assembles one parameterized query per item and hands the batch to a query runner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Execute Query
//!
//! For every input item `i` the operation:
//!
//! 1. resolves the `{{ ... }}` spans of the `query` template in the scope of `i`
//! 2. turns `options.queryReplacement` into an ordered list of values
//! 3. optionally rewrites quoted placeholders (`'$1'`) into literal text values
//!
//! The resulting batch is passed to a [`QueriesRunner`] in item order.

use crate::config::NodeOptions;
use crate::constants::parameters;
use crate::context::ExecutionContext;
use crate::errors::{AppError, AppResult};
use crate::expressions::{get_resolvables, substitute_resolvables};
use crate::logging::QueryLogger;
use crate::models::{Item, QueryReplacement, QueryWithValues};
use crate::runner::QueriesRunner;
use crate::utils::items::replace_empty_strings_by_nulls;
use crate::utils::text::{number_to_text, split_comma_list, strip_expression_prefix, value_to_text};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Resolve every item's query and run the batch.
///
/// Items have empty strings replaced by nulls first when
/// `replace_empty_strings` is set. Expressions are then evaluated against the
/// normalized items, and the runner receives them too.
///
/// # Errors
///
/// Returns the first resolution error (attributed to its item) or the
/// runner's error, unchanged
pub async fn execute(
    ctx: &mut dyn ExecutionContext,
    runner: &dyn QueriesRunner,
    items: Vec<Item>,
    node_options: &NodeOptions,
) -> AppResult<Vec<Item>> {
    let items = replace_empty_strings_by_nulls(items, node_options.replace_empty_strings);
    if node_options.replace_empty_strings {
        ctx.replace_items(&items);
    }

    let queries = resolve_queries(ctx, &items, node_options)?;

    QueryLogger::log_batch_resolved(
        &ctx.node().name,
        queries.len(),
        queries.iter().map(|q| q.values.len()).sum(),
    );

    runner.run_queries(&queries, &items, node_options).await
}

/// Assemble one query per item, in item order
///
/// # Errors
///
/// Returns an error if a query parameter declaration has an unsupported type
/// or an embedded expression fails to evaluate
pub fn resolve_queries(
    ctx: &dyn ExecutionContext,
    items: &[Item],
    node_options: &NodeOptions,
) -> AppResult<Vec<QueryWithValues>> {
    (0..items.len())
        .map(|item_index| resolve_item(ctx, item_index, node_options))
        .collect()
}

/// Assemble the query for a single item
///
/// # Errors
///
/// Returns an error if the parameter declaration is invalid or an expression fails
pub fn resolve_item(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    node_options: &NodeOptions,
) -> AppResult<QueryWithValues> {
    let template = match ctx.get_parameter(parameters::QUERY, item_index, empty_string())? {
        Value::String(text) => text,
        other => value_to_text(&other),
    };
    let mut query = substitute_resolvables(&template, |resolvable| {
        ctx.evaluate(resolvable, item_index)
    })?;

    let declaration = ctx.get_parameter(
        parameters::OPTIONS_QUERY_REPLACEMENT,
        item_index,
        empty_string(),
    )?;
    let declaration = QueryReplacement::try_from(declaration)
        .map_err(|_| AppError::invalid_query_parameters(item_index).with_node(&ctx.node().name))?
        .normalize();
    let declared_nothing = declaration.is_empty();

    let mut values = match declaration {
        QueryReplacement::List(values) => values,
        QueryReplacement::Raw(_) | QueryReplacement::Number(_) => {
            resolve_declared_values(ctx, item_index, node_options)?
        }
    };

    if declared_nothing || node_options.treat_query_parameters_in_single_quotes_as_text {
        rewrite_quoted_placeholders(&mut query, &mut values);
    }

    debug!(item_index, values = values.len(), "Resolved query for item");

    Ok(QueryWithValues::new(query, values))
}

const fn empty_string() -> Value {
    Value::String(String::new())
}

/// Values from the unevaluated `options.queryReplacement` text.
///
/// The raw text is the source of truth for spotting embedded expressions,
/// which are then evaluated in the scope of `item_index`.
fn resolve_declared_values(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    node_options: &NodeOptions,
) -> AppResult<Vec<Value>> {
    let Some(raw) = raw_declaration(ctx) else {
        return Ok(Vec::new());
    };
    let stripped = strip_expression_prefix(&raw);

    if node_options.splits_evaluated_parameters() {
        batched_values(ctx, item_index, stripped)
    } else {
        per_entry_values(ctx, item_index, stripped)
    }
}

fn raw_declaration(ctx: &dyn ExecutionContext) -> Option<String> {
    let raw = ctx
        .raw_node_parameters()
        .get(parameters::OPTIONS)?
        .get(parameters::QUERY_REPLACEMENT)?;

    match raw {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number_to_text(number)),
        _ => None,
    }
}

/// Evaluate every resolvable of the whole declaration and split each result on commas.
///
/// Absent results add nothing. Objects are kept whole as one JSON text entry
/// since their rendering contains commas of its own.
fn batched_values(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    declaration: &str,
) -> AppResult<Vec<Value>> {
    let resolvables = get_resolvables(declaration);
    if resolvables.is_empty() {
        return Ok(into_strings(split_comma_list(declaration)));
    }

    let mut values = Vec::new();
    for resolvable in &resolvables {
        match ctx.evaluate(resolvable, item_index)? {
            None => {}
            Some(object @ Value::Object(_)) => values.push(Value::String(object.to_string())),
            Some(evaluated) => {
                values.extend(into_strings(split_comma_list(&value_to_text(&evaluated))));
            }
        }
    }
    Ok(values)
}

/// Split the declaration on commas first, then evaluate resolvables per entry, keeping their type.
///
/// Absent results bind as `null`.
fn per_entry_values(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    declaration: &str,
) -> AppResult<Vec<Value>> {
    let mut values = Vec::new();
    for entry in split_comma_list(declaration) {
        let resolvables = get_resolvables(&entry);
        if resolvables.is_empty() {
            values.push(Value::String(entry));
            continue;
        }
        for resolvable in &resolvables {
            values.push(ctx.evaluate(resolvable, item_index)?.unwrap_or(Value::Null));
        }
    }
    Ok(values)
}

fn into_strings(entries: Vec<String>) -> Vec<Value> {
    entries.into_iter().map(Value::String).collect()
}

/// Get compiled quoted placeholder regex (cached)
fn quoted_placeholder_regex() -> Option<&'static Regex> {
    static QUOTED_PLACEHOLDER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    QUOTED_PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"'\$[0-9]+'").ok())
        .as_ref()
}

/// Replace each `'$N'` with a fresh placeholder numbered after the existing values
/// and bind the unquoted text `$N` to it.
///
/// Collisions with placeholders already referenced by declared values are not checked.
fn rewrite_quoted_placeholders(query: &mut String, values: &mut Vec<Value>) {
    let Some(regex) = quoted_placeholder_regex() else {
        return;
    };
    let literals: Vec<String> = regex
        .find_iter(query)
        .map(|found| found.as_str().to_owned())
        .collect();

    let mut next_value_index = values.len() + 1;
    for literal in literals {
        *query = query.replacen(&literal, &format!("${next_value_index}"), 1);
        values.push(Value::String(literal.replace('\'', "")));
        next_value_index += 1;
    }
}
