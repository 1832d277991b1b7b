// ABOUTME: In-memory execution context over a node descriptor and its input items
// ABOUTME: Resolves =-prefixed expression parameters per item using the built-in evaluator
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{ExecutionContext, NodeDescriptor};
use crate::errors::{AppError, AppResult};
use crate::expressions::{evaluate_expression, get_resolvables, substitute_resolvables};
use crate::models::Item;
use serde_json::Value;
use tracing::trace;

/// Execution context holding the node configuration and the items it runs over
///
/// String parameters starting with `=` are expressions. When the remainder is
/// a single `{{ ... }}` span the evaluated value keeps its JSON type (an absent
/// value falls back to the parameter default); otherwise every span is
/// substituted as text.
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    node: NodeDescriptor,
    items: Vec<Item>,
}

impl WorkflowContext {
    /// Create a context for `node` running over `items`
    #[must_use]
    pub const fn new(node: NodeDescriptor, items: Vec<Item>) -> Self {
        Self { node, items }
    }

    /// Input items as received from upstream
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn item(&self, item_index: usize) -> AppResult<&Item> {
        self.items.get(item_index).ok_or_else(|| {
            AppError::invalid_input(format!(
                "Item index {item_index} is out of range for {} input items",
                self.items.len()
            ))
            .with_item_index(item_index)
            .with_node(&self.node.name)
        })
    }

    fn resolve_value(&self, value: Value, item_index: usize, default: Value) -> AppResult<Value> {
        let Value::String(text) = value else {
            return Ok(value);
        };
        let Some(expression) = text.strip_prefix('=') else {
            return Ok(Value::String(text));
        };

        let resolvables = get_resolvables(expression);
        if let [only] = resolvables.as_slice() {
            if only.as_str() == expression.trim() {
                return Ok(self.evaluate(only, item_index)?.unwrap_or(default));
            }
        }

        substitute_resolvables(expression, |resolvable| self.evaluate(resolvable, item_index))
            .map(Value::String)
    }
}

impl ExecutionContext for WorkflowContext {
    fn node(&self) -> &NodeDescriptor {
        &self.node
    }

    fn get_parameter(&self, name: &str, item_index: usize, default: Value) -> AppResult<Value> {
        let value = self
            .node
            .raw_parameter(name)
            .cloned()
            .unwrap_or_else(|| default.clone());
        trace!(parameter = name, item_index, "Resolving node parameter");
        self.resolve_value(value, item_index, default)
    }

    fn evaluate(&self, expression: &str, item_index: usize) -> AppResult<Option<Value>> {
        let item = self.item(item_index)?;
        evaluate_expression(expression, item, item_index).map_err(|e| e.with_node(&self.node.name))
    }

    fn replace_items(&mut self, items: &[Item]) {
        trace!(items = items.len(), "Replacing context items");
        self.items = items.to_vec();
    }
}
