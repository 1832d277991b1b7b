// ABOUTME: Execution context capability surface handed to the Execute Query operation
// ABOUTME: Defines the node descriptor and the ExecutionContext trait for parameters and expression evaluation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Execution context
//!
//! The operation never reaches into ambient host state. Everything it needs
//! from the host arrives through an [`ExecutionContext`]:
//!
//! - `node()`: the node being executed, including its raw parameters
//! - `get_parameter(...)`: a parameter value resolved for one item
//! - `evaluate(...)`: expression evaluation scoped to one item
//! - `replace_items(...)`: swap in normalized input items before resolution
//!
//! [`WorkflowContext`] is an in-memory implementation backed by a
//! [`NodeDescriptor`] and the input items.

pub mod workflow;

pub use workflow::WorkflowContext;

use crate::constants::versions;
use crate::errors::AppResult;
use crate::models::Item;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The node being executed, as configured by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Display name used to attribute errors
    pub name: String,
    /// Node type version; selects version-dependent parameter handling
    #[serde(default = "default_type_version")]
    pub type_version: f64,
    /// Unevaluated node parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

const fn default_type_version() -> f64 {
    versions::DEFAULT_NODE_VERSION
}

impl NodeDescriptor {
    /// Create a node descriptor
    pub fn new(name: impl Into<String>, type_version: f64, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            type_version,
            parameters,
        }
    }

    /// Look up a raw parameter by dotted path (`options.queryReplacement`)
    #[must_use]
    pub fn raw_parameter(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        segments.try_fold(self.parameters.get(first)?, |value, segment| {
            value.as_object()?.get(segment)
        })
    }
}

/// Host capabilities available to an operation while it runs
pub trait ExecutionContext {
    /// The node being executed
    fn node(&self) -> &NodeDescriptor;

    /// Unevaluated node parameters, exactly as configured
    fn raw_node_parameters(&self) -> &Map<String, Value> {
        &self.node().parameters
    }

    /// Parameter `name` (dotted path) resolved for item `item_index`, or `default` when absent
    ///
    /// # Errors
    ///
    /// Returns an error if the item index is out of range or an embedded expression fails
    fn get_parameter(&self, name: &str, item_index: usize, default: Value) -> AppResult<Value>;

    /// Evaluate one expression in the scope of item `item_index`.
    ///
    /// `None` means the expression refers to data that does not exist, which
    /// is distinct from an explicit `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be evaluated
    fn evaluate(&self, expression: &str, item_index: usize) -> AppResult<Option<Value>>;

    /// Make `items` the data that later expressions are evaluated against.
    ///
    /// Hosts whose evaluator reads item data from elsewhere keep the default.
    fn replace_items(&mut self, _items: &[Item]) {}
}
