// ABOUTME: Per-node execution options read from the node's options collection
// ABOUTME: Carries the node version, empty-string normalization, and quoted-placeholder handling flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{parameters, versions};
use crate::context::ExecutionContext;
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options that shape how queries are assembled and executed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOptions {
    /// Node type version
    #[serde(default = "default_node_version")]
    pub node_version: f64,
    /// Replace `""` item fields with `null` before running
    #[serde(default)]
    pub replace_empty_strings: bool,
    /// Treat `'$N'` in the query as the literal text `$N` rather than a bound parameter
    #[serde(default)]
    pub treat_query_parameters_in_single_quotes_as_text: bool,
    /// Options this crate does not interpret, passed through to the query runner
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const fn default_node_version() -> f64 {
    versions::DEFAULT_NODE_VERSION
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            node_version: versions::DEFAULT_NODE_VERSION,
            replace_empty_strings: false,
            treat_query_parameters_in_single_quotes_as_text: false,
            extra: Map::new(),
        }
    }
}

impl NodeOptions {
    /// Options for a given node version, all flags off
    #[must_use]
    pub fn for_version(node_version: f64) -> Self {
        Self {
            node_version,
            ..Self::default()
        }
    }

    /// Read the `options` collection (resolved for the first item) and the node version
    ///
    /// # Errors
    ///
    /// Returns an error if the options collection is not an object or has invalid field types
    pub fn from_context(ctx: &dyn ExecutionContext) -> AppResult<Self> {
        let raw = ctx.get_parameter(parameters::OPTIONS, 0, Value::Object(Map::new()))?;
        if !raw.is_object() {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                "Node options must be a collection of named values",
            )
            .with_node(&ctx.node().name));
        }

        let mut options: Self = serde_json::from_value(raw).map_err(|e| {
            AppError::new(ErrorCode::ConfigInvalid, format!("Invalid node options: {e}"))
                .with_node(&ctx.node().name)
        })?;
        options.node_version = ctx.node().type_version;
        Ok(options)
    }

    /// Whether evaluated query parameters are split on commas (version 2.5 and later)
    #[must_use]
    pub fn splits_evaluated_parameters(&self) -> bool {
        self.node_version >= versions::BATCHED_QUERY_PARAMETERS
    }
}
