// ABOUTME: Job file format consumed by the execute-query binary
// ABOUTME: Bundles a node descriptor with its input items and loads them from JSON on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! A job describes one execution of the node:
//!
//! ```json
//! {
//!   "node": {
//!     "name": "Postgres",
//!     "typeVersion": 2.5,
//!     "parameters": {
//!       "query": "SELECT * FROM users WHERE id = $1",
//!       "options": { "queryReplacement": "={{ $json.id }}" }
//!     }
//!   },
//!   "items": [{ "json": { "id": 1 } }]
//! }
//! ```

use crate::config::NodeOptions;
use crate::context::{NodeDescriptor, WorkflowContext};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::Item;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One node execution: configuration plus input items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryJob {
    /// The configured node
    pub node: NodeDescriptor,
    /// Input items
    #[serde(default)]
    pub items: Vec<Item>,
}

impl QueryJob {
    /// Parse a job from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid job
    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| {
            AppError::new(ErrorCode::InvalidFormat, format!("Invalid job file: {e}")).with_source(e)
        })
    }

    /// Read and parse a job file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid job
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::invalid_input(format!("Cannot read job file {}: {e}", path.display()))
                .with_source(e)
        })?;
        let job = Self::from_json(&text)?;
        debug!(
            path = %path.display(),
            node = %job.node.name,
            items = job.items.len(),
            "Loaded job file"
        );
        Ok(job)
    }

    /// Build the execution context and node options for this job
    ///
    /// # Errors
    ///
    /// Returns an error if the node options are invalid
    pub fn prepare(self) -> AppResult<(WorkflowContext, Vec<Item>, NodeOptions)> {
        let context = WorkflowContext::new(self.node, self.items.clone());
        let options = NodeOptions::from_context(&context)?;
        Ok((context, self.items, options))
    }
}
