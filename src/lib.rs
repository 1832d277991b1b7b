// ABOUTME: Main library entry point for the Execute Query database node operation
// ABOUTME: Resolves SQL templates and per-item query parameters, then hands batches to a query runner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Query Resolver
//!
//! Parameter-marshalling glue between a workflow host's expression evaluation
//! and a database query runner. For every input item the Execute Query
//! operation resolves `{{ ... }}` expressions in the SQL template, turns the
//! configured query parameters into an ordered list of values, and emits one
//! parameterized query. The batch is then executed by a [`runner::QueriesRunner`].
//!
//! ## Architecture
//!
//! - **Operations**: the Execute Query resolver and its property description
//! - **Context**: host capabilities (parameters, expression evaluation)
//! - **Expressions**: resolvable extraction and a small item-scoped evaluator
//! - **Runner**: query execution (dry run, `PostgreSQL`)
//! - **Config**: node options and database settings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use query_resolver::config::NodeOptions;
//! use query_resolver::context::{NodeDescriptor, WorkflowContext};
//! use query_resolver::errors::AppResult;
//! use query_resolver::models::Item;
//! use query_resolver::operations;
//! use query_resolver::runner::DryRunRunner;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let parameters = json!({
//!         "query": "SELECT * FROM users WHERE id = $1",
//!         "options": { "queryReplacement": "={{ $json.id }}" }
//!     });
//!     let node = NodeDescriptor::new("Postgres", 2.5, parameters.as_object().cloned().unwrap_or_default());
//!     let items = vec![Item::new(json!({ "id": 7 }))];
//!
//!     let mut context = WorkflowContext::new(node, items.clone());
//!     let options = NodeOptions::from_context(&context)?;
//!     let output = operations::execute(&mut context, &DryRunRunner, items, &options).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&output)?);
//!     Ok(())
//! }
//! ```

/// Configuration management: node options and database settings
pub mod config;

/// Operation constants: parameter names, versions, messages
pub mod constants;

/// Execution context handed to operations
pub mod context;

/// Unified error handling with error codes and item attribution
pub mod errors;

/// Resolvable extraction and expression evaluation
pub mod expressions;

/// Job file format for the command-line runner
pub mod job;

/// Structured logging configuration
pub mod logging;

/// Core data models
pub mod models;

/// Database node operations
pub mod operations;

/// Query runners
pub mod runner;

/// Shared utilities
pub mod utils;
