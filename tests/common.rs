// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides node builders, a scripted execution context, and a recording query runner
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `query_resolver`

use async_trait::async_trait;
use query_resolver::{
    config::NodeOptions,
    context::{ExecutionContext, NodeDescriptor, WorkflowContext},
    errors::{AppError, AppResult},
    models::{Item, QueryWithValues},
    runner::QueriesRunner,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Node descriptor named "Postgres" with the given parameters
pub fn node(parameters: Value, type_version: f64) -> NodeDescriptor {
    let parameters = match parameters {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    NodeDescriptor::new("Postgres", type_version, parameters)
}

/// Items from JSON payloads
pub fn items(payloads: Vec<Value>) -> Vec<Item> {
    payloads.into_iter().map(Item::new).collect()
}

/// Workflow context for a node with the given parameters running over `payloads`
pub fn workflow(parameters: Value, type_version: f64, payloads: Vec<Value>) -> WorkflowContext {
    init_test_logging();
    WorkflowContext::new(node(parameters, type_version), items(payloads))
}

/// Context whose evaluator answers from a fixed table and records every call
pub struct ScriptedContext {
    node: NodeDescriptor,
    parameters: HashMap<(String, usize), Value>,
    answers: HashMap<(String, usize), AppResult<Option<Value>>>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedContext {
    pub fn new(raw_parameters: Value) -> Self {
        init_test_logging();
        Self {
            node: node(raw_parameters, 2.5),
            parameters: HashMap::new(),
            answers: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Value returned by `get_parameter(name, item_index, _)`
    pub fn with_parameter(mut self, name: &str, item_index: usize, value: Value) -> Self {
        self.parameters.insert((name.to_owned(), item_index), value);
        self
    }

    /// Result returned by `evaluate(expression, item_index)`
    pub fn with_answer(mut self, expression: &str, item_index: usize, value: Value) -> Self {
        self.answers
            .insert((expression.to_owned(), item_index), Ok(Some(value)));
        self
    }

    /// `evaluate(expression, item_index)` finds no data
    pub fn with_absent(mut self, expression: &str, item_index: usize) -> Self {
        self.answers
            .insert((expression.to_owned(), item_index), Ok(None));
        self
    }

    /// Error returned by `evaluate(expression, item_index)`
    pub fn with_failure(mut self, expression: &str, item_index: usize, error: AppError) -> Self {
        self.answers
            .insert((expression.to_owned(), item_index), Err(error));
        self
    }

    /// Every `(expression, item_index)` passed to `evaluate`, in call order
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ExecutionContext for ScriptedContext {
    fn node(&self) -> &NodeDescriptor {
        &self.node
    }

    fn get_parameter(&self, name: &str, item_index: usize, default: Value) -> AppResult<Value> {
        Ok(self
            .parameters
            .get(&(name.to_owned(), item_index))
            .cloned()
            .unwrap_or(default))
    }

    fn evaluate(&self, expression: &str, item_index: usize) -> AppResult<Option<Value>> {
        self.calls
            .lock()
            .unwrap()
            .push((expression.to_owned(), item_index));
        match self.answers.get(&(expression.to_owned(), item_index)) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(error)) => Err(AppError::new(error.code, error.message.clone())),
            None => Err(AppError::expression(format!(
                "No scripted answer for {expression} at item {item_index}"
            ))),
        }
    }
}

/// Runner that records what it receives and returns a fixed output
#[derive(Default)]
pub struct RecordingRunner {
    pub received: Mutex<Option<(Vec<QueryWithValues>, Vec<Item>, NodeOptions)>>,
    pub output: Vec<Item>,
}

impl RecordingRunner {
    pub fn returning(output: Vec<Item>) -> Self {
        Self {
            received: Mutex::new(None),
            output,
        }
    }

    pub fn queries(&self) -> Vec<QueryWithValues> {
        self.received
            .lock()
            .unwrap()
            .as_ref()
            .map(|(queries, _, _)| queries.clone())
            .unwrap_or_default()
    }

    pub fn items(&self) -> Vec<Item> {
        self.received
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, items, _)| items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueriesRunner for RecordingRunner {
    async fn run_queries(
        &self,
        queries: &[QueryWithValues],
        items: &[Item],
        options: &NodeOptions,
    ) -> AppResult<Vec<Item>> {
        *self.received.lock().unwrap() = Some((queries.to_vec(), items.to_vec(), options.clone()));
        Ok(self.output.clone())
    }
}
