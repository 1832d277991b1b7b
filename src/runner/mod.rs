// ABOUTME: Query runner abstraction that executes an assembled query batch
// ABOUTME: Defines the QueriesRunner trait, a dry-run runner, and the PostgreSQL runner behind a feature flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Query runners
//!
//! A runner receives the batch assembled by the Execute Query operation
//! together with the (normalized) input items and the node options, and
//! returns output items. Connection handling, transactions and batching
//! strategy all live behind this trait.

use crate::config::NodeOptions;
use crate::errors::AppResult;
use crate::models::{Item, QueryWithValues};
use async_trait::async_trait;
use serde_json::{Map, Value};

#[cfg(feature = "postgresql")]
pub mod postgres;

#[cfg(feature = "postgresql")]
pub use postgres::PostgresQueriesRunner;

/// Executes assembled queries
#[async_trait]
pub trait QueriesRunner: Send + Sync {
    /// Run `queries` (one per input item, same order) and return output items
    async fn run_queries(
        &self,
        queries: &[QueryWithValues],
        items: &[Item],
        options: &NodeOptions,
    ) -> AppResult<Vec<Item>>;
}

/// Runner that executes nothing and echoes each assembled query as an output item
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

#[async_trait]
impl QueriesRunner for DryRunRunner {
    async fn run_queries(
        &self,
        queries: &[QueryWithValues],
        _items: &[Item],
        _options: &NodeOptions,
    ) -> AppResult<Vec<Item>> {
        Ok(queries
            .iter()
            .enumerate()
            .map(|(index, query)| {
                let mut json = Map::new();
                json.insert("query".into(), Value::String(query.query.clone()));
                json.insert("values".into(), Value::Array(query.values.clone()));
                Item {
                    json,
                    paired_item: None,
                }
                .paired_with(index)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_dry_run_echoes_queries_in_order() {
        let queries = vec![
            QueryWithValues::new("SELECT $1", vec![json!("a")]),
            QueryWithValues::new("SELECT 2", vec![]),
        ];

        let output = DryRunRunner
            .run_queries(&queries, &[], &NodeOptions::default())
            .await
            .unwrap();

        assert_eq!(output.len(), 2);
        assert_eq!(output[0].json["query"], json!("SELECT $1"));
        assert_eq!(output[0].json["values"], json!(["a"]));
        assert_eq!(output[1].paired_item.map(|p| p.item), Some(1));
    }
}
