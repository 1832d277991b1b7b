// ABOUTME: PostgreSQL implementation of the query runner over an sqlx connection pool
// ABOUTME: Binds positional values, runs each query in item order, and converts rows into output items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! PostgreSQL query runner
//!
//! Executes each assembled query independently, in order, on a shared
//! connection pool. Values are bound positionally; rows come back as items
//! paired with the input item that produced the query.

use super::QueriesRunner;
use crate::config::{DatabaseConfig, NodeOptions};
use crate::errors::{AppError, AppResult};
use crate::logging::QueryLogger;
use crate::models::{Item, QueryWithValues};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{json, Map, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{Column, Decode, PgPool, Postgres, Row, Type, TypeInfo};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// PostgreSQL implementation of [`QueriesRunner`]
#[derive(Clone)]
pub struct PostgresQueriesRunner {
    pool: PgPool,
}

impl PostgresQueriesRunner {
    /// Connect a pool using `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(database = %config, "Connecting query runner pool");
        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .min_connections(config.pool.min_connections)
            .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_one(&self, item_index: usize, query: &QueryWithValues) -> AppResult<Vec<Item>> {
        let started = Instant::now();
        debug!(item_index, query = %query.query, values = query.values.len(), "Executing query");

        let statement = query
            .values
            .iter()
            .fold(sqlx::query(&query.query), bind_value);
        let rows = statement.fetch_all(&self.pool).await.map_err(|e| {
            AppError::database(e.to_string())
                .with_item_index(item_index)
                .with_source(e)
        })?;

        QueryLogger::log_query_executed(
            item_index,
            rows.len(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        if rows.is_empty() {
            let mut json = Map::new();
            json.insert("success".into(), Value::Bool(true));
            return Ok(vec![Item {
                json,
                paired_item: None,
            }
            .paired_with(item_index)]);
        }

        Ok(rows
            .iter()
            .map(|row| {
                Item {
                    json: row_to_json(row),
                    paired_item: None,
                }
                .paired_with(item_index)
            })
            .collect())
    }
}

#[async_trait]
impl QueriesRunner for PostgresQueriesRunner {
    async fn run_queries(
        &self,
        queries: &[QueryWithValues],
        _items: &[Item],
        _options: &NodeOptions,
    ) -> AppResult<Vec<Item>> {
        let mut output = Vec::new();
        for (item_index, query) in queries.iter().enumerate() {
            output.extend(self.run_one(item_index, query).await?);
        }
        Ok(output)
    }
}

/// Bind one JSON value to the next positional placeholder
fn bind_value<'q>(
    statement: Query<'q, Postgres, PgArguments>,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match value {
        Value::Null => statement.bind(None::<String>),
        Value::Bool(flag) => statement.bind(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => statement.bind(integer),
            None => statement.bind(number.as_f64().unwrap_or_default()),
        },
        Value::String(text) => statement.bind(text.clone()),
        Value::Array(_) | Value::Object(_) => statement.bind(Json(value.clone())),
    }
}

fn row_to_json(row: &PgRow) -> Map<String, Value> {
    row.columns()
        .iter()
        .map(|column| {
            let value = column_value(row, column.ordinal(), column.type_info().name());
            (column.name().to_owned(), value)
        })
        .collect()
}

fn column_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => decode::<bool>(row, index).map_or(Value::Null, Value::Bool),
        "INT2" => decode::<i16>(row, index).map_or(Value::Null, |v| json!(v)),
        "INT4" => decode::<i32>(row, index).map_or(Value::Null, |v| json!(v)),
        "INT8" => decode::<i64>(row, index).map_or(Value::Null, |v| json!(v)),
        "FLOAT4" => decode::<f32>(row, index).map_or(Value::Null, |v| json!(v)),
        "FLOAT8" => decode::<f64>(row, index).map_or(Value::Null, |v| json!(v)),
        "JSON" | "JSONB" => decode::<Value>(row, index).unwrap_or(Value::Null),
        "UUID" => decode::<Uuid>(row, index).map_or(Value::Null, |v| json!(v.to_string())),
        "TIMESTAMPTZ" => {
            decode::<DateTime<Utc>>(row, index).map_or(Value::Null, |v| json!(v.to_rfc3339()))
        }
        "TIMESTAMP" => {
            decode::<NaiveDateTime>(row, index).map_or(Value::Null, |v| json!(v.to_string()))
        }
        "DATE" => decode::<NaiveDate>(row, index).map_or(Value::Null, |v| json!(v.to_string())),
        "TIME" => decode::<NaiveTime>(row, index).map_or(Value::Null, |v| json!(v.to_string())),
        _ => match row.try_get::<Option<String>, _>(index) {
            Ok(text) => text.map_or(Value::Null, Value::String),
            Err(e) => {
                warn!(column = index, type_name, error = %e, "Unsupported column type, returning null");
                Value::Null
            }
        },
    }
}

fn decode<T>(row: &PgRow, index: usize) -> Option<T>
where
    T: for<'r> Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(index).ok().flatten()
}
