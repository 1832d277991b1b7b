// ABOUTME: Core data models for query resolution: workflow items, assembled queries, parameter declarations
// ABOUTME: Defines Item, PairedItem, QueryWithValues, QueryOptions and the closed QueryReplacement variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `Item`: one unit of workflow data, addressed by its zero-based index
//! - `QueryWithValues`: a query ready for parameterized execution
//! - `QueryReplacement`: a query parameter declaration, either comma-separated
//!   text, a number, or a pre-built list of values

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Link from an output item back to the input item that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    /// Zero-based index of the input item
    pub item: usize,
}

/// One unit of data flowing through the workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Opaque JSON payload
    #[serde(default)]
    pub json: Map<String, Value>,
    /// Originating input item, set on runner output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<PairedItem>,
}

impl Item {
    /// Build an item from a JSON value; non-object values are wrapped under `data`
    #[must_use]
    pub fn new(json: Value) -> Self {
        let json = match json {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".into(), other);
                map
            }
        };
        Self {
            json,
            paired_item: None,
        }
    }

    /// Attach the originating input index
    #[must_use]
    pub fn paired_with(mut self, item: usize) -> Self {
        self.paired_item = Some(PairedItem { item });
        self
    }
}

/// Execution options attached to every assembled query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Allow the runner to report per-query failures without discarding the batch
    pub partial: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { partial: true }
    }
}

/// A query template resolved for one item together with its positional values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryWithValues {
    /// SQL text with `$N` placeholders
    pub query: String,
    /// Values bound to `$1`, `$2`, ... in order
    pub values: Vec<Value>,
    /// Runner options
    pub options: QueryOptions,
}

impl QueryWithValues {
    /// Assemble a query with the default options
    #[must_use]
    pub fn new(query: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            values,
            options: QueryOptions::default(),
        }
    }
}

/// Per-item query parameter declaration (`options.queryReplacement`)
#[derive(Debug, Clone, PartialEq)]
pub enum QueryReplacement {
    /// Comma-separated text, possibly containing embedded expressions
    Raw(String),
    /// A single number, treated as its string form
    Number(f64),
    /// Pre-built list of values used as-is
    List(Vec<Value>),
}

impl QueryReplacement {
    /// Collapse numbers into their string form; lists are returned unchanged
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Number(number) => Self::Raw(crate::utils::text::format_number(number)),
            other => other,
        }
    }

    /// Whether the declaration supplies nothing (an empty string)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Raw(text) if text.is_empty())
    }
}

/// A query parameter declaration whose JSON kind is not supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedDeclaration(pub Value);

impl TryFrom<Value> for QueryReplacement {
    type Error = UnsupportedDeclaration;

    /// `null` (an expression over a missing or nulled field) counts as no declaration.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Raw(String::new())),
            Value::String(text) => Ok(Self::Raw(text)),
            Value::Number(number) => match number.as_f64() {
                Some(float) => Ok(Self::Number(float)),
                None => Err(UnsupportedDeclaration(Value::Number(number))),
            },
            Value::Array(values) => Ok(Self::List(values)),
            Value::Bool(_) | Value::Object(_) => Err(UnsupportedDeclaration(value)),
        }
    }
}
