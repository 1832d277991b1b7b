// ABOUTME: Unified error handling for query resolution and execution
// ABOUTME: Defines error codes, the AppError type with item attribution, and serializable responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure surfaced by the resolver, the expression evaluator, or a query
//! runner is an [`AppError`]. Errors raised while processing a specific input
//! item carry that item's zero-based index so the host can attribute them.

use crate::constants::messages;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Data is not in the expected shape
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// Query parameter declaration has an unsupported type
    #[serde(rename = "INVALID_QUERY_PARAMETERS")]
    InvalidQueryParameters = 3003,
    /// An embedded expression could not be evaluated
    #[serde(rename = "EXPRESSION_ERROR")]
    ExpressionError = 3004,

    // Configuration (6000-6999)
    /// Configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Configuration present but invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Query execution failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// JSON (de)serialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::InvalidQueryParameters => "The query parameters are invalid",
            Self::ExpressionError => "Expression evaluation failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the crate
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Zero-based index of the input item being processed when the error occurred
    pub item_index: Option<usize>,
    /// Name of the node the error is attributed to
    pub node_name: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            item_index: None,
            node_name: None,
            source: None,
        }
    }

    /// Attribute the error to an input item
    #[must_use]
    pub fn with_item_index(mut self, item_index: usize) -> Self {
        self.item_index = Some(item_index);
        self
    }

    /// Attribute the error to a node
    #[must_use]
    pub fn with_node(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The query parameter declaration is neither a string, a number, nor a list
    #[must_use]
    pub fn invalid_query_parameters(item_index: usize) -> Self {
        Self::new(
            ErrorCode::InvalidQueryParameters,
            messages::INVALID_QUERY_PARAMETERS,
        )
        .with_item_index(item_index)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Expression evaluation failure
    pub fn expression(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExpressionError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)?;
        if let Some(index) = self.item_index {
            write!(f, " (item {index})")?;
        }
        Ok(())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Serializable error report
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Error code
    pub code: ErrorCode,
    /// Error message
    pub message: String,
    /// Offending item index, if any
    #[serde(rename = "itemIndex", skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    /// Node the error is attributed to, if any
    #[serde(rename = "node", skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                item_index: error.item_index,
                node_name: error.node_name,
            },
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}
