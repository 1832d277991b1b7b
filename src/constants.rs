// ABOUTME: Constants for the Execute Query operation and its configuration surface
// ABOUTME: Parameter names, version thresholds, user-facing messages, and environment keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Node parameter names, user-facing messages and environment variable names.

/// Node parameter names read by the operation
pub mod parameters {
    /// SQL template parameter
    pub const QUERY: &str = "query";
    /// Options collection parameter
    pub const OPTIONS: &str = "options";
    /// Query parameter declaration, relative to the options collection
    pub const QUERY_REPLACEMENT: &str = "queryReplacement";
    /// Query parameter declaration, as a dotted path from the node root
    pub const OPTIONS_QUERY_REPLACEMENT: &str = "options.queryReplacement";
}

/// Node versioning
pub mod versions {
    /// From this node version on, evaluated query parameters are split on commas
    pub const BATCHED_QUERY_PARAMETERS: f64 = 2.5;
    /// Version assumed when a node does not declare one
    pub const DEFAULT_NODE_VERSION: f64 = 2.5;
}

/// User-facing messages
pub mod messages {
    /// Raised when `options.queryReplacement` has an unsupported type
    pub const INVALID_QUERY_PARAMETERS: &str =
        "Query Parameters must be a string of comma-separated values or an array of values";
    /// Shown next to the query field
    pub const QUERY_HINT: &str =
        "Consider using query parameters to prevent SQL injection attacks. Add them in the options below";
    /// Placeholder for the query field
    pub const QUERY_PLACEHOLDER: &str =
        "e.g. SELECT id, name FROM product WHERE quantity > $1 AND price <= $2";
    /// Description of the query field
    pub const QUERY_DESCRIPTION: &str = "The SQL query to execute. You can use expressions and $1, $2, $3, etc to refer to the 'Query Parameters' set in options below.";
}

/// Service identity used in structured logs
pub mod service_names {
    /// Default service name
    pub const QUERY_RESOLVER: &str = "query-resolver";
}

/// Database connection defaults
pub mod database {
    /// Default maximum pool size
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    /// Default minimum pool size
    pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;
    /// Default connection acquire timeout in seconds
    pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
}

/// Environment variable names
pub mod env_keys {
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Maximum pool size
    pub const POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
    /// Minimum pool size
    pub const POSTGRES_MIN_CONNECTIONS: &str = "POSTGRES_MIN_CONNECTIONS";
    /// Acquire timeout in seconds
    pub const POSTGRES_ACQUIRE_TIMEOUT: &str = "POSTGRES_ACQUIRE_TIMEOUT";
}
