// ABOUTME: Database configuration for the PostgreSQL query runner
// ABOUTME: Handles the connection URL and connection pool settings loaded from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{database, env_keys};
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    pub url: String,
    /// `PostgreSQL` connection pool configuration
    pub pool: PostgresPoolConfig,
}

impl DatabaseConfig {
    /// Build a configuration for `url` with default pool settings
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a `PostgreSQL` connection string
    pub fn new(url: impl Into<String>) -> AppResult<Self> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self {
            url,
            pool: PostgresPoolConfig::default(),
        })
    }

    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or invalid
    pub fn from_env() -> AppResult<Self> {
        let url = env::var(env_keys::DATABASE_URL).map_err(|_| {
            AppError::new(
                ErrorCode::ConfigError,
                format!("{} must be set to run queries", env_keys::DATABASE_URL),
            )
        })?;
        validate_url(&url)?;
        Ok(Self {
            url,
            pool: PostgresPoolConfig::from_env(),
        })
    }
}

impl Display for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Never print credentials
        let without_scheme = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        let host = without_scheme
            .rsplit_once('@')
            .map_or(without_scheme, |(_, host)| host);
        write!(f, "postgresql://{host}")
    }
}

fn validate_url(url: &str) -> AppResult<()> {
    if url.starts_with("postgresql://") || url.starts_with("postgres://") {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ConfigInvalid,
            "Database URL must start with postgres:// or postgresql://",
        ))
    }
}

/// `PostgreSQL` connection pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresPoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
}

impl Default for PostgresPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: database::DEFAULT_MAX_CONNECTIONS,
            min_connections: database::DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: database::DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PostgresPoolConfig {
    /// Load `PostgreSQL` pool configuration from environment (or defaults)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_connections: env_var_or(
                env_keys::POSTGRES_MAX_CONNECTIONS,
                database::DEFAULT_MAX_CONNECTIONS,
            ),
            min_connections: env_var_or(
                env_keys::POSTGRES_MIN_CONNECTIONS,
                database::DEFAULT_MIN_CONNECTIONS,
            ),
            acquire_timeout_secs: env_var_or(
                env_keys::POSTGRES_ACQUIRE_TIMEOUT,
                database::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            ),
        }
    }
}

/// Get a parsed environment variable or the default value
fn env_var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
