// ABOUTME: Configuration management for the Execute Query operation and its query runners
// ABOUTME: Holds per-node options (from node parameters) and database settings (from the environment)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module
//!
//! - **Node options**: the `options` collection configured on the node plus its version
//! - **Database**: connection URL and pool sizing, loaded from environment variables

/// Database connection configuration
pub mod database;
/// Per-node execution options
pub mod node_options;

pub use database::{DatabaseConfig, PostgresPoolConfig};
pub use node_options::NodeOptions;
