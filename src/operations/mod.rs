// ABOUTME: Database node operations exposed to the workflow host
// ABOUTME: Hosts the Execute Query operation and its user-facing property description
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Property descriptions rendered by the host's node editor
pub mod description;
/// Execute Query: template and parameter resolution per item
pub mod execute_query;

pub use description::{description, NodeProperty};
pub use execute_query::{execute, resolve_item, resolve_queries};
