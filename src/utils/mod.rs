// ABOUTME: Utility modules shared by the resolver, the context, and the runners
// ABOUTME: Contains text helpers for comma lists and value rendering, and item normalization
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Item payload normalization
pub mod items;
/// Comma-list splitting and value-to-text rendering
pub mod text;
