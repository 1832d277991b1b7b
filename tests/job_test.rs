// ABOUTME: End-to-end tests for job files run through the Execute Query operation
// ABOUTME: Loads jobs from disk, prepares contexts, and runs them with the dry-run runner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::init_test_logging;
use query_resolver::{
    errors::{ErrorCode, ErrorResponse},
    job::QueryJob,
    models::PairedItem,
    operations,
    runner::DryRunRunner,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const JOB: &str = r#"{
    "node": {
        "name": "Find users",
        "typeVersion": 2.5,
        "parameters": {
            "query": "SELECT * FROM {{ $json.table }} WHERE id = $1 AND note = '$2'",
            "options": {
                "queryReplacement": "={{ $json.id }}",
                "replaceEmptyStrings": true
            }
        }
    },
    "items": [
        { "json": { "table": "users", "id": 1, "note": "" } },
        { "json": { "table": "admins", "id": 2 } }
    ]
}"#;

fn job_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_job_from_path_and_prepare() -> Result<()> {
    init_test_logging();
    let file = job_file(JOB);

    let job = QueryJob::from_path(file.path()).await?;
    assert_eq!(job.node.name, "Find users");
    assert_eq!(job.items.len(), 2);

    let (context, items, options) = job.prepare()?;
    assert_eq!(context.items().len(), 2);
    assert_eq!(items[0].json["note"], json!(""));
    assert!(options.replace_empty_strings);
    assert!(!options.treat_query_parameters_in_single_quotes_as_text);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_job_end_to_end() -> Result<()> {
    init_test_logging();
    let (mut context, items, options) = QueryJob::from_json(JOB)?.prepare()?;

    let output = operations::execute(&mut context, &DryRunRunner, items, &options).await?;

    assert_eq!(output.len(), 2);
    assert_eq!(
        output[0].json["query"],
        json!("SELECT * FROM users WHERE id = $1 AND note = '$2'")
    );
    assert_eq!(output[0].json["values"], json!(["1"]));
    assert_eq!(
        output[1].json["query"],
        json!("SELECT * FROM admins WHERE id = $1 AND note = '$2'")
    );
    assert_eq!(output[1].json["values"], json!(["2"]));
    assert_eq!(output[1].paired_item, Some(PairedItem { item: 1 }));
    Ok(())
}

#[tokio::test]
async fn test_dry_run_binds_null_for_emptied_fields() -> Result<()> {
    init_test_logging();
    let job = QueryJob::from_json(
        r#"{
            "node": {
                "name": "Postgres",
                "typeVersion": 2.0,
                "parameters": {
                    "query": "INSERT INTO t (name, note) VALUES ($1, '{{ $json.note }}')",
                    "options": {
                        "queryReplacement": "={{ $json.name }}",
                        "replaceEmptyStrings": true
                    }
                }
            },
            "items": [{ "json": { "name": "", "note": "" } }]
        }"#,
    )?;
    let (mut context, items, options) = job.prepare()?;

    let output = operations::execute(&mut context, &DryRunRunner, items, &options).await?;

    assert_eq!(output[0].json["values"], json!([null]));
    assert_eq!(
        output[0].json["query"],
        json!("INSERT INTO t (name, note) VALUES ($1, 'null')")
    );
    Ok(())
}

#[tokio::test]
async fn test_job_without_items_runs_nothing() -> Result<()> {
    let job = QueryJob::from_json(r#"{ "node": { "name": "Postgres", "parameters": { "query": "SELECT 1" } } }"#)?;
    let (mut context, items, options) = job.prepare()?;

    let output = operations::execute(&mut context, &DryRunRunner, items, &options).await?;

    assert!(output.is_empty());
    Ok(())
}

#[test]
fn test_invalid_job_json() {
    let error = QueryJob::from_json("{ \"node\": 3 }").unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidFormat);
    assert!(error.message.starts_with("Invalid job file"));
}

#[tokio::test]
async fn test_missing_job_file() {
    let dir = tempfile::tempdir().unwrap();

    let error = QueryJob::from_path(dir.path().join("missing.json"))
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_invalid_declaration_error_response() -> Result<()> {
    let job = QueryJob::from_json(
        r#"{
            "node": {
                "name": "Postgres",
                "parameters": {
                    "query": "SELECT $1",
                    "options": { "queryReplacement": "={{ $json.params }}" }
                }
            },
            "items": [{ "json": { "params": "1" } }, { "json": { "params": { "a": 1 } } }]
        }"#,
    )?;
    let (mut context, items, options) = job.prepare()?;

    let error = operations::execute(&mut context, &DryRunRunner, items, &options)
        .await
        .unwrap_err();
    let response = serde_json::to_value(ErrorResponse::from(error))?;

    assert_eq!(response["error"]["code"], json!("INVALID_QUERY_PARAMETERS"));
    assert_eq!(response["error"]["itemIndex"], json!(1));
    assert_eq!(response["error"]["node"], json!("Postgres"));
    Ok(())
}
