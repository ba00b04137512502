//! Integration tests for the call dispatcher.
//!
//! These tests exercise the response envelope without a database: catalog
//! shape, unknown tool handling, missing parameters, and unreachable-server
//! errors all surface as error-tagged content, never protocol faults.

use mysql_mcp_server::config::Config;
use mysql_mcp_server::mcp::MySqlService;
use mysql_mcp_server::tools;
use rmcp::model::{CallToolResult, JsonObject};
use std::sync::Arc;

fn service_with(config: Config) -> MySqlService {
    MySqlService::new(Arc::new(config))
}

/// Configuration pointing at a port nothing listens on.
fn unreachable_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..Config::default()
    }
}

fn args(pairs: &[(&str, serde_json::Value)]) -> JsonObject {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn result_json(result: &CallToolResult) -> serde_json::Value {
    serde_json::to_value(result).expect("CallToolResult serializes")
}

fn result_text(result: &CallToolResult) -> String {
    result_json(result)["content"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

fn is_error(result: &CallToolResult) -> bool {
    result_json(result)["isError"].as_bool().unwrap_or(false)
}

/// Test that the catalog lists exactly the four operations.
#[test]
fn test_catalog_names() {
    let names: Vec<String> = tools::catalog()
        .iter()
        .map(|t| t.name.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["query", "test_execute", "list_tables", "describe_table"]
    );
}

/// Test that an unrecognized operation name yields error content with the
/// exact message format.
#[tokio::test]
async fn test_unknown_tool_reported_as_error_content() {
    let service = service_with(Config::default());
    let result = service.dispatch("drop_everything", None).await;

    assert!(is_error(&result));
    assert_eq!(result_text(&result), "Unknown tool: drop_everything");
}

/// Test that a missing required parameter is reported as error content
/// naming the parameter.
#[tokio::test]
async fn test_query_without_sql_is_error_content() {
    let service = service_with(Config::default());
    let result = service.dispatch("query", None).await;

    assert!(is_error(&result));
    assert!(result_text(&result).contains("'sql'"));
}

/// Test that a non-string required parameter is rejected the same way.
#[tokio::test]
async fn test_describe_table_with_non_string_name_is_error_content() {
    let service = service_with(Config::default());
    let result = service
        .dispatch("describe_table", Some(args(&[("tableName", serde_json::json!(7))])))
        .await;

    assert!(is_error(&result));
    assert!(result_text(&result).contains("'tableName'"));
}

/// Test that a connection failure is an error for that call only, reported
/// as error content.
#[tokio::test]
async fn test_connection_failure_is_error_content() {
    let service = service_with(unreachable_config());
    let result = service
        .dispatch("query", Some(args(&[("sql", serde_json::json!("SELECT 1"))])))
        .await;

    assert!(is_error(&result));
    assert!(!result_text(&result).is_empty());
}

/// Test that test_execute against an unreachable server fails at the
/// connection stage, not with the dry-run rejection message.
#[tokio::test]
async fn test_test_execute_connection_failure() {
    let service = service_with(unreachable_config());
    let result = service
        .dispatch(
            "test_execute",
            Some(args(&[("sql", serde_json::json!("DELETE FROM t"))])),
        )
        .await;

    assert!(is_error(&result));
    assert!(!result_text(&result).starts_with("Failed to execute SQL."));
}

/// Test that list_tables needs no arguments to dispatch.
#[tokio::test]
async fn test_list_tables_dispatches_without_arguments() {
    let service = service_with(unreachable_config());
    let result = service.dispatch("list_tables", None).await;

    // Reaches the connection stage and fails there, not on argument handling
    assert!(is_error(&result));
    assert!(!result_text(&result).contains("required parameter"));
}
