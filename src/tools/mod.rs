//! MCP tools exposed by the server.
//!
//! The capability catalog is a constant table: four operations, each with a
//! stable name, a description, and a declared input schema. The handlers in
//! the submodules implement the per-call connection lifecycle behind them.

pub mod query;
pub mod schema;

pub use query::{DryRunOutcome, QueryToolHandler};
pub use schema::SchemaToolHandler;

use rmcp::model::{JsonObject, Tool};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

pub const QUERY: &str = "query";
pub const TEST_EXECUTE: &str = "test_execute";
pub const LIST_TABLES: &str = "list_tables";
pub const DESCRIBE_TABLE: &str = "describe_table";

/// The static tool catalog.
pub fn catalog() -> Vec<Tool> {
    vec![
        Tool::new(
            QUERY,
            "Executes a read-only SQL query.",
            input_schema(&[("sql", "string")], &["sql"]),
        ),
        Tool::new(
            TEST_EXECUTE,
            "Checks if an SQL query can be executed and rolls back afterward.",
            input_schema(&[("sql", "string")], &["sql"]),
        ),
        Tool::new(
            LIST_TABLES,
            "Retrieves a list of tables in the database.",
            input_schema(&[], &[]),
        ),
        Tool::new(
            DESCRIBE_TABLE,
            "Retrieves column information for a table.",
            input_schema(&[("tableName", "string")], &["tableName"]),
        ),
    ]
}

/// Build a JSON schema object for named string-typed parameters.
fn input_schema(properties: &[(&str, &str)], required: &[&str]) -> Arc<JsonObject> {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    if !properties.is_empty() {
        let mut props = JsonObject::new();
        for (name, ty) in properties {
            props.insert((*name).to_string(), json!({ "type": ty }));
        }
        schema.insert("properties".to_string(), JsonValue::Object(props));
    }
    if !required.is_empty() {
        schema.insert("required".to_string(), json!(required));
    }
    Arc::new(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_tools() {
        let tools = catalog();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, vec![QUERY, TEST_EXECUTE, LIST_TABLES, DESCRIBE_TABLE]);
    }

    #[test]
    fn test_catalog_entries_have_descriptions() {
        for tool in catalog() {
            let description = tool.description.as_deref().unwrap_or_default();
            assert!(!description.is_empty(), "tool {} lacks description", tool.name);
        }
    }

    #[test]
    fn test_sql_tools_require_sql_parameter() {
        for tool in catalog() {
            if tool.name == QUERY || tool.name == TEST_EXECUTE {
                let schema = serde_json::to_value(tool.input_schema.as_ref()).unwrap();
                assert_eq!(schema["type"], "object");
                assert_eq!(schema["properties"]["sql"]["type"], "string");
                assert_eq!(schema["required"][0], "sql");
            }
        }
    }

    #[test]
    fn test_describe_table_requires_table_name() {
        let tools = catalog();
        let tool = tools.iter().find(|t| t.name == DESCRIBE_TABLE).unwrap();
        let schema = serde_json::to_value(tool.input_schema.as_ref()).unwrap();
        assert_eq!(schema["properties"]["tableName"]["type"], "string");
        assert_eq!(schema["required"][0], "tableName");
    }

    #[test]
    fn test_list_tables_takes_no_parameters() {
        let tools = catalog();
        let tool = tools.iter().find(|t| t.name == LIST_TABLES).unwrap();
        let schema = serde_json::to_value(tool.input_schema.as_ref()).unwrap();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("required").is_none());
    }
}
