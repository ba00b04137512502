//! The MCP-facing service.
//!
//! MySqlService answers the two protocol requests this server handles:
//! listing the tool catalog and invoking one tool. `ServerHandler` is
//! implemented by hand rather than through the tool router macros: every
//! failure category the dispatcher distinguishes — unknown tool, missing
//! parameter, connection failure, statement failure — is reported as
//! error-tagged content, and the protocol call itself always succeeds.

use crate::config::Config;
use crate::error::{DbError, DbResult};
use crate::tools;
use crate::tools::query::{DryRunOutcome, QueryToolHandler};
use crate::tools::schema::SchemaToolHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone)]
pub struct MySqlService {
    /// Connection parameters resolved once at startup
    config: Arc<Config>,
    /// Number of calls currently executing, consulted by the shutdown drain
    in_flight: Arc<AtomicUsize>,
}

/// Counts a call as in flight for as long as it is held.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl MySqlService {
    /// Create a new MySqlService sharing `config` across all calls.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of calls currently executing.
    pub fn in_flight_calls(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Execute one tool call and produce its response envelope.
    ///
    /// Failures become error-tagged content, never protocol faults.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let args = arguments.as_ref();

        match name {
            tools::QUERY => {
                let handler = QueryToolHandler::new(self.config.clone());
                let outcome = match required_str(args, "sql") {
                    Ok(sql) => handler.query(&sql).await,
                    Err(e) => Err(e),
                };
                text_result(outcome)
            }
            tools::TEST_EXECUTE => {
                let handler = QueryToolHandler::new(self.config.clone());
                let outcome = match required_str(args, "sql") {
                    Ok(sql) => handler.test_execute(&sql).await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(DryRunOutcome::Executable) => CallToolResult::success(vec![Content::text(
                        "The update SQL query can be executed.",
                    )]),
                    Ok(DryRunOutcome::Rejected { reason }) => CallToolResult::error(vec![
                        Content::text(format!("Failed to execute SQL. error: {}", reason)),
                    ]),
                    Err(e) => error_result(e),
                }
            }
            tools::LIST_TABLES => {
                let handler = SchemaToolHandler::new(self.config.clone());
                text_result(handler.list_tables().await)
            }
            tools::DESCRIBE_TABLE => {
                let handler = SchemaToolHandler::new(self.config.clone());
                let outcome = match required_str(args, "tableName") {
                    Ok(table_name) => handler.describe_table(&table_name).await,
                    Err(e) => Err(e),
                };
                text_result(outcome)
            }
            _ => CallToolResult::error(vec![Content::text(format!("Unknown tool: {}", name))]),
        }
    }
}

/// Extract a required string parameter from the call arguments.
fn required_str(args: Option<&JsonObject>, key: &str) -> DbResult<String> {
    args.and_then(|map| map.get(key))
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            DbError::invalid_input(format!("required parameter '{}' must be a string", key))
        })
}

fn text_result(outcome: DbResult<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_result(e),
    }
}

fn error_result(error: DbError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(error.to_string())])
}

impl ServerHandler for MySqlService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only MySQL access for AI assistants.\n\
                \n\
                - `query`: run a SELECT inside a read-only transaction\n\
                - `test_execute`: check whether a statement would execute; all effects are rolled back\n\
                - `list_tables`: list tables in the configured database\n\
                - `describe_table`: show column metadata for one table\n\
                \n\
                Each call opens and closes its own connection; nothing a call does persists\n\
                unless the statement itself is accepted outside a transaction, which these\n\
                tools never allow."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: tools::catalog(),
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let _guard = InFlightGuard::enter(self.in_flight.clone());
        Ok(self.dispatch(request.name.as_ref(), request.arguments).await)
    }
}
