//! Free-form SQL tools.
//!
//! This module implements the `query` and `test_execute` MCP tools. Both pass
//! the caller's SQL to the engine verbatim; read-only and dry-run semantics
//! come from the transaction each statement runs inside, not from inspecting
//! the SQL. Statements are executed unprepared because MySQL does not accept
//! transaction-control statements through the prepared-statement protocol.

use crate::config::Config;
use crate::db;
use crate::error::DbResult;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a dry-run execution.
///
/// A rejected statement is not an error at the call level: reporting *why*
/// the statement would fail is the tool's purpose.
#[derive(Debug)]
pub enum DryRunOutcome {
    /// The statement executed; its effects were rolled back.
    Executable,
    /// The engine rejected the statement.
    Rejected { reason: String },
}

/// Handler for the free-form SQL tools.
pub struct QueryToolHandler {
    config: Arc<Config>,
}

async fn run_read_only_query(
    conn: &mut sqlx::mysql::MySqlConnection,
    sql: &str,
) -> DbResult<String> {
    sqlx::raw_sql("START TRANSACTION READ ONLY")
        .execute(&mut *conn)
        .await?;
    let rows = sqlx::raw_sql(sql).fetch_all(&mut *conn).await?;
    info!(row_count = rows.len(), "Query executed");
    db::rows_to_text(&rows)
}

async fn run_dry_run(
    conn: &mut sqlx::mysql::MySqlConnection,
    sql: &str,
) -> DbResult<DryRunOutcome> {
    sqlx::raw_sql("START TRANSACTION").execute(&mut *conn).await?;
    let executed = sqlx::raw_sql(sql).execute(&mut *conn).await;

    // The rollback runs whether the statement succeeded or not
    if let Err(e) = sqlx::raw_sql("ROLLBACK").execute(&mut *conn).await {
        warn!(error = %e, "Rollback failed after dry run");
    }

    Ok(match executed {
        Ok(_) => {
            info!("Dry run succeeded, changes rolled back");
            DryRunOutcome::Executable
        }
        Err(e) => {
            let reason = crate::error::DbError::from(e).to_string();
            info!(reason = %reason, "Dry run rejected by engine");
            DryRunOutcome::Rejected { reason }
        }
    })
}

impl QueryToolHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Execute a caller-supplied statement inside a read-only transaction and
    /// return the full result set as pretty-printed JSON text.
    ///
    /// No commit or rollback is issued: the transaction ends when the
    /// connection closes, so even statements the engine lets through a
    /// read-only transaction never persist.
    pub async fn query(&self, sql: &str) -> DbResult<String> {
        let mut conn = db::connect(&self.config).await?;
        let result = run_read_only_query(&mut conn, sql).await;
        db::close(conn).await;
        result
    }

    /// Execute a caller-supplied statement inside a transaction that is
    /// always rolled back, reporting whether the engine accepted it.
    pub async fn test_execute(&self, sql: &str) -> DbResult<DryRunOutcome> {
        let mut conn = db::connect(&self.config).await?;
        let result = run_dry_run(&mut conn, sql).await;
        db::close(conn).await;
        result
    }
}
