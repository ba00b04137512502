//! The `list_tables` and `describe_table` MCP tools.
//!
//! Both run parameterized queries against `information_schema`, binding the
//! configured database name so callers cannot widen the scope.

use crate::config::Config;
use crate::db;
use crate::error::DbResult;
use std::sync::Arc;
use tracing::info;

const LIST_TABLES_SQL: &str =
    "SELECT TABLE_NAME FROM information_schema.TABLES WHERE TABLE_SCHEMA = ?";

const DESCRIBE_TABLE_SQL: &str = "SELECT COLUMN_NAME, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH, \
     IS_NULLABLE, COLUMN_DEFAULT, COLUMN_KEY, EXTRA \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

/// Handler for the introspection tools.
pub struct SchemaToolHandler {
    config: Arc<Config>,
}

async fn run_list_tables(
    conn: &mut sqlx::mysql::MySqlConnection,
    database: Option<&str>,
) -> DbResult<String> {
    let rows = sqlx::query(LIST_TABLES_SQL)
        .bind(database)
        .fetch_all(&mut *conn)
        .await?;
    info!(count = rows.len(), "Listed tables");
    db::rows_to_text(&rows)
}

async fn run_describe_table(
    conn: &mut sqlx::mysql::MySqlConnection,
    database: Option<&str>,
    table_name: &str,
) -> DbResult<String> {
    let rows = sqlx::query(DESCRIBE_TABLE_SQL)
        .bind(database)
        .bind(table_name)
        .fetch_all(&mut *conn)
        .await?;
    info!(table = %table_name, columns = rows.len(), "Described table");
    db::rows_to_text(&rows)
}

impl SchemaToolHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// List the tables in the configured database.
    pub async fn list_tables(&self) -> DbResult<String> {
        let mut conn = db::connect(&self.config).await?;
        let result = run_list_tables(&mut conn, self.config.database.as_deref()).await;
        db::close(conn).await;
        result
    }

    /// Describe the columns of one table in the configured database.
    ///
    /// A nonexistent table yields an empty result set, not an error.
    pub async fn describe_table(&self, table_name: &str) -> DbResult<String> {
        let mut conn = db::connect(&self.config).await?;
        let result =
            run_describe_table(&mut conn, self.config.database.as_deref(), table_name).await;
        db::close(conn).await;
        result
    }
}
