//! Database access layer.
//!
//! This module provides the connection factory and result decoding:
//! - One short-lived connection per tool call, built from the startup configuration
//! - Type-aware conversion of result rows to JSON

pub mod types;

pub use types::{RowToJson, rows_to_text};

use crate::config::Config;
use crate::error::{DbError, DbResult};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, warn};

/// Build connection options from the resolved configuration.
///
/// User, password, and database are only applied when configured, matching
/// the driver's own defaults otherwise.
pub fn connect_options(config: &Config) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .charset("utf8mb4");
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(database) = &config.database {
        options = options.database(database);
    }
    options
}

/// Open a fresh connection for a single call.
///
/// No retry, no pooling: a failed attempt becomes an error for that call only.
pub async fn connect(config: &Config) -> DbResult<MySqlConnection> {
    let conn = connect_options(config)
        .connect()
        .await
        .map_err(|e| DbError::connection(format!("Failed to connect: {}", e)))?;
    debug!(host = %config.host, port = config.port, "Opened database connection");
    Ok(conn)
}

/// Close a call's connection.
///
/// Runs in the cleanup stage after the call's primary result has been
/// computed. A close failure is logged and never replaces that result.
pub async fn close(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_build() {
        // Full and empty configurations both produce options
        let full = Config {
            host: "db.internal".to_string(),
            port: 3307,
            user: Some("app".to_string()),
            password: Some("secret".to_string()),
            database: Some("sales".to_string()),
            ..Config::default()
        };
        let _ = connect_options(&full);
        let _ = connect_options(&Config::default());
    }

    #[test]
    fn test_connect_failure_is_connection_error() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Config::default()
        };
        let err = tokio_test::block_on(connect(&config)).unwrap_err();
        assert!(matches!(err, DbError::Connection { .. }));
        assert!(err.to_string().contains("Failed to connect"));
    }
}
