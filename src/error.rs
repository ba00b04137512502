//! Error types for the MySQL MCP Server.
//!
//! One `thiserror` enum covers every failure category the dispatcher
//! distinguishes. All of them are caught at the call boundary and converted
//! into an error-tagged tool response, never a protocol-level fault.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a database error. The SQLSTATE code, when known, is folded
    /// into the message so it reaches the caller.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        let message = message.into();
        Self::Database {
            message: match sql_state {
                Some(code) => format!("{} (SQLSTATE: {})", message, code),
                None => message,
            },
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error for failures with no better category.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Map driver errors into the taxonomy the dispatcher distinguishes: errors
/// the server reported keep their message and SQLSTATE, transport-level
/// failures become connection errors, everything else is internal.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let state = db_err.code().map(|c| c.to_string());
                DbError::database(db_err.message(), state)
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_) => DbError::connection(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DbError::internal(format!("Result decoding failed: {}", err))
            }
            other => DbError::internal(other.to_string()),
        }
    }
}

/// Shorthand for results carrying a [`DbError`].
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = DbError::connection("refused");
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_database_error_includes_sql_state() {
        let err = DbError::database("syntax error", Some("42000".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("syntax error"));
        assert!(msg.contains("SQLSTATE: 42000"));
    }

    #[test]
    fn test_database_error_without_sql_state() {
        let err = DbError::database("table vanished", None);
        assert_eq!(err.to_string(), "Database error: table vanished");
    }

    #[test]
    fn test_invalid_input_display() {
        let err = DbError::invalid_input("required parameter 'sql' must be a string");
        assert!(err.to_string().starts_with("Invalid input:"));
    }
}
