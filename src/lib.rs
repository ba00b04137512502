//! MySQL MCP Server Library
//!
//! Four MCP (Model Context Protocol) tools over one MySQL database:
//! read-only queries, dry-run statement checks, and schema introspection,
//! with a fresh connection per call.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::MySqlService;
