//! Configuration handling for the MySQL MCP Server.
//!
//! Every setting is a CLI flag with an environment-variable fallback, parsed
//! once at startup into an explicit struct.

use clap::Parser;
use std::time::Duration;

pub const DEFAULT_MYSQL_HOST: &str = "localhost";
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 5;

/// Configuration for the MySQL MCP Server.
///
/// Connection parameters are resolved once at startup and passed by reference
/// into the connection factory for every call.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mysql-mcp-server",
    about = "MCP server exposing read-only query and dry-run execution tools for MySQL",
    version,
    author
)]
pub struct Config {
    /// MySQL server host
    #[arg(long, default_value = DEFAULT_MYSQL_HOST, env = "MYSQL_HOST")]
    pub host: String,

    /// MySQL server port
    #[arg(long, default_value_t = DEFAULT_MYSQL_PORT, env = "MYSQL_PORT")]
    pub port: u16,

    /// MySQL user name
    #[arg(long, env = "MYSQL_USER")]
    pub user: Option<String>,

    /// MySQL password (sensitive - never logged)
    #[arg(long, env = "MYSQL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database to connect to. Also the schema targeted by the
    /// introspection tools.
    #[arg(long, env = "MYSQL_DATABASE")]
    pub database: Option<String>,

    /// Seconds to wait for in-flight calls after a shutdown signal
    #[arg(
        long,
        default_value_t = DEFAULT_DRAIN_TIMEOUT_SECS,
        env = "MCP_DRAIN_TIMEOUT"
    )]
    pub drain_timeout: u64,

    /// Default log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// A configuration with every default applied, for tests that never
    /// touch clap.
    pub fn default_config() -> Self {
        Self {
            host: DEFAULT_MYSQL_HOST.to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: None,
            password: None,
            database: None,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT_SECS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Get the drain timeout as a Duration.
    pub fn drain_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.drain_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
