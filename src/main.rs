//! MySQL MCP Server - Main entry point.
//!
//! Lets MCP clients query and inspect a MySQL database without persisting
//! changes: reads run in read-only transactions, writes are dry-run only.

use clap::Parser;
use mysql_mcp_server::config::Config;
use mysql_mcp_server::transport::StdioTransport;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging setup. Events go to stderr; stdout is reserved for the MCP
/// message stream. RUST_LOG takes precedence over the configured level.
fn init_tracing(config: &Config) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::new(&config.log_level),
    };

    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry.with(stderr_layer.json()).init();
    } else {
        registry.with(stderr_layer).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(&config);

    info!(
        host = %config.host,
        port = config.port,
        database = config.database.as_deref().unwrap_or("<none>"),
        "Starting MySQL MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let transport = StdioTransport::new(Arc::new(config));
    if let Err(e) = transport.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
