//! Serving the MCP session over stdin/stdout.
//!
//! JSON-RPC messages arrive on stdin and responses leave on stdout, per the
//! MCP protocol specification. Shutdown is signal-driven: the first SIGINT or
//! SIGTERM stops servicing the transport and drains in-flight calls with a
//! bounded timeout; a second signal forces immediate exit.

use crate::config::Config;
use crate::error::{DbError, DbResult};
use crate::mcp::MySqlService;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};

/// Runs the MCP service over stdin/stdout.
pub struct StdioTransport {
    config: Arc<Config>,
}

impl StdioTransport {
    /// Create a new stdio transport with the given configuration.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> DbResult<()> {
        info!("Serving MCP over stdio");

        let service = MySqlService::new(self.config.clone());
        // Shares the in-flight counter with the served instance
        let monitor = service.clone();

        let running_service = service
            .serve(stdio())
            .await
            .map_err(|e| DbError::internal(format!("stdio transport failed to start: {}", e)))?;

        tokio::select! {
            result = running_service.waiting() => {
                if let Err(e) = result {
                    warn!(error = %e, "Stdio transport failed");
                    return Err(DbError::internal(format!("stdio transport failed: {}", e)));
                }
                info!("Client disconnected, shutting down");
            }
            signal = shutdown_signal() => {
                info!(signal, "Shutdown requested, draining in-flight calls");

                // A repeat signal skips the drain
                tokio::spawn(async {
                    shutdown_signal().await;
                    warn!("Second shutdown signal, exiting immediately");
                    std::process::exit(1);
                });

                drain_in_flight(&monitor, self.config.drain_timeout_duration()).await;

                // The stdin reader can be parked in a blocking read at this
                // point; a plain return would wait on it forever.
                info!("Shutdown complete");
                std::process::exit(0);
            }
        }

        Ok(())
    }
}

/// Wait for outstanding calls to finish, bounded by the configured timeout.
async fn drain_in_flight(service: &MySqlService, timeout: Duration) {
    if service.in_flight_calls() == 0 {
        return;
    }

    info!(
        in_flight = service.in_flight_calls(),
        "Draining in-flight calls"
    );

    let all_done = async {
        while service.in_flight_calls() > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };

    if tokio::time::timeout(timeout, all_done).await.is_err() {
        warn!(
            remaining = service.in_flight_calls(),
            "Drain timed out with calls still in flight"
        );
    }
}

/// Resolves with the signal name once the process receives SIGINT or SIGTERM.
async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    let sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("SIGTERM handler installation failed");

    #[cfg(unix)]
    let terminated = async move {
        let mut sigterm = sigterm;
        sigterm.recv().await
    };

    // SIGTERM does not exist elsewhere; only Ctrl+C can end the wait
    #[cfg(not(unix))]
    let terminated = std::future::pending::<Option<()>>();

    tokio::select! {
        _ = signal::ctrl_c() => "SIGINT",
        _ = terminated => "SIGTERM",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdio_transport_creation() {
        let _transport = StdioTransport::new(Arc::new(Config::default()));
    }

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let service = MySqlService::new(Arc::new(Config::default()));
        // Must not sleep out the full timeout when nothing is in flight
        let start = std::time::Instant::now();
        drain_in_flight(&service, Duration::from_secs(5)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
