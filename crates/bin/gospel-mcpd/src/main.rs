//! Daemon entry point for the gospel library MCP server.
//!
//! Loads configuration from CLI arguments and the environment, prepares the
//! store connection, and serves MCP over stdio and/or streamable HTTP.

mod config;
mod connection;

use std::sync::Arc;

use gospel_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::GospelConfig;
use crate::connection::build_connections;

type DaemonResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> DaemonResult {
    let config = GospelConfig::from_args()?;
    init_tracing(config.debug);

    let connections = Arc::new(build_connections(&config));
    if let Err(err) = connections.init().await {
        warn!(error = %err, "library store not ready; tools will retry on first use");
    }

    let http = McpHttpServerConfig::new(config.mcp_http_addr).with_stateful_mode(config.mcp_stateful);
    match (config.enable_stdio, config.mcp_serve) {
        (true, true) => {
            tokio::select! {
                result = serve_stdio(connections.clone()) => result,
                result = serve_streamable_http(connections, http) => result,
            }
        }
        (true, false) => serve_stdio(connections).await,
        _ => serve_streamable_http(connections, http).await,
    }
}

/// Logs go to stderr so the stdio transport stays clean.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
