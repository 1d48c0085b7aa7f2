//! MCP server runners for the gospel library.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use gospel_core::services::ConnectionManager;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use surrealdb::Connection;
use tracing::info;

use crate::GospelLibraryMcp;

pub const DEFAULT_HTTP_PORT: u16 = 4020;

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Where and how the streamable HTTP transport listens.
///
/// Stateless mode answers each POST on its own without an MCP session, which
/// suits clients behind load balancers that cannot pin a session.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }

    /// Keep-alive pings only make sense while a session stream stays open.
    const fn keep_alive(&self) -> Option<Duration> {
        if self.stateful_mode { Some(SSE_KEEP_ALIVE) } else { None }
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_HTTP_PORT)))
    }
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio<C: Connection>(
    connections: Arc<ConnectionManager<C>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = GospelLibraryMcp::with_connections(connections);
    let (stdin, stdout) = stdio();
    info!("serving MCP over stdio");
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Serves the MCP server using streamable HTTP transport at `/mcp`, with a
/// plain `/health` route beside it.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http<C>(
    connections: Arc<ConnectionManager<C>>,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    C: Connection + Send + Sync + 'static,
{
    let service_connections = connections.clone();
    let service: StreamableHttpService<GospelLibraryMcp<C>, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(GospelLibraryMcp::with_connections(service_connections.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.keep_alive(),
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        stateful = config.stateful_mode,
        "serving MCP over streamable HTTP"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_config_binds_loopback() {
        let config = McpHttpServerConfig::default();
        assert_eq!(config.addr.to_string(), "127.0.0.1:4020");
        assert!(config.stateful_mode);
        assert_eq!(config.keep_alive(), Some(SSE_KEEP_ALIVE));
    }

    #[test]
    fn stateless_mode_drops_keep_alive() {
        let config = McpHttpServerConfig::default().with_stateful_mode(false);
        assert!(!config.stateful_mode);
        assert_eq!(config.keep_alive(), None);
    }
}
