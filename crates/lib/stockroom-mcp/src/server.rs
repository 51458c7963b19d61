//! MCP server runners for stockroom.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use stockroom_client::InventoryClient;
use tracing::info;

use crate::StockroomMcp;
use crate::prompt::prompt_router;

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
        }
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 4020)))
    }
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    client: InventoryClient,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = StockroomMcp::new(client);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Builds the HTTP router: `/health`, `/prompt` and the MCP service at `/mcp`.
#[must_use]
pub fn adapter_router(client: InventoryClient, config: &McpHttpServerConfig) -> Router {
    let service_client = client.clone();
    let service: StreamableHttpService<StockroomMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(StockroomMcp::new(service_client.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.sse_keep_alive,
                sse_retry: config.sse_retry,
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(prompt_router(client))
        .nest_service("/mcp", service)
}

/// Serves the MCP server using streamable HTTP transport, alongside the
/// text-command endpoint.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    client: InventoryClient,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = adapter_router(client, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("stockroom-mcp listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
