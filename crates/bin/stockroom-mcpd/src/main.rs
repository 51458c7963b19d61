//! Daemon entry point for the stockroom agent adapters.
//!
//! Serves the MCP tools over stdio and/or streamable HTTP (with the
//! text-command endpoint mounted alongside), forwarding to the inventory API.

mod config;

use stockroom_client::InventoryClient;
use stockroom_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AdapterConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();
    let config = AdapterConfig::from_args()?;
    let client = InventoryClient::new(config.api_url.as_str());
    info!(api_url = client.base_url(), "forwarding to inventory API");

    let http_config = McpHttpServerConfig::new(config.mcp_http_addr);
    match (config.enable_stdio, config.mcp_serve) {
        (true, true) => {
            let http_client = client.clone();
            let _http = tokio::spawn(async move {
                if let Err(err) = serve_streamable_http(http_client, http_config).await {
                    error!(error = %err, "streamable HTTP server stopped");
                }
            });
            serve_stdio(client).await
        }
        (true, false) => serve_stdio(client).await,
        _ => serve_streamable_http(client, http_config).await,
    }
}

// stdout belongs to the stdio transport.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
