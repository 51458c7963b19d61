//! Agent adapters for stockroom.
//!
//! This crate exposes the inventory API to agent callers two ways: an MCP
//! tool server built on rmcp, and a text-command endpoint. Both forward to the
//! inventory API through [`InventoryClient`] and relay its responses.

mod helpers;
mod tools;
pub mod command;
pub mod prompt;
pub mod server;

pub use tools::stock::{BuyItemsParams, LineItemParams, RestockItemsParams};

use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use stockroom_client::InventoryClient;

const SERVER_INSTRUCTIONS: &str = r"stockroom exposes a supermarket inventory through MCP tools.

Workflow:
1. Call `list_items` to see every item with its `id`, `name`, `price` (minor currency units),
   current `quantity` and `max_stock`.
2. Call `buy_items` with `items: [{id, quantity}]` to take stock out. The whole batch is rejected
   when any item lacks stock.
3. Call `restock_items` with `items: [{id, quantity}]` to add stock. The whole batch is rejected
   when any item is unknown or would exceed its `max_stock`.

Notes:
- Quantities must be positive.
- A rejected batch changes nothing; the error carries the inventory API's message.
- `health` returns `ok`.";

/// MCP server wrapper around the inventory client and tool routers.
#[derive(Clone)]
pub struct StockroomMcp {
    tool_router: ToolRouter<Self>,
    client: InventoryClient,
}

impl StockroomMcp {
    #[must_use]
    pub fn new(client: InventoryClient) -> Self {
        let tool_router = Self::tool_router_core() + Self::tool_router_stock();
        Self {
            tool_router,
            client,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &InventoryClient {
        &self.client
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl StockroomMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for StockroomMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertises_tools_and_instructions() {
        let server = StockroomMcp::new(InventoryClient::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(
            info.instructions
                .as_deref()
                .is_some_and(|text| text.contains("restock_items"))
        );
        assert_eq!(server.client().base_url(), "http://localhost:3005");
    }
}
