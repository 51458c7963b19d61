use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use stockroom_store::models::LineItem;

use crate::{StockroomMcp, helpers};

/// One line of a buy or restock batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LineItemParams {
    /// Item id as returned by `list_items`.
    pub id: i64,
    /// Units to buy or restock. Must be positive.
    pub quantity: i64,
}

impl From<LineItemParams> for LineItem {
    fn from(params: LineItemParams) -> Self {
        Self::new(params.id, params.quantity)
    }
}

/// Parameters for buying items.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BuyItemsParams {
    /// The items to be bought.
    pub items: Vec<LineItemParams>,
}

/// Parameters for restocking items.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RestockItemsParams {
    /// The items to be restocked.
    pub items: Vec<LineItemParams>,
}

fn to_lines(items: Vec<LineItemParams>) -> Vec<LineItem> {
    items.into_iter().map(LineItem::from).collect()
}

#[tool_router(router = tool_router_stock, vis = "pub")]
impl StockroomMcp {
    #[tool(description = "List all items in the supermarket.")]
    async fn list_items(&self) -> Result<CallToolResult, ErrorData> {
        let items = self
            .client()
            .list_items()
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::text(items)]))
    }

    #[tool(description = "Buy items from the supermarket. The whole batch fails if any item lacks stock.")]
    async fn buy_items(
        &self,
        Parameters(params): Parameters<BuyItemsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let lines = to_lines(params.items);
        let result = self
            .client()
            .buy_items(&lines)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }

    #[tool(description = "Restock items in the supermarket. The whole batch fails if any item would exceed its max stock.")]
    async fn restock_items(
        &self,
        Parameters(params): Parameters<RestockItemsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let lines = to_lines(params.items);
        let result = self
            .client()
            .restock_items(&lines)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }
}
