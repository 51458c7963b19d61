//! HTTP client for the stockroom inventory API.
//!
//! Both agent adapters go through this client. It relays raw response bodies
//! and turns rejected batches into errors carrying the server's body verbatim.

use std::{error::Error, fmt};

use reqwest::{Method, StatusCode};
use stockroom_store::models::LineItem;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:3005";
const ITEMS_PATH: &str = "/items";

pub const PURCHASE_SUCCESS: &str = "Items purchased successfully";
pub const RESTOCK_SUCCESS: &str = "Items restocked successfully";

#[derive(Debug)]
pub enum ClientError {
    Transport(reqwest::Error),
    Rejected { action: &'static str, body: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Rejected { action, body } => write!(f, "failed to {action} items: {body}"),
        }
    }
}

impl Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

/// Client for `GET/POST/PUT /items`.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl InventoryClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self) -> String {
        format!("{}{ITEMS_PATH}", self.base_url)
    }

    /// Fetches the item list and returns the response body as is.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the request or body read fails.
    pub async fn list_items(&self) -> Result<String, ClientError> {
        let response = self.http.get(self.items_url()).send().await?;
        Ok(response.text().await?)
    }

    /// Submits a buy batch.
    ///
    /// # Errors
    /// Returns `ClientError::Rejected` with the server body for any non-200
    /// status, or `ClientError::Transport` on network failure.
    pub async fn buy_items(&self, lines: &[LineItem]) -> Result<String, ClientError> {
        self.submit(Method::POST, "buy", lines).await?;
        Ok(PURCHASE_SUCCESS.to_string())
    }

    /// Submits a restock batch.
    ///
    /// # Errors
    /// Returns `ClientError::Rejected` with the server body for any non-200
    /// status, or `ClientError::Transport` on network failure.
    pub async fn restock_items(&self, lines: &[LineItem]) -> Result<String, ClientError> {
        self.submit(Method::PUT, "restock", lines).await?;
        Ok(RESTOCK_SUCCESS.to_string())
    }

    async fn submit(
        &self,
        method: Method,
        action: &'static str,
        lines: &[LineItem],
    ) -> Result<(), ClientError> {
        debug!(action, lines = lines.len(), "submitting stock batch");
        let response = self
            .http
            .request(method, self.items_url())
            .json(lines)
            .send()
            .await?;
        if response.status() == StatusCode::OK {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Rejected { action, body })
    }
}

impl Default for InventoryClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = InventoryClient::new("http://127.0.0.1:3005/");
        assert_eq!(client.base_url(), "http://127.0.0.1:3005");
        assert_eq!(client.items_url(), "http://127.0.0.1:3005/items");
    }

    #[test]
    fn rejected_batch_keeps_server_body() {
        let err = ClientError::Rejected {
            action: "restock",
            body: "{\"error\":\"Item not found with id 9\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to restock items: {\"error\":\"Item not found with id 9\"}"
        );
    }
}
