//! HTTP inventory API for stockroom.
//!
//! Serves the item snapshot and the buy/restock batch endpoints on top of the
//! inventory control plane.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use stockroom_core::control::{InventoryControlPlane, InventoryError};
use stockroom_store::models::{Item, LineItem};
use surrealdb::Connection;
use tracing::{error, info};

pub const ITEMS_PATH: &str = "/items";

/// Configuration for the inventory HTTP server.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl ApiServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            max_body_bytes: 1024 * 1024,
        }
    }

    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 3005)))
    }
}

/// HTTP inventory server wrapper.
pub struct ApiServer<C: Connection> {
    config: ApiServerConfig,
    state: AppState<C>,
}

impl<C: Connection> ApiServer<C> {
    #[must_use]
    pub const fn new(control: InventoryControlPlane<C>, config: ApiServerConfig) -> Self {
        let state = AppState { control };
        Self { config, state }
    }
}

impl<C> ApiServer<C>
where
    C: Connection + Send + Sync + 'static,
{
    /// Builds the router without binding a listener.
    #[must_use]
    pub fn into_router(self) -> Router {
        build_router(self.state, self.config.max_body_bytes)
    }

    /// Runs the HTTP server until shutdown.
    ///
    /// # Errors
    /// Returns any listener or server error.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let app = self.into_router();

        info!("stockroom-api listening on {addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

struct AppState<C: Connection> {
    control: InventoryControlPlane<C>,
}

impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            control: self.control.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidRequest(_)
            | InventoryError::InsufficientStock { .. }
            | InventoryError::CapacityExceeded { .. } => Self::bad_request(err.to_string()),
            InventoryError::NotFound { .. } => Self::not_found(err.to_string()),
            InventoryError::Store(store_err) => {
                error!(error = %store_err, "inventory store failure");
                Self::internal(store_err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse { error: self.message });
        (self.status, payload).into_response()
    }
}

fn build_router<C>(state: AppState<C>, max_body_bytes: usize) -> Router
where
    C: Connection + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route(
            ITEMS_PATH,
            get(list_items::<C>)
                .post(buy_items::<C>)
                .put(restock_items::<C>),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_items<C>(State(state): State<AppState<C>>) -> Result<Json<Vec<Item>>, ApiError>
where
    C: Connection + Send + Sync + 'static,
{
    let items = state.control.list_items().await?;
    Ok(Json(items))
}

async fn buy_items<C>(
    State(state): State<AppState<C>>,
    payload: Result<Json<Vec<LineItem>>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    C: Connection + Send + Sync + 'static,
{
    let Json(lines) = payload?;
    state.control.buy_items(lines).await?;
    Ok(StatusCode::OK)
}

async fn restock_items<C>(
    State(state): State<AppState<C>>,
    payload: Result<Json<Vec<LineItem>>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
    C: Connection + Send + Sync + 'static,
{
    let Json(lines) = payload?;
    state.control.restock_items(lines).await?;
    Ok(StatusCode::OK)
}
