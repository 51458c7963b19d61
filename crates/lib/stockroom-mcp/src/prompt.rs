//! `POST /prompt`: the text-command adapter.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use stockroom_client::InventoryClient;
use tracing::warn;

use crate::command::{CommandError, parse_command, run_command};

pub const PROMPT_PATH: &str = "/prompt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct PromptError {
    status: StatusCode,
    message: String,
}

impl PromptError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
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

impl From<CommandError> for PromptError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::EmptyPrompt => Self::bad_request(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for PromptError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse { error: self.message });
        (self.status, payload).into_response()
    }
}

/// Router serving the text-command endpoint against `client`.
pub fn prompt_router(client: InventoryClient) -> Router {
    Router::new()
        .route(PROMPT_PATH, post(handle_prompt))
        .with_state(client)
}

async fn handle_prompt(
    State(client): State<InventoryClient>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<PromptResponse>, PromptError> {
    let Json(request) = payload
        .map_err(|rejection| PromptError::bad_request(format!("Invalid request body: {}", rejection.body_text())))?;
    let command = parse_command(&request.prompt)?;
    let content = run_command(&client, command).await.map_err(|err| {
        warn!(error = %err, "prompt command failed");
        PromptError::internal(err.to_string())
    })?;
    Ok(Json(PromptResponse { content }))
}
