use std::borrow::Cow;

use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use stockroom_client::ClientError;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Relays a client failure with the inventory API's message untouched.
pub fn map_client_err(err: ClientError) -> ErrorData {
    mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string())
}
