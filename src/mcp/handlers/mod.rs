pub mod architecture;
pub mod billing;
pub mod inventory;
pub mod metrics;
pub mod monitoring;
pub mod security;

use crate::azure::ApiFailure;
use crate::core::types::ErrorResponse;
use crate::mcp::{McpCallResponse, McpContent};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;

pub type HandlerResult = Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)>;

pub(crate) fn opt_str(arguments: &Value, key: &str) -> Option<String> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

pub(crate) fn str_or(arguments: &Value, key: &str, default: &str) -> String {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

pub(crate) fn bool_or(arguments: &Value, key: &str, default: bool) -> bool {
    arguments.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

pub(crate) fn opt_i64(arguments: &Value, key: &str) -> Option<i64> {
    arguments.get(key).and_then(|v| v.as_i64())
}

pub(crate) fn required_str(
    arguments: &Value,
    key: &str,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    opt_str(arguments, key).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Missing required parameter: {}", key),
            }),
        )
    })
}

/// Tool failures are not transport failures: they come back as an
/// `is_error` payload, never as an HTTP error.
pub(crate) fn respond(result: Result<String, ApiFailure>) -> HandlerResult {
    let (text, is_error) = match result {
        Ok(text) => (text, false),
        Err(failure) => {
            let text = serde_json::to_string_pretty(&failure.to_envelope())
                .unwrap_or_else(|_| failure.to_string());
            (text, true)
        }
    };
    Ok(Json(McpCallResponse {
        content: vec![McpContent {
            content_type: "text".to_string(),
            text,
        }],
        is_error,
    }))
}
