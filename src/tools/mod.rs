pub mod architecture;
pub mod billing;
pub mod inventory;
pub mod keyvault;
pub mod metrics;
pub mod monitoring;
pub mod network_security;
pub mod security;

use crate::azure::ApiFailure;
use serde::Serialize;
use serde_json::Value;

/// Every tool returns its payload as pretty-printed JSON text.
pub(crate) fn to_pretty<T: Serialize>(value: &T) -> Result<String, ApiFailure> {
    serde_json::to_string_pretty(value).map_err(|e| ApiFailure::Shaping(e.to_string()))
}

/// Collapse a sub-call into either its payload or its error envelope, for
/// reports that embed partial failures instead of propagating them.
pub(crate) fn result_or_envelope(result: Result<Value, ApiFailure>) -> Value {
    match result {
        Ok(value) => value,
        Err(failure) => failure.to_envelope(),
    }
}

/// Positional string cell from a Resource Graph table row.
pub(crate) fn row_str(row: &Value, index: usize) -> String {
    row.get(index)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// The `data.rows` table of a Resource Graph response.
pub(crate) fn graph_rows(result: &Value) -> Vec<Value> {
    result
        .get("data")
        .and_then(|d| d.get("rows"))
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn value_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn value_str_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}
