use super::{opt_str, respond, HandlerResult};
use crate::core::AppState;
use crate::tools::metrics;
use serde_json::Value;
use std::sync::Arc;

pub async fn vm_performance_metrics(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(
        metrics::get_vm_performance_metrics(
            &state,
            opt_str(arguments, "vm_resource_id"),
            opt_str(arguments, "timespan"),
        )
        .await,
    )
}

pub async fn storage_performance_metrics(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(
        metrics::get_storage_performance_metrics(
            &state,
            opt_str(arguments, "storage_account_id"),
            opt_str(arguments, "timespan"),
        )
        .await,
    )
}

pub async fn database_performance_metrics(
    state: Arc<AppState>,
    arguments: &Value,
) -> HandlerResult {
    respond(
        metrics::get_database_performance_metrics(
            &state,
            opt_str(arguments, "database_id"),
            opt_str(arguments, "timespan"),
        )
        .await,
    )
}
