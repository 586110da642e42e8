use super::{bool_or, respond, HandlerResult};
use crate::core::AppState;
use crate::tools::architecture;
use serde_json::Value;
use std::sync::Arc;

pub async fn export_resources_graphml(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(
        architecture::export_resources_graphml(
            &state,
            bool_or(arguments, "include_network", true),
            bool_or(arguments, "include_dependencies", true),
        )
        .await,
    )
}

pub async fn comprehensive_architecture_data(
    state: Arc<AppState>,
    _arguments: &Value,
) -> HandlerResult {
    respond(architecture::get_comprehensive_architecture_data(&state).await)
}

pub async fn resource_utilization_summary(
    state: Arc<AppState>,
    _arguments: &Value,
) -> HandlerResult {
    respond(architecture::get_resource_utilization_summary(&state).await)
}
