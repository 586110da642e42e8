use super::{opt_str, respond, HandlerResult};
use crate::core::AppState;
use crate::tools::inventory;
use serde_json::Value;
use std::sync::Arc;

pub async fn all_resources(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(inventory::get_all_resources(&state, opt_str(arguments, "query")).await)
}

pub async fn network_topology(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_network_topology(&state).await)
}

pub async fn compute_resources(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_compute_resources(&state).await)
}

pub async fn storage_resources(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_storage_resources(&state).await)
}

pub async fn resource_dependencies(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_resource_dependencies(&state).await)
}

pub async fn resource_hierarchy(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_resource_hierarchy(&state).await)
}

pub async fn network_connections(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_network_connections(&state).await)
}

pub async fn network_security_groups_detailed(
    state: Arc<AppState>,
    _arguments: &Value,
) -> HandlerResult {
    respond(inventory::get_network_security_groups_detailed(&state).await)
}

pub async fn load_balancers_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_load_balancers_detailed(&state).await)
}

pub async fn virtual_machines_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_virtual_machines_detailed(&state).await)
}

pub async fn app_services_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_app_services_detailed(&state).await)
}

pub async fn databases_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_databases_detailed(&state).await)
}

pub async fn storage_accounts_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_storage_accounts_detailed(&state).await)
}

pub async fn key_vaults_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_key_vaults_detailed(&state).await)
}

pub async fn monitoring_and_diagnostics(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_monitoring_and_diagnostics(&state).await)
}

pub async fn resource_dependencies_advanced(
    state: Arc<AppState>,
    _arguments: &Value,
) -> HandlerResult {
    respond(inventory::get_resource_dependencies_advanced(&state).await)
}

pub async fn unused_resources(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_unused_resources(&state).await)
}

pub async fn resource_detailed_info(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(inventory::get_resource_detailed_info(&state, opt_str(arguments, "resource_id")).await)
}

pub async fn resource_group_details(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_resource_group_details(&state).await)
}

pub async fn resource_locks(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_resource_locks(&state).await)
}

pub async fn rbac_assignments(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_rbac_assignments(&state).await)
}

pub async fn network_watchers_topology(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(inventory::get_network_watchers_topology(&state).await)
}
