use super::handlers::{self, HandlerResult};
use super::prompts::render_prompt;
use crate::core::types::ErrorResponse;
use crate::core::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpResource {
    pub uri: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpResourcesResponse {
    pub resources: Vec<McpResource>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpResourceReadRequest {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpPrompt {
    pub name: String,
    pub description: String,
    pub arguments: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpPromptsResponse {
    pub prompts: Vec<McpPrompt>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpPromptGetRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpPromptResponse {
    pub name: String,
    pub text: String,
}

pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<McpToolsResponse> {
    let tools = state
        .tool_registry
        .tool_specs()
        .into_iter()
        .map(|spec| McpTool {
            name: spec.name,
            title: spec.title,
            description: spec.description,
            input_schema: spec.input_schema,
        })
        .collect();
    Json(McpToolsResponse { tools })
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpCallRequest>,
) -> HandlerResult {
    info!(
        "MCP tool call: {} with args: {:?}",
        request.name, request.arguments
    );
    dispatch_tool(state, &request.name, &request.arguments).await
}

/// Single dispatch point shared by the HTTP transport, the stdio transport,
/// and resource reads.
pub async fn dispatch_tool(state: Arc<AppState>, name: &str, arguments: &Value) -> HandlerResult {
    match name {
        "get_cost_analysis" => handlers::billing::cost_analysis(state, arguments).await,
        "get_budgets" => handlers::billing::budgets(state, arguments).await,
        "get_recommendations" => handlers::billing::recommendations(state, arguments).await,
        "get_usage_details" => handlers::billing::usage_details(state, arguments).await,
        "get_subscription_details" => handlers::billing::subscription_details(state, arguments).await,
        "get_price_sheet" => handlers::billing::price_sheet(state, arguments).await,
        "get_all_resources" => handlers::inventory::all_resources(state, arguments).await,
        "get_network_topology" => handlers::inventory::network_topology(state, arguments).await,
        "get_compute_resources" => handlers::inventory::compute_resources(state, arguments).await,
        "get_storage_resources" => handlers::inventory::storage_resources(state, arguments).await,
        "get_resource_dependencies" => {
            handlers::inventory::resource_dependencies(state, arguments).await
        }
        "get_resource_hierarchy" => handlers::inventory::resource_hierarchy(state, arguments).await,
        "get_network_connections" => {
            handlers::inventory::network_connections(state, arguments).await
        }
        "get_network_security_groups_detailed" => {
            handlers::inventory::network_security_groups_detailed(state, arguments).await
        }
        "get_load_balancers_detailed" => {
            handlers::inventory::load_balancers_detailed(state, arguments).await
        }
        "get_virtual_machines_detailed" => {
            handlers::inventory::virtual_machines_detailed(state, arguments).await
        }
        "get_app_services_detailed" => {
            handlers::inventory::app_services_detailed(state, arguments).await
        }
        "get_databases_detailed" => handlers::inventory::databases_detailed(state, arguments).await,
        "get_storage_accounts_detailed" => {
            handlers::inventory::storage_accounts_detailed(state, arguments).await
        }
        "get_key_vaults_detailed" => {
            handlers::inventory::key_vaults_detailed(state, arguments).await
        }
        "get_monitoring_and_diagnostics" => {
            handlers::inventory::monitoring_and_diagnostics(state, arguments).await
        }
        "get_resource_dependencies_advanced" => {
            handlers::inventory::resource_dependencies_advanced(state, arguments).await
        }
        "get_unused_resources" => handlers::inventory::unused_resources(state, arguments).await,
        "get_resource_detailed_info" => {
            handlers::inventory::resource_detailed_info(state, arguments).await
        }
        "get_resource_group_details" => {
            handlers::inventory::resource_group_details(state, arguments).await
        }
        "get_resource_locks" => handlers::inventory::resource_locks(state, arguments).await,
        "get_rbac_assignments" => handlers::inventory::rbac_assignments(state, arguments).await,
        "get_network_watchers_topology" => {
            handlers::inventory::network_watchers_topology(state, arguments).await
        }
        "get_vm_performance_metrics" => {
            handlers::metrics::vm_performance_metrics(state, arguments).await
        }
        "get_storage_performance_metrics" => {
            handlers::metrics::storage_performance_metrics(state, arguments).await
        }
        "get_database_performance_metrics" => {
            handlers::metrics::database_performance_metrics(state, arguments).await
        }
        "get_alerts_overview" => handlers::monitoring::alerts_overview(state, arguments).await,
        "get_alert_rules" => handlers::monitoring::alert_rules(state, arguments).await,
        "get_alert_details" => handlers::monitoring::alert_details(state, arguments).await,
        "get_activity_log_analysis" => {
            handlers::monitoring::activity_log_analysis(state, arguments).await
        }
        "get_application_insights_data" => {
            handlers::monitoring::application_insights_data(state, arguments).await
        }
        "get_resource_health_status" => {
            handlers::monitoring::resource_health_status(state, arguments).await
        }
        "get_log_analytics_data" => handlers::monitoring::log_analytics_data(state, arguments).await,
        "get_azure_advisor_detailed" => {
            handlers::monitoring::azure_advisor_detailed(state, arguments).await
        }
        "get_security_center_alerts" => {
            handlers::security::security_center_alerts(state, arguments).await
        }
        "get_security_assessments" => {
            handlers::security::security_assessments(state, arguments).await
        }
        "get_defender_for_cloud_status" => {
            handlers::security::defender_for_cloud_status(state, arguments).await
        }
        "get_secure_score_and_compliance" => {
            handlers::security::secure_score_and_compliance(state, arguments).await
        }
        "get_security_incidents" => handlers::security::security_incidents(state, arguments).await,
        "get_threat_intelligence_indicators" => {
            handlers::security::threat_intelligence_indicators(state, arguments).await
        }
        "get_security_recommendations_detailed" => {
            handlers::security::security_recommendations_detailed(state, arguments).await
        }
        "get_key_vault_security_status" => {
            handlers::security::key_vault_security_status(state, arguments).await
        }
        "get_network_security_analysis" => {
            handlers::security::network_security_analysis(state, arguments).await
        }
        "export_resources_graphml" => {
            handlers::architecture::export_resources_graphml(state, arguments).await
        }
        "get_comprehensive_architecture_data" => {
            handlers::architecture::comprehensive_architecture_data(state, arguments).await
        }
        "get_resource_utilization_summary" => {
            handlers::architecture::resource_utilization_summary(state, arguments).await
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unknown tool: {}", name),
            }),
        )),
    }
}

pub async fn list_resources(State(state): State<Arc<AppState>>) -> Json<McpResourcesResponse> {
    let resources = state
        .tool_registry
        .resource_bindings()
        .into_iter()
        .map(|binding| McpResource {
            uri: binding.uri,
            description: binding.description,
        })
        .collect();
    Json(McpResourcesResponse { resources })
}

pub async fn read_resource(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpResourceReadRequest>,
) -> HandlerResult {
    let Some(binding) = state.tool_registry.resolve_resource(&request.uri).cloned() else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown resource: {}", request.uri),
            }),
        ));
    };
    info!("MCP resource read: {} -> {}", binding.uri, binding.tool);
    dispatch_tool(state, &binding.tool, &binding.arguments).await
}

pub async fn list_prompts(State(state): State<Arc<AppState>>) -> Json<McpPromptsResponse> {
    let prompts = state
        .tool_registry
        .prompt_specs()
        .into_iter()
        .map(|spec| McpPrompt {
            name: spec.name,
            description: spec.description,
            arguments: spec.arguments,
        })
        .collect();
    Json(McpPromptsResponse { prompts })
}

pub async fn get_prompt(
    Json(request): Json<McpPromptGetRequest>,
) -> Result<Json<McpPromptResponse>, (StatusCode, Json<ErrorResponse>)> {
    match render_prompt(&request.name, &request.arguments) {
        Some(text) => Ok(Json(McpPromptResponse {
            name: request.name,
            text,
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown prompt: {}", request.name),
            }),
        )),
    }
}
