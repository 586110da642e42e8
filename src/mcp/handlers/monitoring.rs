use super::{opt_i64, opt_str, required_str, respond, HandlerResult};
use crate::core::AppState;
use crate::tools::monitoring;
use serde_json::Value;
use std::sync::Arc;

pub async fn alerts_overview(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(monitoring::get_alerts_overview(&state).await)
}

pub async fn alert_rules(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(monitoring::get_alert_rules(&state).await)
}

pub async fn alert_details(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let alert_id = required_str(arguments, "alert_id")?;
    respond(monitoring::get_alert_details(&state, &alert_id).await)
}

pub async fn activity_log_analysis(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(monitoring::get_activity_log_analysis(&state, opt_i64(arguments, "hours_back")).await)
}

pub async fn application_insights_data(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(
        monitoring::get_application_insights_data(
            &state,
            opt_str(arguments, "app_insights_id"),
            opt_str(arguments, "timespan"),
        )
        .await,
    )
}

pub async fn resource_health_status(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(monitoring::get_resource_health_status(&state).await)
}

pub async fn log_analytics_data(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(
        monitoring::get_log_analytics_data(
            &state,
            opt_str(arguments, "workspace_id"),
            opt_str(arguments, "query"),
            opt_str(arguments, "timespan"),
        )
        .await,
    )
}

pub async fn azure_advisor_detailed(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(monitoring::get_azure_advisor_detailed(&state).await)
}
