use super::{respond, HandlerResult};
use crate::core::AppState;
use crate::tools::{keyvault, network_security, security};
use serde_json::Value;
use std::sync::Arc;

pub async fn security_center_alerts(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(security::get_security_center_alerts(&state).await)
}

pub async fn security_assessments(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(security::get_security_assessments(&state).await)
}

pub async fn defender_for_cloud_status(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(security::get_defender_for_cloud_status(&state).await)
}

pub async fn secure_score_and_compliance(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(security::get_secure_score_and_compliance(&state).await)
}

pub async fn security_incidents(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(security::get_security_incidents(&state).await)
}

pub async fn threat_intelligence_indicators(
    state: Arc<AppState>,
    _arguments: &Value,
) -> HandlerResult {
    respond(security::get_threat_intelligence_indicators(&state).await)
}

pub async fn security_recommendations_detailed(
    state: Arc<AppState>,
    _arguments: &Value,
) -> HandlerResult {
    respond(security::get_security_recommendations_detailed(&state).await)
}

pub async fn key_vault_security_status(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(keyvault::get_key_vault_security_status(&state).await)
}

pub async fn network_security_analysis(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(network_security::get_network_security_analysis(&state).await)
}
