use super::{opt_str, respond, str_or, HandlerResult};
use crate::core::AppState;
use crate::tools::billing;
use serde_json::Value;
use std::sync::Arc;

pub async fn cost_analysis(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    let params = billing::CostAnalysisParams {
        timeframe: str_or(arguments, "timeframe", "MonthToDate"),
        granularity: str_or(arguments, "granularity", "Daily"),
        group_by: opt_str(arguments, "group_by"),
        start_date: opt_str(arguments, "start_date"),
        end_date: opt_str(arguments, "end_date"),
    };
    respond(billing::get_cost_analysis(&state, params).await)
}

pub async fn budgets(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(billing::get_budgets(&state).await)
}

pub async fn recommendations(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(billing::get_recommendations(&state).await)
}

pub async fn usage_details(state: Arc<AppState>, arguments: &Value) -> HandlerResult {
    respond(
        billing::get_usage_details(
            &state,
            opt_str(arguments, "start_date"),
            opt_str(arguments, "end_date"),
        )
        .await,
    )
}

pub async fn subscription_details(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(billing::get_subscription_details(&state).await)
}

pub async fn price_sheet(state: Arc<AppState>, _arguments: &Value) -> HandlerResult {
    respond(billing::get_price_sheet(&state).await)
}
