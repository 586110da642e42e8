use super::to_pretty;
use crate::azure::ApiFailure;
use crate::core::AppState;
use chrono::{Datelike, Local, NaiveDate};
use serde_json::{json, Value};

#[derive(Debug, Default)]
pub struct CostAnalysisParams {
    pub timeframe: String,
    pub granularity: String,
    pub group_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// First-of-month / today window used when a date range is not supplied.
pub fn month_window(today: NaiveDate) -> (String, String) {
    let start = today.with_day(1).unwrap_or(today);
    (
        start.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    )
}

/// Cost Management query body. `timePeriod` is only attached for the
/// `Custom` timeframe; the service rejects it otherwise.
pub fn build_cost_query(params: &CostAnalysisParams, today: NaiveDate) -> Value {
    let mut query = json!({
        "type": "ActualCost",
        "timeframe": params.timeframe,
        "dataSet": {
            "granularity": params.granularity,
            "aggregation": {
                "totalCost": {
                    "name": "Cost",
                    "function": "Sum"
                }
            }
        }
    });

    if params.timeframe == "Custom" {
        let (default_start, default_end) = month_window(today);
        let start = params.start_date.clone().unwrap_or(default_start);
        let end = params.end_date.clone().unwrap_or(default_end);
        query["timePeriod"] = json!({"from": start, "to": end});
    }

    if let Some(group_by) = &params.group_by {
        query["dataSet"]["grouping"] = json!([{"type": "Dimension", "name": group_by}]);
    }

    query
}

pub async fn get_cost_analysis(
    state: &AppState,
    params: CostAnalysisParams,
) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.CostManagement/query",
        state.config.subscription_id
    );
    let body = build_cost_query(&params, Local::now().date_naive());
    let result = state
        .arm
        .post(&endpoint, &[("api-version", "2023-03-01".to_string())], &body)
        .await?;
    to_pretty(&result)
}

pub async fn get_budgets(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Consumption/budgets",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(&endpoint, &[("api-version", "2023-05-01".to_string())])
        .await?;
    to_pretty(&result)
}

pub async fn get_recommendations(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Advisor/recommendations",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2025-05-01-preview".to_string()),
                ("$top", "10".to_string()),
            ],
        )
        .await?;
    to_pretty(&result)
}

pub async fn get_usage_details(
    state: &AppState,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<String, ApiFailure> {
    let (default_start, default_end) = month_window(Local::now().date_naive());
    let start = start_date.unwrap_or(default_start);
    let end = end_date.unwrap_or(default_end);

    // The usage details feed requires an explicit window filter.
    let filter = format!(
        "properties/usageStart ge '{}' and properties/usageEnd le '{}'",
        start, end
    );
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Consumption/usageDetails",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2024-08-01".to_string()),
                ("$filter", filter),
            ],
        )
        .await?;
    to_pretty(&result)
}

pub async fn get_subscription_details(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!("/subscriptions/{}", state.config.subscription_id);
    let result = state
        .arm
        .get(&endpoint, &[("api-version", "2022-12-01".to_string())])
        .await?;
    to_pretty(&result)
}

pub async fn get_price_sheet(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Consumption/pricesheets/default",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(&endpoint, &[("api-version", "2023-05-01".to_string())])
        .await?;
    to_pretty(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(timeframe: &str) -> CostAnalysisParams {
        CostAnalysisParams {
            timeframe: timeframe.to_string(),
            granularity: "Daily".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn month_window_starts_on_the_first() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let (start, end) = month_window(today);
        assert_eq!(start, "2025-03-01");
        assert_eq!(end, "2025-03-17");
    }

    #[test]
    fn non_custom_timeframe_has_no_time_period() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let query = build_cost_query(&params("MonthToDate"), today);
        assert!(query.get("timePeriod").is_none());
        assert_eq!(query["dataSet"]["aggregation"]["totalCost"]["function"], "Sum");
    }

    #[test]
    fn custom_timeframe_defaults_to_current_month() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let query = build_cost_query(&params("Custom"), today);
        assert_eq!(query["timePeriod"]["from"], "2025-03-01");
        assert_eq!(query["timePeriod"]["to"], "2025-03-17");
    }

    #[test]
    fn explicit_dates_override_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let mut p = params("Custom");
        p.start_date = Some("2025-01-01".to_string());
        p.end_date = Some("2025-01-31".to_string());
        let query = build_cost_query(&p, today);
        assert_eq!(query["timePeriod"]["from"], "2025-01-01");
        assert_eq!(query["timePeriod"]["to"], "2025-01-31");
    }

    #[test]
    fn grouping_is_attached_when_requested() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let mut p = params("MonthToDate");
        p.group_by = Some("ResourceGroup".to_string());
        let query = build_cost_query(&p, today);
        assert_eq!(query["dataSet"]["grouping"][0]["name"], "ResourceGroup");
        assert_eq!(query["dataSet"]["grouping"][0]["type"], "Dimension");
    }
}
