use super::inventory::query_resources;
use super::{graph_rows, row_str, to_pretty};
use crate::azure::ApiFailure;
use crate::core::types::{
    ActivityAnalysis, ActivitySummaryCounters, ActivityTimeRange, InactiveResource,
    ResourceActivity,
};
use crate::core::AppState;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const APP_INSIGHTS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Insights/components'
    | project id, name, resourceGroup, location, instrumentationKey = properties.InstrumentationKey
    | limit 10
    "#;

const LOG_ANALYTICS_WORKSPACES_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.OperationalInsights/workspaces'
    | project id, name, resourceGroup, location, customerId = properties.customerId
    | limit 5
    "#;

const DEFAULT_PERF_QUERY: &str = r#"
    Perf
    | where TimeGenerated > ago(24h)
    | where CounterName in ("% Processor Time", "Available MBytes", "Disk Reads/sec", "Disk Writes/sec")
    | summarize avg(CounterValue) by Computer, CounterName, bin(TimeGenerated, 1h)
    | order by TimeGenerated desc
    "#;

pub async fn get_alerts_overview(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.AlertsManagement/alerts",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2019-05-05-preview".to_string()),
                ("alertState", "New,Acknowledged".to_string()),
            ],
        )
        .await?;
    to_pretty(&result)
}

pub async fn get_alert_rules(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Insights/metricAlerts",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(&endpoint, &[("api-version", "2018-03-01".to_string())])
        .await?;
    to_pretty(&result)
}

/// Security Center alert first; metric alert from Alerts Management as the
/// fallback when the id is not a security alert.
pub async fn get_alert_details(state: &AppState, alert_id: &str) -> Result<String, ApiFailure> {
    let security_endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Security/alerts/{}",
        state.config.subscription_id, alert_id
    );
    if let Ok(alert) = state
        .arm
        .get(&security_endpoint, &[("api-version", "2022-01-01".to_string())])
        .await
    {
        let remediation = alert
            .pointer("/properties/remediationSteps")
            .cloned()
            .unwrap_or_else(|| json!([]));
        return to_pretty(&json!({
            "alert": alert,
            "remediation_steps": remediation,
            "alert_type": "security",
        }));
    }

    let management_endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.AlertsManagement/alerts/{}",
        state.config.subscription_id, alert_id
    );
    let alert = state
        .arm
        .get(
            &management_endpoint,
            &[("api-version", "2019-05-05-preview".to_string())],
        )
        .await?;
    to_pretty(&json!({
        "alert": alert,
        "alert_type": "metric",
    }))
}

/// Per-resource event counts over the window; resources with fewer than 5
/// events are flagged as inactive.
pub fn analyze_activity(
    events: &[Value],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hours_back: i64,
) -> ActivityAnalysis {
    let mut resource_activity: BTreeMap<String, ResourceActivity> = BTreeMap::new();

    for event in events {
        let resource_id = super::value_str(event, "resourceId");
        if resource_id.is_empty() {
            continue;
        }
        let entry = resource_activity.entry(resource_id).or_default();
        entry.event_count += 1;
        entry.last_activity = super::value_str(event, "eventTimestamp");
        entry
            .operations
            .push(super::value_str(event, "operationName"));
    }

    let inactive_resources: Vec<InactiveResource> = resource_activity
        .iter()
        .filter(|(_, activity)| activity.event_count < 5)
        .map(|(resource_id, activity)| InactiveResource {
            resource_id: resource_id.clone(),
            event_count: activity.event_count,
            last_activity: activity.last_activity.clone(),
        })
        .collect();

    ActivityAnalysis {
        time_range: ActivityTimeRange {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
            hours_analyzed: hours_back,
        },
        summary: ActivitySummaryCounters {
            total_events: events.len(),
            unique_resources: resource_activity.len(),
            inactive_resources,
        },
        resource_activity,
    }
}

pub async fn activity_analysis_value(
    state: &AppState,
    hours_back: i64,
) -> Result<Value, ApiFailure> {
    let end = Utc::now();
    let start = end - Duration::hours(hours_back);
    let filter = format!(
        "eventTimestamp ge '{}' and eventTimestamp le '{}'",
        start.format("%Y-%m-%dT%H:%M:%SZ"),
        end.format("%Y-%m-%dT%H:%M:%SZ")
    );
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Insights/eventtypes/management/values",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2015-04-01".to_string()),
                ("$filter", filter),
                (
                    "$select",
                    "eventTimestamp,operationName,resourceId,resourceGroupName,resourceProviderName,status,subStatus,caller"
                        .to_string(),
                ),
            ],
        )
        .await?;

    let events = result.get("value").and_then(|v| v.as_array()).cloned();
    match events {
        Some(events) => {
            let analysis = analyze_activity(&events, start, end, hours_back);
            serde_json::to_value(analysis).map_err(|e| ApiFailure::Shaping(e.to_string()))
        }
        None => Ok(json!({
            "message": "No activity log data found",
            "result": result,
        })),
    }
}

pub async fn get_activity_log_analysis(
    state: &AppState,
    hours_back: Option<i64>,
) -> Result<String, ApiFailure> {
    to_pretty(&activity_analysis_value(state, hours_back.unwrap_or(168)).await?)
}

pub async fn get_application_insights_data(
    state: &AppState,
    app_insights_id: Option<String>,
    timespan: Option<String>,
) -> Result<String, ApiFailure> {
    let timespan = timespan.unwrap_or_else(|| "PT24H".to_string());

    let app_insights_id = match app_insights_id {
        Some(id) => id,
        None => {
            let components = query_resources(state, APP_INSIGHTS_QUERY).await?;
            let rows = graph_rows(&components);
            match rows.first() {
                Some(row) => row_str(row, 0),
                None => {
                    return to_pretty(&json!({"error": "No Application Insights resources found"}))
                }
            }
        }
    };

    let endpoint = format!("{}/providers/Microsoft.Insights/metrics", app_insights_id);
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2018-01-01".to_string()),
                (
                    "metricnames",
                    "requests/count,requests/duration,requests/failed,exceptions/count,pageViews/count"
                        .to_string(),
                ),
                ("timespan", timespan),
                ("interval", "PT1H".to_string()),
                ("aggregation", "Count,Average,Total".to_string()),
            ],
        )
        .await?;
    to_pretty(&result)
}

pub async fn get_resource_health_status(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.ResourceHealth/availabilityStatuses",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2020-05-01".to_string()),
                (
                    "$filter",
                    "Properties/AvailabilityState ne 'Available'".to_string(),
                ),
            ],
        )
        .await?;
    to_pretty(&result)
}

pub async fn get_log_analytics_data(
    state: &AppState,
    workspace_id: Option<String>,
    query: Option<String>,
    timespan: Option<String>,
) -> Result<String, ApiFailure> {
    let timespan = timespan.unwrap_or_else(|| "PT24H".to_string());

    let workspace_id = match workspace_id {
        Some(id) => id,
        None => {
            let workspaces = query_resources(state, LOG_ANALYTICS_WORKSPACES_QUERY).await?;
            let rows = graph_rows(&workspaces);
            match rows.first() {
                Some(row) => row_str(row, 0),
                None => return to_pretty(&json!({"error": "No Log Analytics workspaces found"})),
            }
        }
    };

    let query = query.unwrap_or_else(|| DEFAULT_PERF_QUERY.to_string());
    let endpoint = format!("{}/query", workspace_id);
    let body = json!({"query": query, "timespan": timespan});
    let result = state
        .arm
        .post(&endpoint, &[("api-version", "2020-08-01".to_string())], &body)
        .await?;
    to_pretty(&result)
}

pub async fn advisor_detailed_value(state: &AppState) -> Result<Value, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Advisor/recommendations",
        state.config.subscription_id
    );
    state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2020-01-01".to_string()),
                (
                    "$filter",
                    "Category eq 'Cost' or Category eq 'Performance' or Category eq 'HighAvailability' or Category eq 'Security' or Category eq 'OperationalExcellence'"
                        .to_string(),
                ),
            ],
        )
        .await
}

pub async fn get_azure_advisor_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&advisor_detailed_value(state).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(resource_id: &str, timestamp: &str, operation: &str) -> Value {
        json!({
            "resourceId": resource_id,
            "eventTimestamp": timestamp,
            "operationName": operation,
        })
    }

    #[test]
    fn activity_analysis_counts_per_resource() {
        let events: Vec<Value> = (0..6)
            .map(|i| event("/vm/busy", &format!("2025-03-01T00:0{}:00Z", i), "restart"))
            .chain(std::iter::once(event("/vm/idle", "2025-03-01T09:00:00Z", "read")))
            .collect();
        let start = Utc::now() - Duration::hours(1);
        let end = Utc::now();

        let analysis = analyze_activity(&events, start, end, 1);
        assert_eq!(analysis.summary.total_events, 7);
        assert_eq!(analysis.summary.unique_resources, 2);
        assert_eq!(analysis.resource_activity["/vm/busy"].event_count, 6);
        assert_eq!(analysis.resource_activity["/vm/busy"].last_activity, "2025-03-01T00:05:00Z");
    }

    #[test]
    fn resources_below_five_events_are_inactive() {
        let events = vec![
            event("/vm/idle", "2025-03-01T09:00:00Z", "read"),
            event("/vm/idle", "2025-03-01T10:00:00Z", "read"),
        ];
        let start = Utc::now() - Duration::hours(1);
        let end = Utc::now();

        let analysis = analyze_activity(&events, start, end, 1);
        assert_eq!(analysis.summary.inactive_resources.len(), 1);
        assert_eq!(analysis.summary.inactive_resources[0].resource_id, "/vm/idle");
        assert_eq!(analysis.summary.inactive_resources[0].event_count, 2);
    }

    #[test]
    fn events_without_resource_id_are_ignored() {
        let events = vec![json!({"operationName": "noop"})];
        let start = Utc::now() - Duration::hours(1);
        let end = Utc::now();

        let analysis = analyze_activity(&events, start, end, 1);
        assert_eq!(analysis.summary.total_events, 1);
        assert_eq!(analysis.summary.unique_resources, 0);
    }
}
