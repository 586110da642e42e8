use super::inventory::{query_resources, query_resources_tenant};
use super::{graph_rows, result_or_envelope, row_str, to_pretty, value_str, value_str_or};
use crate::azure::ApiFailure;
use crate::core::types::{
    DefenderPricing, DefenderStatusSummary, ProcessedRecommendation, RecommendationsSummary,
    SecurityAlert, SecurityAlertsSummary, SecurityAssessment, SecurityAssessmentsSummary,
    ServiceStatus, SubscriptionCoverage,
};
use crate::core::AppState;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const SENTINEL_WORKSPACES_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.OperationalInsights/workspaces'
    | where properties.features.enableLogAccessUsingOnlyResourcePermissions == true
    | project id, name, resourceGroup, location
    "#;

const WORKSPACES_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.OperationalInsights/workspaces'
    | project id, name, resourceGroup, location
    | limit 5
    "#;

/// Services where running without a Defender plan is worth calling out.
const CRITICAL_DEFENDER_SERVICES: [&str; 5] = [
    "VirtualMachines",
    "SqlServers",
    "StorageAccounts",
    "KubernetesService",
    "ContainerRegistry",
];

async fn list_subscriptions(state: &AppState) -> Result<Vec<Value>, ApiFailure> {
    let result = state
        .arm
        .get("/subscriptions", &[("api-version", "2020-01-01".to_string())])
        .await?;
    Ok(result
        .get("value")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Security Center alerts
// ---------------------------------------------------------------------------

pub fn alert_record(subscription_id: &str, subscription_name: &str, alert: &Value) -> SecurityAlert {
    let props = alert.get("properties").cloned().unwrap_or_else(|| json!({}));
    SecurityAlert {
        subscription_id: subscription_id.to_string(),
        subscription_name: subscription_name.to_string(),
        alert_id: value_str(alert, "id"),
        alert_name: value_str(alert, "name"),
        severity: value_str(&props, "severity"),
        status: value_str(&props, "status"),
        alert_type: value_str(&props, "alertType"),
        description: value_str(&props, "description"),
        start_time: value_str(&props, "startTimeUtc"),
        end_time: value_str(&props, "endTimeUtc"),
        compromised_entity: value_str(&props, "compromisedEntity"),
        remediation_steps: props
            .get("remediationSteps")
            .cloned()
            .unwrap_or_else(|| json!([])),
        extended_properties: props
            .get("extendedProperties")
            .cloned()
            .unwrap_or_else(|| json!({})),
    }
}

/// Severity/status bucketing. The critical subset matches the literal
/// severities "High" and "Critical" only; no case folding.
pub fn summarize_alerts(all_alerts: Vec<SecurityAlert>, now: DateTime<Utc>) -> SecurityAlertsSummary {
    let mut alerts_by_severity: BTreeMap<String, usize> = BTreeMap::new();
    let mut alerts_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut critical_alerts = Vec::new();
    let mut recent_alerts = Vec::new();

    let recent_cutoff = now - Duration::days(7);

    for alert in &all_alerts {
        let severity = if alert.severity.is_empty() {
            "Unknown".to_string()
        } else {
            alert.severity.clone()
        };
        let status = if alert.status.is_empty() {
            "Unknown".to_string()
        } else {
            alert.status.clone()
        };
        *alerts_by_severity.entry(severity).or_default() += 1;
        *alerts_by_status.entry(status).or_default() += 1;

        if alert.severity == "High" || alert.severity == "Critical" {
            critical_alerts.push(alert.clone());
        }

        if let Ok(start_time) = DateTime::parse_from_rfc3339(&alert.start_time) {
            if start_time.with_timezone(&Utc) >= recent_cutoff {
                recent_alerts.push(alert.clone());
            }
        }
    }

    SecurityAlertsSummary {
        total_alerts: all_alerts.len(),
        alerts_by_severity,
        alerts_by_status,
        recent_alerts,
        critical_alerts,
        all_alerts,
    }
}

pub async fn get_security_center_alerts(state: &AppState) -> Result<String, ApiFailure> {
    let subscriptions = list_subscriptions(state).await?;

    let mut all_alerts = Vec::new();
    for subscription in &subscriptions {
        let subscription_id = value_str(subscription, "subscriptionId");
        let subscription_name = value_str_or(subscription, "displayName", "Unknown");
        let endpoint = format!(
            "/subscriptions/{}/providers/Microsoft.Security/alerts",
            subscription_id
        );
        // A subscription that refuses the call is skipped, not fatal.
        let Ok(alerts) = state
            .arm
            .get(&endpoint, &[("api-version", "2022-01-01".to_string())])
            .await
        else {
            continue;
        };
        for alert in alerts.get("value").and_then(|v| v.as_array()).into_iter().flatten() {
            all_alerts.push(alert_record(&subscription_id, &subscription_name, alert));
        }
    }

    to_pretty(&summarize_alerts(all_alerts, Utc::now()))
}

// ---------------------------------------------------------------------------
// Security assessments
// ---------------------------------------------------------------------------

pub fn assessment_record(
    subscription_id: &str,
    subscription_name: &str,
    assessment: &Value,
) -> SecurityAssessment {
    let props = assessment.get("properties").cloned().unwrap_or_else(|| json!({}));
    let status = props.get("status").cloned().unwrap_or_else(|| json!({}));
    let metadata = props.get("metadata").cloned().unwrap_or_else(|| json!({}));
    SecurityAssessment {
        subscription_id: subscription_id.to_string(),
        subscription_name: subscription_name.to_string(),
        assessment_id: value_str(assessment, "id"),
        assessment_name: value_str(assessment, "name"),
        display_name: value_str(&props, "displayName"),
        description: value_str(&props, "description"),
        severity: value_str(&metadata, "severity"),
        category: metadata.get("categories").cloned().unwrap_or_else(|| json!([])),
        status_code: value_str(&status, "code"),
        status_cause: value_str(&status, "cause"),
        status_description: value_str(&status, "description"),
        resource_details: props.get("resourceDetails").cloned().unwrap_or_else(|| json!({})),
        additional_data: props.get("additionalData").cloned().unwrap_or_else(|| json!({})),
    }
}

pub fn summarize_assessments(all_assessments: Vec<SecurityAssessment>) -> SecurityAssessmentsSummary {
    let mut assessments_by_severity: BTreeMap<String, usize> = BTreeMap::new();
    let mut assessments_by_status: BTreeMap<String, usize> = BTreeMap::new();
    let mut failed_assessments = Vec::new();
    let mut critical_findings = Vec::new();

    for assessment in &all_assessments {
        let severity = if assessment.severity.is_empty() {
            "Unknown".to_string()
        } else {
            assessment.severity.clone()
        };
        let status_code = if assessment.status_code.is_empty() {
            "Unknown".to_string()
        } else {
            assessment.status_code.clone()
        };
        *assessments_by_severity.entry(severity).or_default() += 1;
        *assessments_by_status.entry(status_code).or_default() += 1;

        let failed = assessment.status_code == "Unhealthy" || assessment.status_code == "Failed";
        if failed {
            failed_assessments.push(assessment.clone());
        }
        if failed && (assessment.severity == "High" || assessment.severity == "Critical") {
            critical_findings.push(assessment.clone());
        }
    }

    SecurityAssessmentsSummary {
        total_assessments: all_assessments.len(),
        assessments_by_severity,
        assessments_by_status,
        failed_assessments,
        critical_findings,
        all_assessments,
    }
}

pub async fn get_security_assessments(state: &AppState) -> Result<String, ApiFailure> {
    let subscriptions = list_subscriptions(state).await?;

    let mut all_assessments = Vec::new();
    for subscription in &subscriptions {
        let subscription_id = value_str(subscription, "subscriptionId");
        let subscription_name = value_str_or(subscription, "displayName", "Unknown");
        let endpoint = format!(
            "/subscriptions/{}/providers/Microsoft.Security/assessments",
            subscription_id
        );
        let Ok(assessments) = state
            .arm
            .get(&endpoint, &[("api-version", "2020-01-01".to_string())])
            .await
        else {
            continue;
        };
        for assessment in assessments
            .get("value")
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
        {
            all_assessments.push(assessment_record(
                &subscription_id,
                &subscription_name,
                assessment,
            ));
        }
    }

    to_pretty(&summarize_assessments(all_assessments))
}

// ---------------------------------------------------------------------------
// Defender for Cloud coverage
// ---------------------------------------------------------------------------

pub fn pricing_record(
    subscription_id: &str,
    subscription_name: &str,
    pricing: &Value,
) -> DefenderPricing {
    let props = pricing.get("properties").cloned().unwrap_or_else(|| json!({}));
    let pricing_tier = value_str(&props, "pricingTier");
    DefenderPricing {
        subscription_id: subscription_id.to_string(),
        subscription_name: subscription_name.to_string(),
        resource_type: value_str(pricing, "name"),
        enabled: pricing_tier == "Standard",
        pricing_tier,
        free_trial_remaining_days: value_str(&props, "freeTrialRemainingTime"),
        subplan: value_str(&props, "subPlan"),
        extensions: props.get("extensions").cloned().unwrap_or_else(|| json!([])),
    }
}

pub fn summarize_pricings(all_pricings: Vec<DefenderPricing>) -> DefenderStatusSummary {
    let mut coverage_by_subscription: BTreeMap<String, SubscriptionCoverage> = BTreeMap::new();
    let mut coverage_by_service: BTreeMap<String, crate::core::types::ServiceCoverage> =
        BTreeMap::new();

    for pricing in &all_pricings {
        let subscription = coverage_by_subscription
            .entry(pricing.subscription_id.clone())
            .or_insert_with(|| SubscriptionCoverage {
                subscription_name: pricing.subscription_name.clone(),
                enabled: 0,
                disabled: 0,
                services: Vec::new(),
            });
        if pricing.enabled {
            subscription.enabled += 1;
        } else {
            subscription.disabled += 1;
        }
        subscription.services.push(ServiceStatus {
            service: pricing.resource_type.clone(),
            enabled: pricing.enabled,
        });

        let service = coverage_by_service
            .entry(pricing.resource_type.clone())
            .or_default();
        if pricing.enabled {
            service.enabled += 1;
        } else {
            service.disabled += 1;
        }
    }

    let mut recommendations = Vec::new();
    for service in CRITICAL_DEFENDER_SERVICES {
        let disabled = coverage_by_service
            .get(service)
            .map(|c| c.disabled)
            .unwrap_or(0);
        if disabled > 0 {
            recommendations.push(format!(
                "Enable Defender for {} - {} subscription(s) not protected",
                service, disabled
            ));
        }
    }

    DefenderStatusSummary {
        total_resource_types: all_pricings.len(),
        enabled_services: all_pricings.iter().filter(|p| p.enabled).count(),
        disabled_services: all_pricings.iter().filter(|p| !p.enabled).count(),
        coverage_by_subscription,
        coverage_by_service,
        recommendations,
        all_pricings,
    }
}

pub async fn get_defender_for_cloud_status(state: &AppState) -> Result<String, ApiFailure> {
    let subscriptions = list_subscriptions(state).await?;

    let mut all_pricings = Vec::new();
    for subscription in &subscriptions {
        let subscription_id = value_str(subscription, "subscriptionId");
        let subscription_name = value_str_or(subscription, "displayName", "Unknown");
        let endpoint = format!(
            "/subscriptions/{}/providers/Microsoft.Security/pricings",
            subscription_id
        );
        let Ok(pricings) = state
            .arm
            .get(&endpoint, &[("api-version", "2022-03-01".to_string())])
            .await
        else {
            continue;
        };
        for pricing in pricings.get("value").and_then(|v| v.as_array()).into_iter().flatten() {
            all_pricings.push(pricing_record(&subscription_id, &subscription_name, pricing));
        }
    }

    to_pretty(&summarize_pricings(all_pricings))
}

// ---------------------------------------------------------------------------
// Secure score, incidents, threat intelligence
// ---------------------------------------------------------------------------

pub async fn get_secure_score_and_compliance(state: &AppState) -> Result<String, ApiFailure> {
    let secure_score_endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Security/secureScores",
        state.config.subscription_id
    );
    let compliance_endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Security/regulatoryComplianceStandards",
        state.config.subscription_id
    );

    let secure_score = state
        .arm
        .get(&secure_score_endpoint, &[("api-version", "2020-01-01".to_string())])
        .await;
    let compliance = state
        .arm
        .get(
            &compliance_endpoint,
            &[("api-version", "2019-01-01-preview".to_string())],
        )
        .await;

    // Either half may fail independently; the combined payload carries
    // whichever envelope applies.
    to_pretty(&json!({
        "secure_score": result_or_envelope(secure_score),
        "regulatory_compliance": result_or_envelope(compliance),
    }))
}

pub async fn get_security_incidents(state: &AppState) -> Result<String, ApiFailure> {
    let workspaces = query_resources(state, SENTINEL_WORKSPACES_QUERY).await?;

    let mut total_incidents = 0usize;
    let mut workspace_reports = Vec::new();
    let mut incidents_by_severity: BTreeMap<String, usize> = BTreeMap::new();

    for row in graph_rows(&workspaces) {
        let workspace_id = row_str(&row, 0);
        let workspace_name = row_str(&row, 1);
        let endpoint = format!(
            "{}/providers/Microsoft.SecurityInsights/incidents",
            workspace_id
        );
        let Ok(result) = state
            .arm
            .get(&endpoint, &[("api-version", "2021-10-01".to_string())])
            .await
        else {
            continue;
        };

        let incidents = result
            .get("value")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        total_incidents += incidents.len();

        for incident in &incidents {
            let severity = incident
                .pointer("/properties/severity")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string();
            *incidents_by_severity.entry(severity).or_default() += 1;
        }

        workspace_reports.push(json!({
            "workspace_name": workspace_name,
            "workspace_id": workspace_id,
            "incident_count": incidents.len(),
            "incidents": incidents,
        }));
    }

    to_pretty(&json!({
        "total_incidents": total_incidents,
        "workspaces": workspace_reports,
        "incidents_by_severity": incidents_by_severity,
        "recent_incidents": [],
    }))
}

pub async fn get_threat_intelligence_indicators(state: &AppState) -> Result<String, ApiFailure> {
    let workspaces = query_resources(state, WORKSPACES_QUERY).await?;

    let mut total_indicators = 0usize;
    let mut workspace_reports = Vec::new();

    for row in graph_rows(&workspaces) {
        let workspace_id = row_str(&row, 0);
        let workspace_name = row_str(&row, 1);
        let endpoint = format!(
            "{}/providers/Microsoft.SecurityInsights/threatIntelligence/main/indicators",
            workspace_id
        );
        let Ok(result) = state
            .arm
            .get(&endpoint, &[("api-version", "2021-10-01".to_string())])
            .await
        else {
            continue;
        };

        let indicators = result
            .get("value")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        total_indicators += indicators.len();

        // First 10 indicators per workspace keeps the payload bounded.
        let preview: Vec<Value> = indicators.iter().take(10).cloned().collect();
        workspace_reports.push(json!({
            "workspace_name": workspace_name,
            "workspace_id": workspace_id,
            "indicators_count": indicators.len(),
            "indicators": preview,
        }));
    }

    to_pretty(&json!({
        "total_indicators": total_indicators,
        "workspaces": workspace_reports,
        "indicators_by_type": {},
    }))
}

// ---------------------------------------------------------------------------
// Processed security recommendations
// ---------------------------------------------------------------------------

pub fn process_assessment_metadata(assessment: &Value) -> ProcessedRecommendation {
    let props = assessment.get("properties").cloned().unwrap_or_else(|| json!({}));
    let metadata = props.get("metadata").cloned().unwrap_or_else(|| json!({}));
    ProcessedRecommendation {
        id: value_str(assessment, "id"),
        name: value_str(assessment, "name"),
        display_name: value_str(&metadata, "displayName"),
        description: value_str(&metadata, "description"),
        severity: value_str(&metadata, "severity"),
        category: metadata.get("categories").cloned().unwrap_or_else(|| json!([])),
        status: props.get("status").cloned().unwrap_or_else(|| json!({})),
        remediation_description: value_str(&metadata, "remediationDescription"),
        implementation_effort: value_str(&metadata, "implementationEffort"),
        user_impact: value_str(&metadata, "userImpact"),
        threats: metadata.get("threats").cloned().unwrap_or_else(|| json!([])),
        resource_details: props.get("resourceDetails").cloned().unwrap_or_else(|| json!({})),
        additional_data: props.get("additionalData").cloned().unwrap_or_else(|| json!({})),
    }
}

fn severity_weight(severity: &str) -> u8 {
    match severity {
        "High" => 3,
        "Medium" => 2,
        "Low" => 1,
        _ => 0,
    }
}

fn is_unhealthy(recommendation: &ProcessedRecommendation) -> bool {
    recommendation
        .status
        .get("code")
        .and_then(|c| c.as_str())
        .map(|c| c == "Unhealthy")
        .unwrap_or(false)
}

/// Highest severity first; within a severity, unhealthy findings first.
pub fn sort_recommendations(recommendations: &mut [ProcessedRecommendation]) {
    recommendations.sort_by(|a, b| {
        let key_a = (severity_weight(&a.severity), is_unhealthy(a) as u8);
        let key_b = (severity_weight(&b.severity), is_unhealthy(b) as u8);
        key_b.cmp(&key_a)
    });
}

pub fn summarize_recommendations(
    mut recommendations: Vec<ProcessedRecommendation>,
) -> RecommendationsSummary {
    sort_recommendations(&mut recommendations);
    let critical_recommendations: Vec<ProcessedRecommendation> = recommendations
        .iter()
        .filter(|r| r.severity == "High" && is_unhealthy(r))
        .cloned()
        .collect();
    RecommendationsSummary {
        total_recommendations: recommendations.len(),
        critical_recommendations,
        all_recommendations: recommendations,
    }
}

pub async fn get_security_recommendations_detailed(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Security/assessments",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2020-01-01".to_string()),
                ("$expand", "links,metadata".to_string()),
            ],
        )
        .await?;

    match result.get("value").and_then(|v| v.as_array()) {
        Some(assessments) => {
            let processed: Vec<ProcessedRecommendation> =
                assessments.iter().map(process_assessment_metadata).collect();
            to_pretty(&summarize_recommendations(processed))
        }
        None => to_pretty(&result),
    }
}

/// Key-vault style security analyzers live in sibling modules; this keeps the
/// tenant-wide query path exercised from one place for tests.
pub async fn tenant_graph_objects(state: &AppState, query: &str) -> Result<Vec<Value>, ApiFailure> {
    let result = query_resources_tenant(state, query).await?;
    Ok(result
        .get("data")
        .and_then(|d| d.as_array())
        .cloned()
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(severity: &str, start_time: &str) -> SecurityAlert {
        SecurityAlert {
            subscription_id: "sub".to_string(),
            subscription_name: "Sub".to_string(),
            alert_id: "/alerts/1".to_string(),
            alert_name: "alert".to_string(),
            severity: severity.to_string(),
            status: "Active".to_string(),
            alert_type: "test".to_string(),
            description: String::new(),
            start_time: start_time.to_string(),
            end_time: String::new(),
            compromised_entity: String::new(),
            remediation_steps: json!([]),
            extended_properties: json!({}),
        }
    }

    #[test]
    fn critical_bucket_is_case_sensitive() {
        let now = Utc::now();
        let summary = summarize_alerts(
            vec![
                alert("High", ""),
                alert("Critical", ""),
                alert("high", ""),
                alert("HIGH", ""),
                alert("Medium", ""),
            ],
            now,
        );
        assert_eq!(summary.critical_alerts.len(), 2);
        assert_eq!(summary.total_alerts, 5);
        assert_eq!(summary.alerts_by_severity["High"], 1);
        assert_eq!(summary.alerts_by_severity["high"], 1);
    }

    #[test]
    fn recent_alerts_use_a_seven_day_cutoff() {
        let now = DateTime::parse_from_rfc3339("2025-03-10T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let summary = summarize_alerts(
            vec![
                alert("Low", "2025-03-08T12:00:00Z"),
                alert("Low", "2025-02-01T12:00:00Z"),
                alert("Low", "not-a-timestamp"),
            ],
            now,
        );
        assert_eq!(summary.recent_alerts.len(), 1);
        assert_eq!(summary.recent_alerts[0].start_time, "2025-03-08T12:00:00Z");
    }

    fn assessment(severity: &str, status_code: &str) -> SecurityAssessment {
        SecurityAssessment {
            subscription_id: "sub".to_string(),
            subscription_name: "Sub".to_string(),
            assessment_id: String::new(),
            assessment_name: String::new(),
            display_name: String::new(),
            description: String::new(),
            severity: severity.to_string(),
            category: json!([]),
            status_code: status_code.to_string(),
            status_cause: String::new(),
            status_description: String::new(),
            resource_details: json!({}),
            additional_data: json!({}),
        }
    }

    #[test]
    fn critical_findings_need_failed_status_and_high_severity() {
        let summary = summarize_assessments(vec![
            assessment("High", "Unhealthy"),
            assessment("High", "Healthy"),
            assessment("Low", "Unhealthy"),
            assessment("Critical", "Failed"),
        ]);
        assert_eq!(summary.failed_assessments.len(), 3);
        assert_eq!(summary.critical_findings.len(), 2);
    }

    #[test]
    fn defender_recommendations_flag_uncovered_critical_services() {
        let pricing = |service: &str, tier: &str| {
            pricing_record(
                "sub-1",
                "Sub",
                &json!({"name": service, "properties": {"pricingTier": tier}}),
            )
        };
        let summary = summarize_pricings(vec![
            pricing("VirtualMachines", "Free"),
            pricing("SqlServers", "Standard"),
            pricing("KeyVaults", "Free"),
        ]);
        assert_eq!(summary.enabled_services, 1);
        assert_eq!(summary.disabled_services, 2);
        assert_eq!(
            summary.recommendations,
            vec!["Enable Defender for VirtualMachines - 1 subscription(s) not protected"]
        );
    }

    fn recommendation(severity: &str, status_code: &str) -> ProcessedRecommendation {
        process_assessment_metadata(&json!({
            "id": "/assessments/x",
            "name": "x",
            "properties": {
                "status": {"code": status_code},
                "metadata": {"severity": severity}
            }
        }))
    }

    #[test]
    fn recommendations_sort_by_severity_then_unhealthy() {
        let mut recs = vec![
            recommendation("Low", "Unhealthy"),
            recommendation("High", "Healthy"),
            recommendation("High", "Unhealthy"),
            recommendation("Medium", "Unhealthy"),
        ];
        sort_recommendations(&mut recs);
        let order: Vec<(String, String)> = recs
            .iter()
            .map(|r| {
                (
                    r.severity.clone(),
                    r.status.get("code").and_then(|c| c.as_str()).unwrap_or("").to_string(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("High".to_string(), "Unhealthy".to_string()),
                ("High".to_string(), "Healthy".to_string()),
                ("Medium".to_string(), "Unhealthy".to_string()),
                ("Low".to_string(), "Unhealthy".to_string()),
            ]
        );
    }

    #[test]
    fn critical_recommendations_are_high_and_unhealthy_only() {
        let summary = summarize_recommendations(vec![
            recommendation("High", "Unhealthy"),
            recommendation("High", "Healthy"),
            recommendation("Critical", "Unhealthy"),
        ]);
        // "Critical" is not a severity the assessments metadata emits; the
        // critical subset keys on "High" exactly.
        assert_eq!(summary.critical_recommendations.len(), 1);
        assert_eq!(summary.total_recommendations, 3);
    }
}
