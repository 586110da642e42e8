use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ───────────────────────────────────────────────────────────────────────────
// Key Vault security analysis
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSecurityConfig {
    pub soft_delete_enabled: bool,
    pub purge_protection_enabled: bool,
    pub public_network_access: String,
    pub soft_delete_retention_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultAnalysis {
    pub vault_name: String,
    pub resource_group: String,
    pub subscription_id: String,
    pub location: String,
    pub vault_uri: String,
    pub security_config: VaultSecurityConfig,
    /// 100 minus the fixed penalty for each detected misconfiguration,
    /// floored at 0.
    pub security_score: i64,
    pub security_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalVault {
    pub vault_name: String,
    pub security_score: i64,
    pub critical_issues: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeyVaultSecuritySummary {
    pub total_key_vaults: usize,
    pub average_security_score: f64,
    pub vaults_with_issues: usize,
    pub common_issues: BTreeMap<String, usize>,
    pub security_recommendations: Vec<String>,
    pub critical_vaults: Vec<CriticalVault>,
    pub all_vaults: Vec<VaultAnalysis>,
}

// ───────────────────────────────────────────────────────────────────────────
// Network security analysis
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskyRule {
    pub rule_name: String,
    pub risk_level: String,
    pub risk_reasons: Vec<String>,
    pub source: String,
    pub destination_port: String,
    pub protocol: String,
    pub access: String,
    pub direction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsgAnalysis {
    pub nsg_name: String,
    pub resource_group: String,
    pub subscription_id: String,
    pub total_rules: usize,
    pub risky_rules: Vec<RiskyRule>,
    pub security_score: i64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallAnalysis {
    pub firewall_name: String,
    pub resource_group: String,
    pub subscription_id: String,
    pub threat_intel_mode: String,
    pub has_policy: bool,
    pub sku: Value,
    pub security_score: i64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicIpAnalysis {
    pub total_public_ips: usize,
    pub associated_resources: usize,
    pub unassociated_ips: usize,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityRisk {
    pub resource_type: String,
    pub resource_name: String,
    pub security_score: i64,
    pub risk_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkSecurityOverview {
    pub total_nsgs: usize,
    pub nsgs_with_risks: usize,
    pub total_firewalls: usize,
    pub total_public_ips: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkSecuritySummary {
    pub network_security_overview: NetworkSecurityOverview,
    pub security_risks: Vec<SecurityRisk>,
    pub nsg_analysis: Vec<NsgAnalysis>,
    pub firewall_analysis: Vec<FirewallAnalysis>,
    pub public_ip_analysis: PublicIpAnalysis,
    /// `[recommendation, occurrence count]` pairs, most common first.
    pub top_recommendations: Vec<(String, usize)>,
}

// ───────────────────────────────────────────────────────────────────────────
// Security Center alerts / assessments / Defender coverage
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub subscription_id: String,
    pub subscription_name: String,
    pub alert_id: String,
    pub alert_name: String,
    pub severity: String,
    pub status: String,
    pub alert_type: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub compromised_entity: String,
    pub remediation_steps: Value,
    pub extended_properties: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SecurityAlertsSummary {
    pub total_alerts: usize,
    pub alerts_by_severity: BTreeMap<String, usize>,
    pub alerts_by_status: BTreeMap<String, usize>,
    pub recent_alerts: Vec<SecurityAlert>,
    pub critical_alerts: Vec<SecurityAlert>,
    pub all_alerts: Vec<SecurityAlert>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub subscription_id: String,
    pub subscription_name: String,
    pub assessment_id: String,
    pub assessment_name: String,
    pub display_name: String,
    pub description: String,
    pub severity: String,
    pub category: Value,
    pub status_code: String,
    pub status_cause: String,
    pub status_description: String,
    pub resource_details: Value,
    pub additional_data: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SecurityAssessmentsSummary {
    pub total_assessments: usize,
    pub assessments_by_severity: BTreeMap<String, usize>,
    pub assessments_by_status: BTreeMap<String, usize>,
    pub failed_assessments: Vec<SecurityAssessment>,
    pub critical_findings: Vec<SecurityAssessment>,
    pub all_assessments: Vec<SecurityAssessment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderPricing {
    pub subscription_id: String,
    pub subscription_name: String,
    pub resource_type: String,
    pub pricing_tier: String,
    pub enabled: bool,
    pub free_trial_remaining_days: String,
    pub subplan: String,
    pub extensions: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionCoverage {
    pub subscription_name: String,
    pub enabled: usize,
    pub disabled: usize,
    pub services: Vec<ServiceStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCoverage {
    pub enabled: usize,
    pub disabled: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DefenderStatusSummary {
    pub total_resource_types: usize,
    pub enabled_services: usize,
    pub disabled_services: usize,
    pub coverage_by_subscription: BTreeMap<String, SubscriptionCoverage>,
    pub coverage_by_service: BTreeMap<String, ServiceCoverage>,
    pub recommendations: Vec<String>,
    pub all_pricings: Vec<DefenderPricing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedRecommendation {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub severity: String,
    pub category: Value,
    pub status: Value,
    pub remediation_description: String,
    pub implementation_effort: String,
    pub user_impact: String,
    pub threats: Value,
    pub resource_details: Value,
    pub additional_data: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsSummary {
    pub total_recommendations: usize,
    pub critical_recommendations: Vec<ProcessedRecommendation>,
    pub all_recommendations: Vec<ProcessedRecommendation>,
}

// ───────────────────────────────────────────────────────────────────────────
// Monitor metrics fan-out summaries
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmMetricsEntry {
    pub vm_id: String,
    pub vm_name: String,
    pub metrics: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VmMetricsCounters {
    pub total_vms: usize,
    pub high_cpu_vms: usize,
    pub low_utilization_vms: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VmMetricsSummary {
    pub timespan: String,
    pub vm_metrics: Vec<VmMetricsEntry>,
    pub summary: VmMetricsCounters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageMetricsEntry {
    pub storage_id: String,
    pub storage_name: String,
    pub metrics: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageMetricsCounters {
    pub total_accounts: usize,
    pub low_usage_accounts: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageMetricsSummary {
    pub timespan: String,
    pub storage_metrics: Vec<StorageMetricsEntry>,
    pub summary: StorageMetricsCounters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseMetricsEntry {
    pub database_id: String,
    pub database_name: String,
    pub database_type: String,
    pub metrics: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatabaseMetricsCounters {
    pub total_databases: usize,
    pub high_utilization_dbs: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseMetricsSummary {
    pub timespan: String,
    pub database_metrics: Vec<DatabaseMetricsEntry>,
    pub summary: DatabaseMetricsCounters,
}

// ───────────────────────────────────────────────────────────────────────────
// Activity log analysis
// ───────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityTimeRange {
    pub start: String,
    pub end: String,
    pub hours_analyzed: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceActivity {
    pub event_count: usize,
    pub last_activity: String,
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InactiveResource {
    pub resource_id: String,
    pub event_count: usize,
    pub last_activity: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivitySummaryCounters {
    pub total_events: usize,
    pub unique_resources: usize,
    pub inactive_resources: Vec<InactiveResource>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityAnalysis {
    pub time_range: ActivityTimeRange,
    pub resource_activity: BTreeMap<String, ResourceActivity>,
    pub summary: ActivitySummaryCounters,
}
