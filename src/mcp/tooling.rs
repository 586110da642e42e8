use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ToolCatalogEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn no_args() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

fn timespan_schema(id_field: &str, id_description: &str, default_timespan: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(
        id_field.to_string(),
        serde_json::json!({"type": "string", "description": id_description}),
    );
    properties.insert(
        "timespan".to_string(),
        serde_json::json!({
            "type": "string",
            "description": "ISO-8601 metrics window, e.g. PT1H, PT24H, P7D",
            "default": default_timespan
        }),
    );
    serde_json::json!({"type": "object", "properties": properties})
}

pub fn tool_catalog() -> Vec<ToolCatalogEntry> {
    vec![
        // ── Cost & billing ──────────────────────────────────────────────
        ToolCatalogEntry {
            name: "get_cost_analysis",
            title: "Cost Analysis",
            description: "Run a Cost Management query for the subscription.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "timeframe": {
                        "type": "string",
                        "enum": ["MonthToDate", "BillingMonthToDate", "TheLastMonth", "Custom"],
                        "default": "MonthToDate"
                    },
                    "granularity": {"type": "string", "enum": ["Daily", "Monthly", "None"], "default": "Daily"},
                    "group_by": {"type": "string", "description": "Dimension to group by, e.g. ResourceGroup"},
                    "start_date": {"type": "string", "description": "YYYY-MM-DD, Custom timeframe only"},
                    "end_date": {"type": "string", "description": "YYYY-MM-DD, Custom timeframe only"}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_budgets",
            title: "Budgets",
            description: "List all budgets for the subscription.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_recommendations",
            title: "Advisor Top 10",
            description: "Top 10 Azure Advisor recommendations.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_usage_details",
            title: "Usage Details",
            description: "Consumption usage details for a date window.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "start_date": {"type": "string", "description": "YYYY-MM-DD, defaults to start of month"},
                    "end_date": {"type": "string", "description": "YYYY-MM-DD, defaults to today"}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_subscription_details",
            title: "Subscription",
            description: "Details of the configured subscription.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_price_sheet",
            title: "Price Sheet",
            description: "Price sheet for the subscription.",
            input_schema: no_args(),
        },
        // ── Inventory / Resource Graph ──────────────────────────────────
        ToolCatalogEntry {
            name: "get_all_resources",
            title: "All Resources",
            description: "Resource Graph query over the subscription; custom KQL optional.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "KQL query; defaults to a full inventory projection"}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_network_topology",
            title: "Network Topology",
            description: "VNets, peerings, NSGs, gateways, and related network resources.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_compute_resources",
            title: "Compute Resources",
            description: "VMs, scale sets, app services, containers, and batch accounts.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_storage_resources",
            title: "Storage Resources",
            description: "Storage accounts, SQL, Cosmos, Redis, and managed databases.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_resource_dependencies",
            title: "Resource Dependencies",
            description: "Resources with declared dependencies or network profiles.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_resource_hierarchy",
            title: "Resource Hierarchy",
            description: "Resources grouped by resource group with counts.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_network_connections",
            title: "Network Connections",
            description: "NIC/subnet associations and subnet address prefixes.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "export_resources_graphml",
            title: "GraphML Export",
            description: "Export resources as a GraphML-style node/edge structure.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "include_network": {"type": "boolean", "default": true},
                    "include_dependencies": {"type": "boolean", "default": true}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_resource_detailed_info",
            title: "Resource Details",
            description: "Detailed ARM view of one resource, or every resource when no id is given.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "resource_id": {"type": "string", "description": "Full ARM resource ID"}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_network_security_groups_detailed",
            title: "NSGs Detailed",
            description: "NSGs with rules, default rules, and associations.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_load_balancers_detailed",
            title: "Load Balancers Detailed",
            description: "Load balancers with pools, probes, and rules.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_virtual_machines_detailed",
            title: "VMs Detailed",
            description: "VMs with size, OS, network profile, and power state.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_app_services_detailed",
            title: "App Services Detailed",
            description: "App services with host names, plans, and site config.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_databases_detailed",
            title: "Databases Detailed",
            description: "SQL, Cosmos, Postgres, MySQL, and Redis with tier and firewall data.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_storage_accounts_detailed",
            title: "Storage Accounts Detailed",
            description: "Storage accounts with access tier, TLS, and network ACLs.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_key_vaults_detailed",
            title: "Key Vaults Detailed",
            description: "Key vaults with access policies and network access flags.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_resource_group_details",
            title: "Resource Groups",
            description: "Resource groups with tags.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_network_watchers_topology",
            title: "Network Watcher Topology",
            description: "Topology from the first Network Watcher in the subscription.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_monitoring_and_diagnostics",
            title: "Diagnostic Settings",
            description: "Diagnostic settings and their log/metric sinks.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_resource_locks",
            title: "Resource Locks",
            description: "Management locks across the subscription.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_rbac_assignments",
            title: "RBAC Assignments",
            description: "Role assignments at subscription scope.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_resource_dependencies_advanced",
            title: "Dependencies Advanced",
            description: "Cross-resource-group dependency projection.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_unused_resources",
            title: "Unused Resources",
            description: "Stopped VMs, unattached disks/NICs, and orphaned public IPs.",
            input_schema: no_args(),
        },
        // ── Performance & monitoring ────────────────────────────────────
        ToolCatalogEntry {
            name: "get_vm_performance_metrics",
            title: "VM Metrics",
            description: "CPU/memory/disk/network metrics for one VM, or for up to 10 running VMs.",
            input_schema: timespan_schema("vm_resource_id", "Specific VM resource ID", "PT1H"),
        },
        ToolCatalogEntry {
            name: "get_storage_performance_metrics",
            title: "Storage Metrics",
            description: "Transactions, capacity, and availability for storage accounts.",
            input_schema: timespan_schema(
                "storage_account_id",
                "Specific storage account resource ID",
                "PT24H",
            ),
        },
        ToolCatalogEntry {
            name: "get_database_performance_metrics",
            title: "Database Metrics",
            description: "DTU/CPU/connection metrics for SQL and Cosmos databases.",
            input_schema: timespan_schema("database_id", "Specific database resource ID", "PT24H"),
        },
        ToolCatalogEntry {
            name: "get_activity_log_analysis",
            title: "Activity Log Analysis",
            description: "Activity log usage patterns and rarely-touched resources.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "hours_back": {"type": "integer", "minimum": 1, "default": 168}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_alerts_overview",
            title: "Alerts Overview",
            description: "Active alerts (New/Acknowledged) from Alerts Management.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_alert_rules",
            title: "Alert Rules",
            description: "Metric alert rules and their configurations.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_alert_details",
            title: "Alert Details",
            description: "One alert with remediation steps; Security Center first, metric alerts as fallback.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "alert_id": {"type": "string"}
                },
                "required": ["alert_id"]
            }),
        },
        ToolCatalogEntry {
            name: "get_application_insights_data",
            title: "Application Insights",
            description: "Request/failure/exception telemetry from Application Insights.",
            input_schema: timespan_schema(
                "app_insights_id",
                "Application Insights resource ID",
                "PT24H",
            ),
        },
        ToolCatalogEntry {
            name: "get_resource_health_status",
            title: "Resource Health",
            description: "Resources whose availability state is not Available.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_log_analytics_data",
            title: "Log Analytics Query",
            description: "Run a KQL query against a Log Analytics workspace.",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "workspace_id": {"type": "string", "description": "Workspace resource ID; first workspace when omitted"},
                    "query": {"type": "string", "description": "KQL; defaults to a Perf counters query"},
                    "timespan": {"type": "string", "default": "PT24H"}
                }
            }),
        },
        ToolCatalogEntry {
            name: "get_azure_advisor_detailed",
            title: "Advisor Detailed",
            description: "Advisor recommendations across cost, performance, HA, security, and operations.",
            input_schema: no_args(),
        },
        // ── Security posture ────────────────────────────────────────────
        ToolCatalogEntry {
            name: "get_security_center_alerts",
            title: "Security Alerts",
            description: "Security Center alerts across all visible subscriptions, bucketed by severity.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_security_assessments",
            title: "Security Assessments",
            description: "Security Center assessments with failed and critical findings.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_defender_for_cloud_status",
            title: "Defender Coverage",
            description: "Defender for Cloud plan coverage per subscription and service.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_secure_score_and_compliance",
            title: "Secure Score",
            description: "Defender secure score plus regulatory compliance standards.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_security_incidents",
            title: "Sentinel Incidents",
            description: "Sentinel incidents per workspace, bucketed by severity.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_threat_intelligence_indicators",
            title: "Threat Intelligence",
            description: "Threat intelligence indicators from Sentinel workspaces.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_security_recommendations_detailed",
            title: "Security Recommendations",
            description: "Assessments flattened into prioritized remediation guidance.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_key_vault_security_status",
            title: "Key Vault Security",
            description: "Per-vault security score over soft delete, purge protection, network access, and retention.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_network_security_analysis",
            title: "Network Security Analysis",
            description: "NSG rule risk scoring, firewall posture, and public IP exposure.",
            input_schema: no_args(),
        },
        // ── Aggregate reports ───────────────────────────────────────────
        ToolCatalogEntry {
            name: "get_comprehensive_architecture_data",
            title: "Architecture Report",
            description: "Combined compute/network/storage/dependency report with per-section error isolation.",
            input_schema: no_args(),
        },
        ToolCatalogEntry {
            name: "get_resource_utilization_summary",
            title: "Utilization Summary",
            description: "Unused resources, advisor findings, activity patterns, and VM metrics in one report.",
            input_schema: no_args(),
        },
    ]
}

pub fn schema_to_object_map(schema: &Value) -> Arc<Map<String, Value>> {
    match schema {
        Value::Object(map) => Arc::new(map.clone()),
        _ => Arc::new(Map::new()),
    }
}
