use serde_json::{json, Value};

/// A fixed `https://<category>/<name>` URI that reads as one tool invocation
/// with canned arguments.
#[derive(Clone, Debug)]
pub struct ResourceCatalogEntry {
    pub uri: &'static str,
    pub description: &'static str,
    /// Internal tool the URI maps onto.
    pub tool: &'static str,
    /// Arguments the read is issued with.
    pub arguments: Value,
}

pub fn resource_catalog() -> Vec<ResourceCatalogEntry> {
    vec![
        ResourceCatalogEntry {
            uri: "https://azure-billing/subscription",
            description: "Details about the current subscription.",
            tool: "get_subscription_details",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-billing/billing-summary",
            description: "Month-to-date cost summary for the subscription.",
            tool: "get_cost_analysis",
            arguments: json!({"timeframe": "MonthToDate", "granularity": "None"}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-billing/budgets",
            description: "All budgets for the subscription.",
            tool: "get_budgets",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-resources/all",
            description: "All Azure resources in the subscription.",
            tool: "get_all_resources",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-resources/network-topology",
            description: "Network topology for the subscription.",
            tool: "get_network_topology",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-resources/hierarchy",
            description: "Resource hierarchy organized by resource groups.",
            tool: "get_resource_hierarchy",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-resources/dependencies",
            description: "Resource dependencies and relationships.",
            tool: "get_resource_dependencies",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-optimization/unused-resources",
            description: "Potentially unused or under-utilized resources.",
            tool: "get_unused_resources",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-optimization/utilization-summary",
            description: "Comprehensive resource utilization summary.",
            tool: "get_resource_utilization_summary",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-optimization/advisor-recommendations",
            description: "Detailed Azure Advisor recommendations.",
            tool: "get_azure_advisor_detailed",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-performance/vm-metrics",
            description: "VM performance metrics.",
            tool: "get_vm_performance_metrics",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-performance/storage-metrics",
            description: "Storage performance metrics.",
            tool: "get_storage_performance_metrics",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-performance/application-insights",
            description: "Application Insights performance data.",
            tool: "get_application_insights_data",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-performance/resource-health",
            description: "Resource health status across the subscription.",
            tool: "get_resource_health_status",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-performance/log-analytics",
            description: "Log Analytics performance data.",
            tool: "get_log_analytics_data",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/alerts",
            description: "Security Center alerts and incidents.",
            tool: "get_security_center_alerts",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/assessments",
            description: "Security Center security assessments.",
            tool: "get_security_assessments",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/defender-status",
            description: "Microsoft Defender for Cloud status.",
            tool: "get_defender_for_cloud_status",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/keyvault-security",
            description: "Key Vault security configuration analysis.",
            tool: "get_key_vault_security_status",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/network-security",
            description: "Network security analysis including NSGs and firewalls.",
            tool: "get_network_security_analysis",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/secure-score",
            description: "Defender secure score and compliance.",
            tool: "get_secure_score_and_compliance",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/incidents",
            description: "Azure Sentinel security incidents.",
            tool: "get_security_incidents",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/threat-intelligence",
            description: "Threat intelligence indicators.",
            tool: "get_threat_intelligence_indicators",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-security/recommendations-detailed",
            description: "Detailed security recommendations with remediation steps.",
            tool: "get_security_recommendations_detailed",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-alerts/overview",
            description: "Active alerts overview across the subscription.",
            tool: "get_alerts_overview",
            arguments: json!({}),
        },
        ResourceCatalogEntry {
            uri: "https://azure-alerts/rules",
            description: "Metric alert rules and configurations.",
            tool: "get_alert_rules",
            arguments: json!({}),
        },
    ]
}

/// Category segment of a resource URI (the `host` of the pseudo-URL).
pub fn resource_category(uri: &str) -> Option<String> {
    url::Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_uris_are_unique_and_well_formed() {
        let catalog = resource_catalog();
        let mut seen = std::collections::HashSet::new();
        for entry in &catalog {
            assert!(seen.insert(entry.uri), "duplicate resource URI {}", entry.uri);
            let category = resource_category(entry.uri).expect("URI should parse");
            assert!(category.starts_with("azure-"), "unexpected category {}", category);
        }
    }
}
