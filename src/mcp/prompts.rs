use serde_json::Value;

/// Prompt templates are pure string builders: optional parameters in, a
/// natural-language instruction out. No network access.
#[derive(Clone, Debug)]
pub struct PromptCatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// Optional string parameters the template accepts.
    pub arguments: &'static [&'static str],
}

pub fn prompt_catalog() -> Vec<PromptCatalogEntry> {
    vec![
        PromptCatalogEntry {
            name: "analyze_costs",
            description: "Analyze Azure costs for a timeframe, optionally grouped.",
            arguments: &["timeframe", "group_by"],
        },
        PromptCatalogEntry {
            name: "budget_recommendations",
            description: "Suggest budget thresholds from spending patterns.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "cost_reduction",
            description: "Suggest specific cost-reduction opportunities.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "analyze_architecture",
            description: "Analyze the Azure architecture, optionally focused on one area.",
            arguments: &["focus"],
        },
        PromptCatalogEntry {
            name: "network_topology_analysis",
            description: "Analyze virtual networks, subnets, and connectivity.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "resource_optimization",
            description: "Recommend resource rightsizing and consolidation.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "performance_analysis",
            description: "Analyze resource performance, optionally per resource type.",
            arguments: &["resource_type"],
        },
        PromptCatalogEntry {
            name: "unused_resources_cleanup",
            description: "Identify unused resources safe to clean up.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "utilization_summary",
            description: "Summarize utilization with actionable insights.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "advisor_insights",
            description: "Prioritize Azure Advisor recommendations, optionally by category.",
            arguments: &["category"],
        },
        PromptCatalogEntry {
            name: "security_assessment",
            description: "Comprehensive security assessment, optionally focused.",
            arguments: &["focus_area"],
        },
        PromptCatalogEntry {
            name: "security_alerts_analysis",
            description: "Analyze security alerts and incidents with remediation guidance.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "defender_coverage_analysis",
            description: "Analyze Defender for Cloud coverage gaps.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "network_security_review",
            description: "Review NSGs, firewalls, and public exposure.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "keyvault_security_audit",
            description: "Audit Key Vault protection settings.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "security_compliance_review",
            description: "Review compliance posture, optionally against one standard.",
            arguments: &["standard"],
        },
        PromptCatalogEntry {
            name: "alerts_analysis",
            description: "Analyze alerts, optionally filtered by severity.",
            arguments: &["severity"],
        },
        PromptCatalogEntry {
            name: "performance_troubleshooting",
            description: "Troubleshoot performance with monitoring data.",
            arguments: &["resource_type"],
        },
        PromptCatalogEntry {
            name: "security_incident_response",
            description: "Incident response procedures for current incidents.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "threat_hunting",
            description: "Proactive threat hunting over Azure security data.",
            arguments: &[],
        },
        PromptCatalogEntry {
            name: "compliance_remediation",
            description: "Remediation roadmap from security assessments.",
            arguments: &["standard"],
        },
        PromptCatalogEntry {
            name: "alert_optimization",
            description: "Reduce alert noise and close monitoring gaps.",
            arguments: &[],
        },
    ]
}

fn arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

/// Render a prompt template by name. `None` when the name is unknown.
pub fn render_prompt(name: &str, arguments: &Value) -> Option<String> {
    let text = match name {
        "analyze_costs" => match (arg(arguments, "timeframe"), arg(arguments, "group_by")) {
            (Some(timeframe), Some(group_by)) => format!(
                "Please analyze my Azure costs for the timeframe '{}', grouped by '{}'. What insights can you provide about my spending patterns, and are there any anomalies or areas where I could optimize costs?",
                timeframe, group_by
            ),
            (Some(timeframe), None) => format!(
                "Please analyze my Azure costs for the timeframe '{}'. What insights can you provide about my spending patterns, and are there any anomalies or areas where I could optimize costs?",
                timeframe
            ),
            _ => "Please analyze my Azure costs. What insights can you provide about my spending patterns, and are there any anomalies or areas where I could optimize costs?".to_string(),
        },
        "budget_recommendations" => "Based on my Azure usage and spending patterns, what budget recommendations would you suggest? Please analyze my current spending and provide realistic budget thresholds for different resource categories.".to_string(),
        "cost_reduction" => "Please analyze my Azure billing data and suggest specific ways I could reduce costs. Identify resources that might be underutilized, oversized, or could benefit from reserved instances or savings plans.".to_string(),
        "analyze_architecture" => match arg(arguments, "focus") {
            Some(focus) => format!(
                "Please analyze my Azure architecture with a focus on '{}'. Examine the resources, their relationships, and provide insights about the current setup. Identify any potential improvements for reliability, security, performance, and cost optimization.",
                focus
            ),
            None => "Please analyze my Azure architecture. Examine all resources, their relationships, and provide insights about the current setup. Identify any potential improvements for reliability, security, performance, and cost optimization.".to_string(),
        },
        "network_topology_analysis" => "Please analyze my Azure network topology. Examine the virtual networks, subnets, network security groups, and connectivity patterns. Identify any security gaps, performance bottlenecks, or architectural improvements that could be made.".to_string(),
        "resource_optimization" => "Please analyze my Azure resources and provide optimization recommendations. Look for unused resources, oversized instances, missing best practices, and opportunities for consolidation or rightsizing.".to_string(),
        "performance_analysis" => match arg(arguments, "resource_type") {
            Some(resource_type) => format!(
                "Please analyze the performance of my Azure {} resources. Identify any performance bottlenecks, high utilization issues, or optimization opportunities. Focus on CPU, memory, disk I/O, and network metrics.",
                resource_type
            ),
            None => "Please analyze the performance of my Azure resources. Identify any performance bottlenecks, high utilization issues, or optimization opportunities across VMs, storage accounts, and databases.".to_string(),
        },
        "unused_resources_cleanup" => "Please identify unused or under-utilized Azure resources that could potentially be deleted to reduce costs. Look for stopped VMs, unattached disks, unused network interfaces, and resources with minimal activity. Provide specific recommendations for cleanup while considering data retention and business requirements.".to_string(),
        "utilization_summary" => "Please provide a comprehensive summary of my Azure resource utilization. Include performance metrics, usage patterns, cost optimization opportunities, and specific recommendations for improving efficiency. Focus on actionable insights that can reduce costs and improve performance.".to_string(),
        "advisor_insights" => match arg(arguments, "category") {
            Some(category) => format!(
                "Please analyze Azure Advisor recommendations specifically for '{}'. Provide detailed insights and prioritized action items based on the recommendations.",
                category
            ),
            None => "Please analyze all Azure Advisor recommendations. Categorize them by impact and effort, and provide a prioritized action plan for implementing these improvements.".to_string(),
        },
        "security_assessment" => match arg(arguments, "focus_area") {
            Some(focus_area) => format!(
                "Please conduct a comprehensive security assessment of my Azure environment with focus on '{}'. Identify security alerts, failed assessments, misconfigurations, and provide prioritized remediation steps.",
                focus_area
            ),
            None => "Please conduct a comprehensive security assessment of my Azure environment. Analyze security alerts, assessments, Defender for Cloud status, Key Vault configurations, and network security. Provide prioritized recommendations for improving security posture.".to_string(),
        },
        "security_alerts_analysis" => "Please analyze my Azure Security Center alerts and security incidents. Focus on critical and high-severity alerts, recent security events, and provide detailed remediation guidance for each type of security issue identified.".to_string(),
        "defender_coverage_analysis" => "Please analyze my Microsoft Defender for Cloud coverage across all subscriptions and resource types. Identify gaps in protection, recommend enabling Defender for critical services, and provide cost-benefit analysis for security coverage improvements.".to_string(),
        "network_security_review" => "Please review my Azure network security configurations including Network Security Groups, Azure Firewalls, and public IP exposure. Identify overly permissive rules, security gaps, and provide specific recommendations to improve network security posture.".to_string(),
        "keyvault_security_audit" => "Please audit my Azure Key Vault security configurations. Check for proper soft delete, purge protection, network access restrictions, and provide recommendations to improve secret management security across all Key Vaults.".to_string(),
        "security_compliance_review" => match arg(arguments, "standard") {
            Some(standard) => format!(
                "Please review my Azure security posture against '{}' compliance requirements. Analyze current assessments, identify compliance gaps, and provide a roadmap for achieving and maintaining '{}' compliance.",
                standard, standard
            ),
            None => "Please review my Azure security compliance status across all applicable standards. Identify failed controls, compliance gaps, and provide prioritized recommendations for improving overall compliance posture.".to_string(),
        },
        "alerts_analysis" => match arg(arguments, "severity") {
            Some(severity) => format!(
                "Please analyze my Azure alerts filtered by {} severity. Focus on active alerts, their root causes, and provide step-by-step remediation guidance. Include impact assessment and prevention strategies.",
                severity
            ),
            None => "Please analyze all my Azure alerts across the subscription. Categorize by severity and type, identify patterns, and provide comprehensive remediation guidance for critical issues. Include recommendations for alert optimization.".to_string(),
        },
        "performance_troubleshooting" => match arg(arguments, "resource_type") {
            Some(resource_type) => format!(
                "Please troubleshoot performance issues in my Azure {} resources. Analyze metrics, logs, and health status to identify bottlenecks, resource constraints, and optimization opportunities. Provide specific remediation steps.",
                resource_type
            ),
            None => "Please perform comprehensive performance troubleshooting across my Azure environment. Analyze Application Insights, Log Analytics, and resource health data to identify performance issues, bottlenecks, and provide actionable remediation steps.".to_string(),
        },
        "security_incident_response" => "Please analyze my Azure security incidents and alerts. Prioritize by severity and impact, provide detailed incident response procedures, remediation steps, and preventive measures. Include threat intelligence context where available.".to_string(),
        "threat_hunting" => "Please conduct proactive threat hunting across my Azure environment. Analyze security incidents, threat intelligence indicators, and security assessments to identify potential threats, IOCs, and attack patterns. Provide hunting queries and remediation strategies.".to_string(),
        "compliance_remediation" => match arg(arguments, "standard") {
            Some(standard) => format!(
                "Please analyze my Azure security posture for {} compliance. Review security assessments, identify compliance gaps, and provide detailed remediation roadmap with prioritized actions and timelines.",
                standard
            ),
            None => "Please analyze my Azure security compliance across all standards. Review secure score, regulatory compliance assessments, and provide comprehensive remediation plan to improve security posture and compliance ratings.".to_string(),
        },
        "alert_optimization" => "Please analyze my Azure alert rules and configurations. Identify noisy alerts, gaps in monitoring coverage, and opportunities for optimization. Provide recommendations for improving alert quality, reducing false positives, and ensuring critical issues are properly monitored.".to_string(),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_cataloged_prompt_renders() {
        for entry in prompt_catalog() {
            let text = render_prompt(entry.name, &json!({}))
                .unwrap_or_else(|| panic!("prompt {} did not render", entry.name));
            assert!(!text.is_empty());
        }
    }

    #[test]
    fn unknown_prompt_is_none() {
        assert!(render_prompt("nonexistent", &json!({})).is_none());
    }

    #[test]
    fn analyze_costs_substitutes_both_parameters() {
        let text = render_prompt(
            "analyze_costs",
            &json!({"timeframe": "TheLastMonth", "group_by": "ResourceGroup"}),
        )
        .unwrap();
        assert!(text.contains("'TheLastMonth'"));
        assert!(text.contains("grouped by 'ResourceGroup'"));
    }

    #[test]
    fn empty_string_parameter_falls_back_to_generic_wording() {
        let text = render_prompt("analyze_architecture", &json!({"focus": ""})).unwrap();
        assert!(text.starts_with("Please analyze my Azure architecture. Examine all resources"));
    }

    #[test]
    fn compliance_review_repeats_the_standard() {
        let text =
            render_prompt("security_compliance_review", &json!({"standard": "PCI DSS"})).unwrap();
        assert_eq!(text.matches("'PCI DSS'").count(), 2);
    }
}
