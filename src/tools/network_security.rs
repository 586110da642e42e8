use super::security::tenant_graph_objects;
use super::{to_pretty, value_str};
use crate::azure::ApiFailure;
use crate::core::types::{
    FirewallAnalysis, NetworkSecurityOverview, NetworkSecuritySummary, NsgAnalysis,
    PublicIpAnalysis, RiskyRule, SecurityRisk,
};
use crate::core::AppState;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const NSG_RULES_QUERY: &str = r#"
    Resources
    | where type == "microsoft.network/networksecuritygroups"
    | extend rules = properties.securityRules
    | project id, name, resourceGroup, location, subscriptionId, rules
    | limit 500
    "#;

const FIREWALL_QUERY: &str = r#"
    Resources
    | where type == "microsoft.network/azurefirewalls"
    | extend firewallPolicy = properties.firewallPolicy,
             threatIntelMode = properties.threatIntelMode,
             sku = properties.sku
    | project id, name, resourceGroup, location, subscriptionId, firewallPolicy, threatIntelMode, sku
    | limit 100
    "#;

const PUBLIC_IP_QUERY: &str = r#"
    Resources
    | where type == "microsoft.network/publicipaddresses"
    | extend ipAddress = properties.ipAddress,
             associatedResource = properties.ipConfiguration.id
    | project id, name, resourceGroup, location, subscriptionId, ipAddress, associatedResource
    | limit 500
    "#;

/// Ports that should never face the open internet.
const RISKY_PORTS: [&str; 6] = ["22", "3389", "1433", "3306", "5432", "27017"];

/// Classify one NSG rule. `None` for rules that carry no recognized risk.
pub fn classify_rule(rule: &Value) -> Option<RiskyRule> {
    let props = rule.get("properties").cloned().unwrap_or_else(|| json!({}));
    let source = value_str(&props, "sourceAddressPrefix");
    let destination_port = value_str(&props, "destinationPortRange");
    let protocol = value_str(&props, "protocol");
    let access = value_str(&props, "access");
    let direction = value_str(&props, "direction");

    let mut risk_level = "Low";
    let mut risk_reasons = Vec::new();

    if source == "*" && access.eq_ignore_ascii_case("allow") && direction.eq_ignore_ascii_case("inbound")
    {
        risk_level = "High";
        risk_reasons.push("Allows traffic from any source".to_string());
    }

    if destination_port == "*" && access.eq_ignore_ascii_case("allow") {
        risk_level = if risk_level == "Low" { "Medium" } else { "High" };
        risk_reasons.push("Allows traffic to any port".to_string());
    }

    if RISKY_PORTS.iter().any(|port| destination_port.contains(port)) && source == "*" {
        risk_level = "High";
        risk_reasons.push(format!(
            "Exposes sensitive port {} to internet",
            destination_port
        ));
    }

    if risk_level == "Low" {
        return None;
    }

    Some(RiskyRule {
        rule_name: value_str(rule, "name"),
        risk_level: risk_level.to_string(),
        risk_reasons,
        source,
        destination_port,
        protocol,
        access,
        direction,
    })
}

/// Score one NSG: 100 baseline, −20 per High rule, −10 per Medium, floor 0.
pub fn analyze_nsg(nsg: &Value) -> NsgAnalysis {
    let rules = nsg
        .get("rules")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();

    let mut risky_rules = Vec::new();
    let mut score: i64 = 100;
    for rule in &rules {
        if let Some(risky) = classify_rule(rule) {
            score -= match risky.risk_level.as_str() {
                "High" => 20,
                _ => 10,
            };
            risky_rules.push(risky);
        }
    }

    let mut recommendations = Vec::new();
    if !risky_rules.is_empty() {
        recommendations.push("Review and restrict overly permissive rules".to_string());
    }
    if risky_rules.iter().any(|r| r.risk_level == "High") {
        recommendations
            .push("Immediately address high-risk rules exposing sensitive ports".to_string());
    }

    NsgAnalysis {
        nsg_name: value_str(nsg, "name"),
        resource_group: value_str(nsg, "resourceGroup"),
        subscription_id: value_str(nsg, "subscriptionId"),
        total_rules: rules.len(),
        risky_rules,
        security_score: score.max(0),
        recommendations,
    }
}

fn has_firewall_policy(firewall: &Value) -> bool {
    match firewall.get("firewallPolicy") {
        Some(Value::Null) | None => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Firewalls start from a baseline of 80.
pub fn analyze_firewall(firewall: &Value) -> FirewallAnalysis {
    let threat_intel_mode = value_str(firewall, "threatIntelMode");
    let has_policy = has_firewall_policy(firewall);

    let mut score: i64 = 80;
    let mut recommendations = Vec::new();

    if threat_intel_mode.to_lowercase() != "alert" {
        recommendations.push("Enable threat intelligence alerting".to_string());
        score -= 10;
    }
    if !has_policy {
        recommendations.push("Configure firewall policy for centralized management".to_string());
        score -= 15;
    }

    FirewallAnalysis {
        firewall_name: value_str(firewall, "name"),
        resource_group: value_str(firewall, "resourceGroup"),
        subscription_id: value_str(firewall, "subscriptionId"),
        threat_intel_mode,
        has_policy,
        sku: firewall.get("sku").cloned().unwrap_or_else(|| json!({})),
        security_score: score,
        recommendations,
    }
}

pub fn analyze_public_ips(public_ips: &[Value]) -> PublicIpAnalysis {
    let associated = public_ips
        .iter()
        .filter(|ip| {
            ip.get("associatedResource")
                .map(|v| !v.is_null() && v.as_str().map(|s| !s.is_empty()).unwrap_or(true))
                .unwrap_or(false)
        })
        .count();
    let unassociated = public_ips.len() - associated;

    let mut recommendations = Vec::new();
    if unassociated > 0 {
        recommendations.push(format!("Remove {} unused public IP addresses", unassociated));
    }

    PublicIpAnalysis {
        total_public_ips: public_ips.len(),
        associated_resources: associated,
        unassociated_ips: unassociated,
        recommendations,
    }
}

pub fn summarize_network_security(
    nsg_analysis: Vec<NsgAnalysis>,
    firewall_analysis: Vec<FirewallAnalysis>,
    public_ip_analysis: PublicIpAnalysis,
) -> NetworkSecuritySummary {
    let security_risks: Vec<SecurityRisk> = nsg_analysis
        .iter()
        .filter(|nsg| nsg.security_score < 70)
        .map(|nsg| SecurityRisk {
            resource_type: "NSG".to_string(),
            resource_name: nsg.nsg_name.clone(),
            security_score: nsg.security_score,
            risk_count: nsg.risky_rules.len(),
        })
        .collect();

    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for recommendation in nsg_analysis
        .iter()
        .flat_map(|n| n.recommendations.iter())
        .chain(firewall_analysis.iter().flat_map(|f| f.recommendations.iter()))
        .chain(public_ip_analysis.recommendations.iter())
    {
        *tally.entry(recommendation.clone()).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = tally.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(5);

    NetworkSecuritySummary {
        network_security_overview: NetworkSecurityOverview {
            total_nsgs: nsg_analysis.len(),
            nsgs_with_risks: nsg_analysis.iter().filter(|n| n.security_score < 80).count(),
            total_firewalls: firewall_analysis.len(),
            total_public_ips: public_ip_analysis.total_public_ips,
        },
        security_risks,
        nsg_analysis,
        firewall_analysis,
        public_ip_analysis,
        top_recommendations: ranked,
    }
}

pub async fn get_network_security_analysis(state: &AppState) -> Result<String, ApiFailure> {
    // Each inventory query degrades to an empty list on failure; the analysis
    // covers whatever could be fetched.
    let nsgs = tenant_graph_objects(state, NSG_RULES_QUERY).await.unwrap_or_default();
    let firewalls = tenant_graph_objects(state, FIREWALL_QUERY).await.unwrap_or_default();
    let public_ips = tenant_graph_objects(state, PUBLIC_IP_QUERY).await.unwrap_or_default();

    let nsg_analysis: Vec<NsgAnalysis> = nsgs.iter().map(analyze_nsg).collect();
    let firewall_analysis: Vec<FirewallAnalysis> = firewalls.iter().map(analyze_firewall).collect();
    let public_ip_analysis = analyze_public_ips(&public_ips);

    to_pretty(&summarize_network_security(
        nsg_analysis,
        firewall_analysis,
        public_ip_analysis,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(source: &str, port: &str, access: &str, direction: &str) -> Value {
        json!({
            "name": "rule-1",
            "properties": {
                "sourceAddressPrefix": source,
                "destinationPortRange": port,
                "protocol": "Tcp",
                "access": access,
                "direction": direction,
            }
        })
    }

    #[test]
    fn open_inbound_rule_is_high_risk() {
        let risky = classify_rule(&rule("*", "443", "Allow", "Inbound")).unwrap();
        assert_eq!(risky.risk_level, "High");
        assert_eq!(risky.risk_reasons, vec!["Allows traffic from any source"]);
    }

    #[test]
    fn wildcard_port_alone_is_medium_risk() {
        let risky = classify_rule(&rule("10.0.0.0/8", "*", "Allow", "Inbound")).unwrap();
        assert_eq!(risky.risk_level, "Medium");
        assert_eq!(risky.risk_reasons, vec!["Allows traffic to any port"]);
    }

    #[test]
    fn open_source_and_wildcard_port_compound_to_high() {
        let risky = classify_rule(&rule("*", "*", "Allow", "Inbound")).unwrap();
        assert_eq!(risky.risk_level, "High");
        assert_eq!(
            risky.risk_reasons,
            vec!["Allows traffic from any source", "Allows traffic to any port"]
        );
    }

    #[test]
    fn ssh_exposed_to_internet_is_high_risk() {
        let risky = classify_rule(&rule("*", "22", "Allow", "Outbound")).unwrap();
        assert_eq!(risky.risk_level, "High");
        assert!(risky
            .risk_reasons
            .contains(&"Exposes sensitive port 22 to internet".to_string()));
    }

    #[test]
    fn scoped_rule_carries_no_risk() {
        assert!(classify_rule(&rule("10.0.0.0/24", "8080", "Allow", "Inbound")).is_none());
        assert!(classify_rule(&rule("*", "443", "Deny", "Inbound")).is_none());
    }

    #[test]
    fn nsg_score_deducts_per_risky_rule_and_floors_at_zero() {
        let rules: Vec<Value> = (0..6).map(|_| rule("*", "3389", "Allow", "Inbound")).collect();
        let nsg = json!({
            "name": "nsg-open",
            "resourceGroup": "rg",
            "subscriptionId": "sub",
            "rules": rules,
        });
        let analysis = analyze_nsg(&nsg);
        assert_eq!(analysis.total_rules, 6);
        assert_eq!(analysis.risky_rules.len(), 6);
        assert_eq!(analysis.security_score, 0);
        assert_eq!(
            analysis.recommendations,
            vec![
                "Review and restrict overly permissive rules",
                "Immediately address high-risk rules exposing sensitive ports",
            ]
        );
    }

    #[test]
    fn firewall_deductions_compound_from_eighty() {
        let bare = analyze_firewall(&json!({"name": "fw", "threatIntelMode": "Off"}));
        assert_eq!(bare.security_score, 55);
        assert_eq!(bare.recommendations.len(), 2);

        let tuned = analyze_firewall(&json!({
            "name": "fw",
            "threatIntelMode": "Alert",
            "firewallPolicy": {"id": "/policies/p1"},
        }));
        assert_eq!(tuned.security_score, 80);
        assert!(tuned.recommendations.is_empty());
    }

    #[test]
    fn unassociated_public_ips_get_a_cleanup_recommendation() {
        let ips = vec![
            json!({"name": "ip1", "associatedResource": "/nic/1"}),
            json!({"name": "ip2", "associatedResource": null}),
            json!({"name": "ip3"}),
        ];
        let analysis = analyze_public_ips(&ips);
        assert_eq!(analysis.associated_resources, 1);
        assert_eq!(analysis.unassociated_ips, 2);
        assert_eq!(analysis.recommendations, vec!["Remove 2 unused public IP addresses"]);
    }

    #[test]
    fn summary_ranks_recommendations_by_occurrence() {
        let nsgs: Vec<NsgAnalysis> = (0..3)
            .map(|i| {
                analyze_nsg(&json!({
                    "name": format!("nsg-{}", i),
                    "rules": [
                        rule("*", "1433", "Allow", "Inbound"),
                        rule("*", "3389", "Allow", "Inbound"),
                    ],
                }))
            })
            .collect();
        let summary = summarize_network_security(nsgs, Vec::new(), analyze_public_ips(&[]));

        assert_eq!(summary.network_security_overview.total_nsgs, 3);
        assert_eq!(summary.network_security_overview.nsgs_with_risks, 3);
        // Two high-risk rules put each NSG at 60, under the 70 risk line.
        assert_eq!(summary.security_risks.len(), 3);
        assert_eq!(summary.security_risks[0].risk_count, 2);
        assert_eq!(summary.top_recommendations[0].1, 3);
    }
}
