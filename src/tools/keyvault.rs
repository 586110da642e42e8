use super::security::tenant_graph_objects;
use super::{to_pretty, value_str};
use crate::azure::ApiFailure;
use crate::core::types::{CriticalVault, KeyVaultSecuritySummary, VaultAnalysis, VaultSecurityConfig};
use crate::core::AppState;
use serde_json::Value;
use std::collections::BTreeMap;

const KEY_VAULT_SECURITY_QUERY: &str = r#"
    Resources
    | where type == "microsoft.keyvault/vaults"
    | extend vaultUri = properties.vaultUri,
             enabledForDeployment = properties.enabledForDeployment,
             enabledForTemplateDeployment = properties.enabledForTemplateDeployment,
             enabledForDiskEncryption = properties.enabledForDiskEncryption,
             enableSoftDelete = properties.enableSoftDelete,
             softDeleteRetentionInDays = properties.softDeleteRetentionInDays,
             enablePurgeProtection = properties.enablePurgeProtection,
             publicNetworkAccess = properties.publicNetworkAccess,
             networkAcls = properties.networkAcls
    | project id, name, resourceGroup, location, subscriptionId,
             vaultUri, enabledForDeployment, enabledForTemplateDeployment,
             enabledForDiskEncryption, enableSoftDelete, softDeleteRetentionInDays,
             enablePurgeProtection, publicNetworkAccess, networkAcls
    | limit 1000
    "#;

/// A vault under this score lands in the critical list.
const CRITICAL_SCORE_THRESHOLD: i64 = 70;

fn flag(vault: &Value, key: &str) -> bool {
    vault.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Single-pass classifier over one vault row. Penalties are fixed weights,
/// evaluated independently and cumulatively; the score floors at 0 and the
/// issue list keeps evaluation order.
pub fn score_vault(vault: &Value) -> VaultAnalysis {
    let soft_delete_enabled = flag(vault, "enableSoftDelete");
    let purge_protection_enabled = flag(vault, "enablePurgeProtection");
    let public_network_access = value_str(vault, "publicNetworkAccess");
    let retention_days = vault
        .get("softDeleteRetentionInDays")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);

    let mut score: i64 = 100;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if !soft_delete_enabled {
        issues.push("Soft delete not enabled".to_string());
        recommendations.push("Enable soft delete for data protection".to_string());
        score -= 25;
    }

    if !purge_protection_enabled {
        issues.push("Purge protection not enabled".to_string());
        recommendations.push("Enable purge protection for critical vaults".to_string());
        score -= 20;
    }

    if public_network_access.to_lowercase() == "enabled" {
        issues.push("Public network access enabled".to_string());
        recommendations.push("Restrict network access using private endpoints".to_string());
        score -= 20;
    }

    if retention_days < 30 {
        issues.push(format!("Short retention period: {} days", retention_days));
        recommendations.push("Increase soft delete retention to at least 30 days".to_string());
        score -= 10;
    }

    VaultAnalysis {
        vault_name: value_str(vault, "name"),
        resource_group: value_str(vault, "resourceGroup"),
        subscription_id: value_str(vault, "subscriptionId"),
        location: value_str(vault, "location"),
        vault_uri: value_str(vault, "vaultUri"),
        security_config: VaultSecurityConfig {
            soft_delete_enabled,
            purge_protection_enabled,
            public_network_access,
            soft_delete_retention_days: retention_days,
        },
        security_score: score.max(0),
        security_issues: issues,
        recommendations,
    }
}

pub fn summarize_vaults(all_vaults: Vec<VaultAnalysis>) -> KeyVaultSecuritySummary {
    let average_security_score = if all_vaults.is_empty() {
        0.0
    } else {
        let total: i64 = all_vaults.iter().map(|v| v.security_score).sum();
        let mean = total as f64 / all_vaults.len() as f64;
        (mean * 100.0).round() / 100.0
    };

    let critical_vaults: Vec<CriticalVault> = all_vaults
        .iter()
        .filter(|v| v.security_score < CRITICAL_SCORE_THRESHOLD)
        .map(|v| CriticalVault {
            vault_name: v.vault_name.clone(),
            security_score: v.security_score,
            critical_issues: v.security_issues.clone(),
        })
        .collect();

    let mut common_issues: BTreeMap<String, usize> = BTreeMap::new();
    for vault in &all_vaults {
        for issue in &vault.security_issues {
            *common_issues.entry(issue.clone()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&String, &usize)> = common_issues.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let security_recommendations: Vec<String> = ranked
        .into_iter()
        .take(3)
        .map(|(issue, count)| format!("Address '{}' affecting {} vault(s)", issue, count))
        .collect();

    KeyVaultSecuritySummary {
        total_key_vaults: all_vaults.len(),
        average_security_score,
        vaults_with_issues: critical_vaults.len(),
        common_issues,
        security_recommendations,
        critical_vaults,
        all_vaults,
    }
}

pub async fn get_key_vault_security_status(state: &AppState) -> Result<String, ApiFailure> {
    let vaults = tenant_graph_objects(state, KEY_VAULT_SECURITY_QUERY).await?;
    let analyses: Vec<VaultAnalysis> = vaults.iter().map(score_vault).collect();
    to_pretty(&summarize_vaults(analyses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vault(
        soft_delete: bool,
        purge_protection: bool,
        public_access: &str,
        retention_days: i64,
    ) -> Value {
        json!({
            "name": "vault-a",
            "resourceGroup": "rg",
            "subscriptionId": "sub",
            "location": "westeurope",
            "vaultUri": "https://vault-a.vault.azure.net/",
            "enableSoftDelete": soft_delete,
            "enablePurgeProtection": purge_protection,
            "publicNetworkAccess": public_access,
            "softDeleteRetentionInDays": retention_days,
        })
    }

    #[test]
    fn fully_misconfigured_vault_scores_twenty_five() {
        let analysis = score_vault(&vault(false, false, "Enabled", 10));
        assert_eq!(analysis.security_score, 25);
        assert_eq!(
            analysis.security_issues,
            vec![
                "Soft delete not enabled",
                "Purge protection not enabled",
                "Public network access enabled",
                "Short retention period: 10 days",
            ]
        );
    }

    #[test]
    fn hardened_vault_keeps_a_full_score() {
        let analysis = score_vault(&vault(true, true, "Disabled", 90));
        assert_eq!(analysis.security_score, 100);
        assert!(analysis.security_issues.is_empty());
        assert!(analysis.recommendations.is_empty());
    }

    #[test]
    fn public_access_match_ignores_case() {
        let analysis = score_vault(&vault(true, true, "ENABLED", 90));
        assert_eq!(analysis.security_score, 80);
        assert_eq!(analysis.security_issues, vec!["Public network access enabled"]);
    }

    #[test]
    fn missing_fields_read_as_unprotected() {
        // No soft delete, no purge protection, zero retention; network access
        // unset does not count as public.
        let analysis = score_vault(&json!({"name": "bare"}));
        assert_eq!(analysis.security_score, 45);
        assert_eq!(analysis.security_issues.len(), 3);
        assert_eq!(analysis.security_issues[2], "Short retention period: 0 days");
    }

    #[test]
    fn summary_averages_and_flags_critical_vaults() {
        let good = score_vault(&vault(true, true, "Disabled", 90));
        let bad = score_vault(&vault(false, false, "Enabled", 10));
        let summary = summarize_vaults(vec![good, bad]);

        assert_eq!(summary.total_key_vaults, 2);
        assert_eq!(summary.average_security_score, 62.5);
        assert_eq!(summary.vaults_with_issues, 1);
        assert_eq!(summary.critical_vaults.len(), 1);
        assert_eq!(summary.critical_vaults[0].vault_name, "vault-a");
        assert_eq!(summary.common_issues["Soft delete not enabled"], 1);
        assert_eq!(summary.security_recommendations.len(), 3);
        assert!(summary.security_recommendations[0].contains("affecting 1 vault(s)"));
    }

    #[test]
    fn empty_estate_summarizes_cleanly() {
        let summary = summarize_vaults(Vec::new());
        assert_eq!(summary.total_key_vaults, 0);
        assert_eq!(summary.average_security_score, 0.0);
        assert!(summary.security_recommendations.is_empty());
    }
}
