use super::inventory::{
    self, query_resources, APP_SERVICES_QUERY, DATABASES_QUERY, DEFAULT_RESOURCES_QUERY,
    DEPENDENCIES_ADVANCED_QUERY, NETWORK_TOPOLOGY_QUERY, NSG_DETAILED_QUERY,
    RESOURCE_DEPENDENCIES_QUERY, STORAGE_ACCOUNTS_QUERY, UNUSED_RESOURCES_QUERY,
    VIRTUAL_MACHINES_QUERY,
};
use super::{graph_rows, metrics, monitoring, to_pretty};
use crate::azure::ApiFailure;
use crate::core::AppState;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

/// GraphML-style node from a positional Resource Graph inventory row.
pub fn graph_node(row: &Value) -> Value {
    json!({
        "id": row.get(0).cloned().unwrap_or(Value::Null),
        "name": row.get(1).cloned().unwrap_or(Value::Null),
        "type": row.get(2).cloned().unwrap_or(Value::Null),
        "resourceGroup": row.get(3).cloned().unwrap_or(Value::Null),
        "location": row.get(4).cloned().unwrap_or(Value::Null),
        "subscriptionId": row.get(5).cloned().unwrap_or(Value::Null),
        "tags": row.get(6).cloned().unwrap_or_else(|| json!({})),
        "properties": row.get(7).cloned().unwrap_or_else(|| json!({})),
    })
}

pub async fn export_resources_graphml(
    state: &AppState,
    include_network: bool,
    include_dependencies: bool,
) -> Result<String, ApiFailure> {
    let all_resources = query_resources(state, DEFAULT_RESOURCES_QUERY).await?;

    // TODO: derive edges from the NIC/subnet associations and dependency
    // projections below; today only nodes are emitted.
    if include_network {
        let _ = query_resources(state, NETWORK_TOPOLOGY_QUERY).await?;
    }
    if include_dependencies {
        let _ = query_resources(state, RESOURCE_DEPENDENCIES_QUERY).await?;
    }

    let nodes: Vec<Value> = graph_rows(&all_resources).iter().map(graph_node).collect();

    to_pretty(&json!({
        "format": "GraphML",
        "nodes": nodes,
        "edges": [],
        "metadata": {
            "subscription_id": state.config.subscription_id,
            "generated_at": Utc::now().to_rfc3339(),
            "include_network": include_network,
            "include_dependencies": include_dependencies,
        }
    }))
}

/// Unwrap a section result, or swap in a placeholder and record the tagged
/// failure envelope. A failed section never fails the whole report.
pub fn section(
    errors: &mut Vec<Value>,
    source: &str,
    result: Result<Value, ApiFailure>,
    placeholder: &str,
) -> Value {
    match result {
        Ok(value) => value,
        Err(failure) => {
            errors.push(failure.to_envelope_tagged(source));
            json!({"error": placeholder})
        }
    }
}

pub async fn get_comprehensive_architecture_data(state: &AppState) -> Result<String, ApiFailure> {
    let mut errors: Vec<Value> = Vec::new();

    info!("Getting resource groups...");
    let resource_groups = section(
        &mut errors,
        "resource_groups",
        inventory::resource_groups(state).await,
        "Failed to retrieve resource groups",
    );

    info!("Getting compute resources...");
    let virtual_machines = section(
        &mut errors,
        "virtual_machines",
        query_resources(state, VIRTUAL_MACHINES_QUERY).await,
        "Failed to retrieve VMs",
    );
    let app_services = section(
        &mut errors,
        "app_services",
        query_resources(state, APP_SERVICES_QUERY).await,
        "Failed to retrieve App Services",
    );

    info!("Getting networking data...");
    let topology = section(
        &mut errors,
        "network_topology",
        query_resources(state, NETWORK_TOPOLOGY_QUERY).await,
        "Failed to retrieve network topology",
    );
    let security_groups = section(
        &mut errors,
        "network_security_groups",
        query_resources(state, NSG_DETAILED_QUERY).await,
        "Failed to retrieve NSGs",
    );

    info!("Getting storage data...");
    let storage_accounts = section(
        &mut errors,
        "storage_accounts",
        query_resources(state, STORAGE_ACCOUNTS_QUERY).await,
        "Failed to retrieve storage accounts",
    );
    let databases = section(
        &mut errors,
        "databases",
        query_resources(state, DATABASES_QUERY).await,
        "Failed to retrieve databases",
    );

    info!("Getting dependencies...");
    let dependencies = section(
        &mut errors,
        "dependencies",
        query_resources(state, DEPENDENCIES_ADVANCED_QUERY).await,
        "Failed to retrieve dependencies",
    );

    info!(
        "Architecture data collection completed with {} errors",
        errors.len()
    );

    to_pretty(&json!({
        "metadata": {
            "subscription_id": state.config.subscription_id,
            "generated_at": Utc::now().to_rfc3339(),
            "data_scope": "comprehensive_architecture",
        },
        "resource_groups": resource_groups,
        "compute": {
            "virtual_machines": virtual_machines,
            "app_services": app_services,
        },
        "networking": {
            "topology": topology,
            "security_groups": security_groups,
        },
        "storage": {
            "storage_accounts": storage_accounts,
            "databases": databases,
        },
        "dependencies": dependencies,
        "errors": errors,
    }))
}

/// Unlike the architecture report, this aggregate treats any failing
/// sub-call as fatal for the whole summary.
pub async fn get_resource_utilization_summary(state: &AppState) -> Result<String, ApiFailure> {
    info!("Getting unused resources...");
    let unused_resources = query_resources(state, UNUSED_RESOURCES_QUERY).await?;

    info!("Getting advisor recommendations...");
    let advisor_recommendations = monitoring::advisor_detailed_value(state).await?;

    info!("Getting activity patterns...");
    let activity_patterns = monitoring::activity_analysis_value(state, 168).await?;

    info!("Getting VM performance metrics...");
    let vm_metrics = metrics::vm_metrics_value(state, None, "PT24H").await?;

    let total_potentially_unused = graph_rows(&unused_resources).len();
    let cost_optimization_opportunities = advisor_recommendations
        .get("value")
        .and_then(|v| v.as_array())
        .map(|recs| {
            recs.iter()
                .filter(|rec| {
                    rec.pointer("/properties/category").and_then(|c| c.as_str()) == Some("Cost")
                })
                .count()
        })
        .unwrap_or(0);

    to_pretty(&json!({
        "metadata": {
            "subscription_id": state.config.subscription_id,
            "generated_at": Utc::now().to_rfc3339(),
            "analysis_scope": "resource_utilization",
        },
        "unused_resources": unused_resources,
        "performance_issues": {
            "vm_metrics": vm_metrics,
        },
        "advisor_recommendations": advisor_recommendations,
        "activity_patterns": activity_patterns,
        "summary": {
            "total_potentially_unused": total_potentially_unused,
            "cost_optimization_opportunities": cost_optimization_opportunities,
            "performance_alerts": 0,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_node_maps_positional_cells() {
        let row = json!([
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1",
            "vm1",
            "Microsoft.Compute/virtualMachines",
            "rg",
            "westeurope",
            "s",
            {"env": "prod"},
            {"vmSize": "Standard_B2s"}
        ]);
        let node = graph_node(&row);
        assert_eq!(node["name"], "vm1");
        assert_eq!(node["resourceGroup"], "rg");
        assert_eq!(node["tags"]["env"], "prod");
    }

    #[test]
    fn graph_node_defaults_missing_tail_cells() {
        let node = graph_node(&json!(["/id", "name", "type", "rg", "loc", "sub"]));
        assert_eq!(node["tags"], json!({}));
        assert_eq!(node["properties"], json!({}));
    }

    #[test]
    fn failed_section_is_isolated_with_a_tagged_envelope() {
        let mut errors = Vec::new();
        let ok = section(&mut errors, "a", Ok(json!({"data": 1})), "Failed A");
        let failed = section(
            &mut errors,
            "b",
            Err(ApiFailure::Upstream {
                status: 500,
                body: "boom".to_string(),
            }),
            "Failed B",
        );

        assert_eq!(ok["data"], 1);
        assert_eq!(failed["error"], "Failed B");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["source"], "b");
        assert_eq!(errors[0]["status_code"], 500);
    }
}
