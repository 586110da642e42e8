use super::inventory::query_resources;
use super::{graph_rows, row_str, to_pretty};
use crate::azure::ApiFailure;
use crate::core::types::{
    DatabaseMetricsEntry, DatabaseMetricsSummary, StorageMetricsEntry, StorageMetricsSummary,
    VmMetricsEntry, VmMetricsSummary,
};
use crate::core::AppState;
use serde_json::Value;

const METRICS_API: &str = "2018-01-01";

const RUNNING_VMS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Compute/virtualMachines'
    | where properties.extended.instanceView.powerState.code =~ 'PowerState/running'
    | project id, name, resourceGroup, location, vmSize = properties.hardwareProfile.vmSize
    | limit 10
    "#;

const STORAGE_ACCOUNTS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Storage/storageAccounts'
    | project id, name, resourceGroup, location, sku = properties.sku.name
    | limit 10
    "#;

const DATABASES_QUERY: &str = r#"
    Resources
    | where type in~ ('Microsoft.Sql/servers/databases', 'Microsoft.DocumentDB/databaseAccounts')
    | project id, name, type, resourceGroup, location
    | limit 10
    "#;

fn metrics_endpoint(resource_id: &str) -> String {
    format!("{}/providers/Microsoft.Insights/metrics", resource_id)
}

async fn fetch_metrics(
    state: &AppState,
    resource_id: &str,
    metric_names: &str,
    timespan: &str,
    interval: &str,
    aggregation: &str,
) -> Result<Value, ApiFailure> {
    state
        .arm
        .get(
            &metrics_endpoint(resource_id),
            &[
                ("api-version", METRICS_API.to_string()),
                ("metricnames", metric_names.to_string()),
                ("timespan", timespan.to_string()),
                ("interval", interval.to_string()),
                ("aggregation", aggregation.to_string()),
            ],
        )
        .await
}

// ---------------------------------------------------------------------------
// Fan-out summaries. Sub-call failures are dropped per item: only successful
// probes appear in the list, and only those advance the counter. The summary
// itself always succeeds.
// ---------------------------------------------------------------------------

pub fn summarize_vm_metrics(
    timespan: &str,
    probes: Vec<(String, String, Result<Value, ApiFailure>)>,
) -> VmMetricsSummary {
    let mut summary = VmMetricsSummary {
        timespan: timespan.to_string(),
        vm_metrics: Vec::new(),
        summary: Default::default(),
    };
    for (vm_id, vm_name, result) in probes {
        if let Ok(metrics) = result {
            summary.vm_metrics.push(VmMetricsEntry {
                vm_id,
                vm_name,
                metrics,
            });
            summary.summary.total_vms += 1;
        }
    }
    summary
}

pub fn summarize_storage_metrics(
    timespan: &str,
    probes: Vec<(String, String, Result<Value, ApiFailure>)>,
) -> StorageMetricsSummary {
    let mut summary = StorageMetricsSummary {
        timespan: timespan.to_string(),
        storage_metrics: Vec::new(),
        summary: Default::default(),
    };
    for (storage_id, storage_name, result) in probes {
        if let Ok(metrics) = result {
            summary.storage_metrics.push(StorageMetricsEntry {
                storage_id,
                storage_name,
                metrics,
            });
            summary.summary.total_accounts += 1;
        }
    }
    summary
}

pub fn summarize_database_metrics(
    timespan: &str,
    probes: Vec<(String, String, String, Result<Value, ApiFailure>)>,
) -> DatabaseMetricsSummary {
    let mut summary = DatabaseMetricsSummary {
        timespan: timespan.to_string(),
        database_metrics: Vec::new(),
        summary: Default::default(),
    };
    for (database_id, database_name, database_type, result) in probes {
        if let Ok(metrics) = result {
            summary.database_metrics.push(DatabaseMetricsEntry {
                database_id,
                database_name,
                database_type,
                metrics,
            });
            summary.summary.total_databases += 1;
        }
    }
    summary
}

/// SQL databases and Cosmos accounts expose disjoint metric namespaces.
pub fn database_metric_names(database_type: &str) -> &'static str {
    if database_type.contains("Microsoft.Sql") {
        "cpu_percent,dtu_consumption_percent,connection_successful,storage_percent"
    } else {
        "TotalRequestUnits,ProvisionedThroughput,DocumentCount,DataUsage"
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

pub async fn vm_metrics_value(
    state: &AppState,
    vm_resource_id: Option<String>,
    timespan: &str,
) -> Result<Value, ApiFailure> {
    if let Some(vm_resource_id) = vm_resource_id {
        return fetch_metrics(
            state,
            &vm_resource_id,
            "Percentage CPU,Available Memory Bytes,Disk Read Bytes/sec,Disk Write Bytes/sec,Network In Total,Network Out Total",
            timespan,
            "PT1M",
            "Average,Maximum",
        )
        .await;
    }

    let vms = query_resources(state, RUNNING_VMS_QUERY).await?;
    let mut probes = Vec::new();
    for row in graph_rows(&vms) {
        let vm_id = row_str(&row, 0);
        let vm_name = row_str(&row, 1);
        // One probe at a time; a slow VM delays the rest rather than racing them.
        let result = fetch_metrics(state, &vm_id, "Percentage CPU", timespan, "PT5M", "Average,Maximum").await;
        probes.push((vm_id, vm_name, result));
    }
    let summary = summarize_vm_metrics(timespan, probes);
    serde_json::to_value(summary).map_err(|e| ApiFailure::Shaping(e.to_string()))
}

pub async fn get_vm_performance_metrics(
    state: &AppState,
    vm_resource_id: Option<String>,
    timespan: Option<String>,
) -> Result<String, ApiFailure> {
    let timespan = timespan.unwrap_or_else(|| "PT1H".to_string());
    to_pretty(&vm_metrics_value(state, vm_resource_id, &timespan).await?)
}

pub async fn get_storage_performance_metrics(
    state: &AppState,
    storage_account_id: Option<String>,
    timespan: Option<String>,
) -> Result<String, ApiFailure> {
    let timespan = timespan.unwrap_or_else(|| "PT24H".to_string());

    if let Some(storage_account_id) = storage_account_id {
        let result = fetch_metrics(
            state,
            &storage_account_id,
            "Transactions,UsedCapacity,Availability,SuccessServerLatency,SuccessE2ELatency",
            &timespan,
            "PT1H",
            "Total,Average,Maximum",
        )
        .await?;
        return to_pretty(&result);
    }

    let accounts = query_resources(state, STORAGE_ACCOUNTS_QUERY).await?;
    let mut probes = Vec::new();
    for row in graph_rows(&accounts) {
        let storage_id = row_str(&row, 0);
        let storage_name = row_str(&row, 1);
        let result = fetch_metrics(
            state,
            &storage_id,
            "Transactions,UsedCapacity,Availability",
            &timespan,
            "PT1H",
            "Total,Average",
        )
        .await;
        probes.push((storage_id, storage_name, result));
    }
    to_pretty(&summarize_storage_metrics(&timespan, probes))
}

pub async fn get_database_performance_metrics(
    state: &AppState,
    database_id: Option<String>,
    timespan: Option<String>,
) -> Result<String, ApiFailure> {
    let timespan = timespan.unwrap_or_else(|| "PT24H".to_string());

    if let Some(database_id) = database_id {
        let result = fetch_metrics(
            state,
            &database_id,
            "cpu_percent,dtu_consumption_percent,connection_successful,storage_percent,blocked_by_firewall",
            &timespan,
            "PT1H",
            "Average,Maximum,Total",
        )
        .await?;
        return to_pretty(&result);
    }

    let databases = query_resources(state, DATABASES_QUERY).await?;
    let mut probes = Vec::new();
    for row in graph_rows(&databases) {
        let database_id = row_str(&row, 0);
        let database_name = row_str(&row, 1);
        let database_type = row_str(&row, 2);
        let result = fetch_metrics(
            state,
            &database_id,
            database_metric_names(&database_type),
            &timespan,
            "PT1H",
            "Average,Maximum",
        )
        .await;
        probes.push((database_id, database_name, database_type, result));
    }
    to_pretty(&summarize_database_metrics(&timespan, probes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fan_out_keeps_only_successful_probes() {
        let probes = vec![
            ("/vm/1".to_string(), "vm1".to_string(), Ok(json!({"value": []}))),
            (
                "/vm/2".to_string(),
                "vm2".to_string(),
                Err(ApiFailure::Transport("connection reset".to_string())),
            ),
            ("/vm/3".to_string(), "vm3".to_string(), Ok(json!({"value": []}))),
            (
                "/vm/4".to_string(),
                "vm4".to_string(),
                Err(ApiFailure::Transport("timeout".to_string())),
            ),
            ("/vm/5".to_string(), "vm5".to_string(), Ok(json!({"value": []}))),
        ];

        let summary = summarize_vm_metrics("PT24H", probes);
        assert_eq!(summary.summary.total_vms, 3);
        assert_eq!(summary.vm_metrics.len(), 3);
        let names: Vec<&str> = summary.vm_metrics.iter().map(|m| m.vm_name.as_str()).collect();
        assert_eq!(names, vec!["vm1", "vm3", "vm5"]);
    }

    #[test]
    fn empty_fan_out_is_still_a_success_payload() {
        let summary = summarize_storage_metrics("PT24H", Vec::new());
        assert_eq!(summary.summary.total_accounts, 0);
        assert!(summary.storage_metrics.is_empty());
    }

    #[test]
    fn sql_and_cosmos_use_different_metric_sets() {
        assert!(database_metric_names("Microsoft.Sql/servers/databases").contains("dtu_consumption_percent"));
        assert!(database_metric_names("Microsoft.DocumentDB/databaseAccounts").contains("TotalRequestUnits"));
    }
}
