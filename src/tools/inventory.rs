use super::{graph_rows, row_str, to_pretty};
use crate::azure::ApiFailure;
use crate::core::AppState;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Resource Graph plumbing
// ---------------------------------------------------------------------------

pub const RESOURCE_GRAPH_ENDPOINT: &str = "/providers/Microsoft.ResourceGraph/resources";
pub const RESOURCE_GRAPH_API: &str = "2021-03-01";

/// Resource Graph query scoped to the configured subscription.
pub async fn query_resources(state: &AppState, query: &str) -> Result<Value, ApiFailure> {
    let body = json!({
        "subscriptions": [state.config.subscription_id],
        "query": query,
    });
    state
        .arm
        .post(
            RESOURCE_GRAPH_ENDPOINT,
            &[("api-version", RESOURCE_GRAPH_API.to_string())],
            &body,
        )
        .await
}

/// Tenant-wide Resource Graph query (no subscription scoping). Used by the
/// security analyzers, which read the object-array result shape.
pub async fn query_resources_tenant(state: &AppState, query: &str) -> Result<Value, ApiFailure> {
    let body = json!({"query": query});
    state
        .arm
        .post(
            RESOURCE_GRAPH_ENDPOINT,
            &[("api-version", RESOURCE_GRAPH_API.to_string())],
            &body,
        )
        .await
}

// ---------------------------------------------------------------------------
// Canned KQL
// ---------------------------------------------------------------------------

pub const DEFAULT_RESOURCES_QUERY: &str = r#"
    Resources
    | project id, name, type, resourceGroup, location, subscriptionId, tags, properties
    | limit 1000
    "#;

pub const NETWORK_TOPOLOGY_QUERY: &str = r#"
    Resources
    | where type in~ (
        'Microsoft.Network/virtualNetworks',
        'Microsoft.Network/virtualNetworkPeerings',
        'Microsoft.Network/networkSecurityGroups',
        'Microsoft.Network/networkInterfaces',
        'Microsoft.Network/publicIPAddresses',
        'Microsoft.Network/loadBalancers',
        'Microsoft.Network/applicationGateways',
        'Microsoft.Network/virtualNetworkGateways',
        'Microsoft.Network/routeTables'
    )
    | project id, name, type, resourceGroup, location, properties
    "#;

const COMPUTE_RESOURCES_QUERY: &str = r#"
    Resources
    | where type in~ (
        'Microsoft.Compute/virtualMachines',
        'Microsoft.Compute/virtualMachineScaleSets',
        'Microsoft.Web/sites',
        'Microsoft.Web/serverFarms',
        'Microsoft.ContainerInstance/containerGroups',
        'Microsoft.ContainerService/managedClusters',
        'Microsoft.Batch/batchAccounts'
    )
    | project id, name, type, resourceGroup, location, properties
    "#;

const STORAGE_RESOURCES_QUERY: &str = r#"
    Resources
    | where type in~ (
        'Microsoft.Storage/storageAccounts',
        'Microsoft.Sql/servers',
        'Microsoft.Sql/servers/databases',
        'Microsoft.DocumentDB/databaseAccounts',
        'Microsoft.Cache/Redis',
        'Microsoft.DBforPostgreSQL/servers',
        'Microsoft.DBforMySQL/servers'
    )
    | project id, name, type, resourceGroup, location, properties
    "#;

pub const RESOURCE_DEPENDENCIES_QUERY: &str = r#"
    Resources
    | extend dependencies = properties.dependencies
    | project id, name, type, resourceGroup, dependencies, properties
    | where isnotempty(dependencies) or isnotempty(properties.networkProfile) or isnotempty(properties.subnets)
    "#;

const RESOURCE_HIERARCHY_QUERY: &str = r#"
    Resources
    | summarize Resources = make_list(pack('name', name, 'type', type, 'id', id, 'location', location, 'tags', tags)) by resourceGroup, subscriptionId
    | project subscriptionId, resourceGroup, ResourceCount = array_length(Resources), Resources
    | order by resourceGroup asc
    "#;

const NETWORK_CONNECTIONS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Network/networkInterfaces'
    | extend vmId = tostring(properties.virtualMachine.id)
    | extend subnetId = tostring(properties.ipConfigurations[0].properties.subnet.id)
    | extend privateIP = tostring(properties.ipConfigurations[0].properties.privateIPAddress)
    | extend publicIPId = tostring(properties.ipConfigurations[0].properties.publicIPAddress.id)
    | project id, name, vmId, subnetId, privateIP, publicIPId, resourceGroup, location
    | union (
        Resources
        | where type =~ 'Microsoft.Network/virtualNetworks'
        | extend subnets = properties.subnets
        | mvexpand subnets
        | extend subnetName = tostring(subnets.name)
        | extend subnetId = tostring(subnets.id)
        | extend addressPrefix = tostring(subnets.properties.addressPrefix)
        | project vnetId = id, vnetName = name, subnetId, subnetName, addressPrefix, resourceGroup, location, type = 'subnet'
    )
    "#;

pub const NSG_DETAILED_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Network/networkSecurityGroups'
    | extend securityRules = properties.securityRules
    | extend defaultSecurityRules = properties.defaultSecurityRules
    | extend networkInterfaces = properties.networkInterfaces
    | extend subnets = properties.subnets
    | project id, name, resourceGroup, location, securityRules, defaultSecurityRules, networkInterfaces, subnets
    "#;

const LOAD_BALANCERS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Network/loadBalancers'
    | extend frontendIPConfigurations = properties.frontendIPConfigurations
    | extend backendAddressPools = properties.backendAddressPools
    | extend loadBalancingRules = properties.loadBalancingRules
    | extend probes = properties.probes
    | extend inboundNatRules = properties.inboundNatRules
    | project id, name, resourceGroup, location, frontendIPConfigurations, backendAddressPools, loadBalancingRules, probes, inboundNatRules
    "#;

pub const VIRTUAL_MACHINES_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Compute/virtualMachines'
    | extend vmSize = properties.hardwareProfile.vmSize
    | extend osType = properties.storageProfile.osDisk.osType
    | extend networkProfile = properties.networkProfile
    | extend availabilitySet = properties.availabilitySet
    | extend diagnosticsProfile = properties.diagnosticsProfile
    | extend powerState = properties.extended.instanceView.powerState.code
    | project id, name, resourceGroup, location, vmSize, osType, networkProfile, availabilitySet, diagnosticsProfile, powerState, tags
    "#;

pub const APP_SERVICES_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Web/sites'
    | extend appKind = kind
    | extend serverFarmId = properties.serverFarmId
    | extend defaultHostName = properties.defaultHostName
    | extend enabledHostNames = properties.enabledHostNames
    | extend httpsOnly = properties.httpsOnly
    | extend siteConfig = properties.siteConfig
    | project id, name, resourceGroup, location, appKind, serverFarmId, defaultHostName, enabledHostNames, httpsOnly, siteConfig, tags
    "#;

pub const DATABASES_QUERY: &str = r#"
    Resources
    | where type in~ (
        'Microsoft.Sql/servers/databases',
        'Microsoft.DocumentDB/databaseAccounts',
        'Microsoft.DBforPostgreSQL/servers',
        'Microsoft.DBforMySQL/servers',
        'Microsoft.Cache/Redis'
    )
    | extend tier = properties.sku.tier
    | extend capacity = properties.sku.capacity
    | extend family = properties.sku.family
    | extend connectionString = properties.connectionString
    | extend firewallRules = properties.firewallRules
    | project id, name, type, resourceGroup, location, tier, capacity, family, connectionString, firewallRules, tags
    "#;

pub const STORAGE_ACCOUNTS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Storage/storageAccounts'
    | extend sku = properties.sku
    | extend accessTier = properties.accessTier
    | extend supportsHttpsTrafficOnly = properties.supportsHttpsTrafficOnly
    | extend allowBlobPublicAccess = properties.allowBlobPublicAccess
    | extend minimumTlsVersion = properties.minimumTlsVersion
    | extend primaryEndpoints = properties.primaryEndpoints
    | extend networkAcls = properties.networkAcls
    | project id, name, resourceGroup, location, sku, accessTier, supportsHttpsTrafficOnly, allowBlobPublicAccess, minimumTlsVersion, primaryEndpoints, networkAcls, tags
    "#;

const KEY_VAULTS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.KeyVault/vaults'
    | extend sku = properties.sku
    | extend accessPolicies = properties.accessPolicies
    | extend networkAcls = properties.networkAcls
    | extend enabledForDeployment = properties.enabledForDeployment
    | extend enabledForTemplateDeployment = properties.enabledForTemplateDeployment
    | extend enabledForDiskEncryption = properties.enabledForDiskEncryption
    | project id, name, resourceGroup, location, sku, accessPolicies, networkAcls, enabledForDeployment, enabledForTemplateDeployment, enabledForDiskEncryption, tags
    "#;

const DIAGNOSTIC_SETTINGS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Insights/diagnosticSettings'
    | extend targetResourceId = properties.targetResourceId
    | extend logs = properties.logs
    | extend metrics = properties.metrics
    | extend workspaceId = properties.workspaceId
    | extend storageAccountId = properties.storageAccountId
    | project id, name, targetResourceId, logs, metrics, workspaceId, storageAccountId
    "#;

pub const DEPENDENCIES_ADVANCED_QUERY: &str = r#"
    Resources
    | extend networkProfile = properties.networkProfile
    | extend storageProfile = properties.storageProfile
    | extend dependsOn = properties.dependsOn
    | extend linkedServices = properties.linkedServices
    | extend serverFarmId = properties.serverFarmId
    | extend subnetId = tostring(properties.ipConfigurations[0].properties.subnet.id)
    | extend loadBalancerId = tostring(properties.loadBalancer.id)
    | extend networkSecurityGroupId = tostring(properties.networkSecurityGroup.id)
    | extend routeTableId = tostring(properties.routeTable.id)
    | where isnotempty(networkProfile) or isnotempty(storageProfile) or isnotempty(dependsOn) or isnotempty(linkedServices) or isnotempty(serverFarmId) or isnotempty(subnetId) or isnotempty(loadBalancerId) or isnotempty(networkSecurityGroupId) or isnotempty(routeTableId)
    | project id, name, type, resourceGroup, location, networkProfile, storageProfile, dependsOn, linkedServices, serverFarmId, subnetId, loadBalancerId, networkSecurityGroupId, routeTableId
    "#;

pub const UNUSED_RESOURCES_QUERY: &str = r#"
    Resources
    | where type in~ (
        'Microsoft.Compute/virtualMachines',
        'Microsoft.Network/publicIPAddresses',
        'Microsoft.Compute/disks',
        'Microsoft.Network/networkInterfaces',
        'Microsoft.Storage/storageAccounts'
    )
    | extend resourceDetails = case(
        type =~ 'Microsoft.Compute/virtualMachines',
            pack('powerState', properties.extended.instanceView.powerState.displayStatus, 'vmSize', properties.hardwareProfile.vmSize),
        type =~ 'Microsoft.Network/publicIPAddresses',
            pack('ipConfiguration', properties.ipConfiguration, 'associatedResource', properties.ipConfiguration.id),
        type =~ 'Microsoft.Compute/disks',
            pack('diskState', properties.diskState, 'managedBy', managedBy, 'diskSize', properties.diskSizeGB),
        type =~ 'Microsoft.Network/networkInterfaces',
            pack('virtualMachine', properties.virtualMachine, 'ipConfigurations', properties.ipConfigurations),
        type =~ 'Microsoft.Storage/storageAccounts',
            pack('accessTier', properties.accessTier, 'lastAccessTime', properties.lastAccessTime),
        pack('status', 'unknown')
    )
    | extend potentiallyUnused = case(
        type =~ 'Microsoft.Compute/virtualMachines' and resourceDetails.powerState contains 'stopped', true,
        type =~ 'Microsoft.Network/publicIPAddresses' and isnull(resourceDetails.ipConfiguration), true,
        type =~ 'Microsoft.Compute/disks' and resourceDetails.diskState =~ 'Unattached', true,
        type =~ 'Microsoft.Network/networkInterfaces' and isnull(resourceDetails.virtualMachine), true,
        false
    )
    | where potentiallyUnused == true
    | project id, name, type, resourceGroup, location, resourceDetails, tags
    "#;

const NETWORK_WATCHERS_QUERY: &str = r#"
    Resources
    | where type =~ 'Microsoft.Network/networkWatchers'
    | project id, name, resourceGroup, location
    "#;

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

pub async fn get_all_resources(
    state: &AppState,
    query: Option<String>,
) -> Result<String, ApiFailure> {
    let query = query.unwrap_or_else(|| DEFAULT_RESOURCES_QUERY.to_string());
    to_pretty(&query_resources(state, &query).await?)
}

pub async fn get_network_topology(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, NETWORK_TOPOLOGY_QUERY).await?)
}

pub async fn get_compute_resources(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, COMPUTE_RESOURCES_QUERY).await?)
}

pub async fn get_storage_resources(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, STORAGE_RESOURCES_QUERY).await?)
}

pub async fn get_resource_dependencies(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, RESOURCE_DEPENDENCIES_QUERY).await?)
}

pub async fn get_resource_hierarchy(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, RESOURCE_HIERARCHY_QUERY).await?)
}

pub async fn get_network_connections(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, NETWORK_CONNECTIONS_QUERY).await?)
}

pub async fn get_network_security_groups_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, NSG_DETAILED_QUERY).await?)
}

pub async fn get_load_balancers_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, LOAD_BALANCERS_QUERY).await?)
}

pub async fn get_virtual_machines_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, VIRTUAL_MACHINES_QUERY).await?)
}

pub async fn get_app_services_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, APP_SERVICES_QUERY).await?)
}

pub async fn get_databases_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, DATABASES_QUERY).await?)
}

pub async fn get_storage_accounts_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, STORAGE_ACCOUNTS_QUERY).await?)
}

pub async fn get_key_vaults_detailed(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, KEY_VAULTS_QUERY).await?)
}

pub async fn get_monitoring_and_diagnostics(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, DIAGNOSTIC_SETTINGS_QUERY).await?)
}

pub async fn get_resource_dependencies_advanced(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, DEPENDENCIES_ADVANCED_QUERY).await?)
}

pub async fn get_unused_resources(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&query_resources(state, UNUSED_RESOURCES_QUERY).await?)
}

/// One resource by ID, or the whole subscription inventory when no ID is
/// given. The resource ID is used as the endpoint path verbatim.
pub async fn get_resource_detailed_info(
    state: &AppState,
    resource_id: Option<String>,
) -> Result<String, ApiFailure> {
    let result = match resource_id {
        Some(resource_id) => {
            state
                .arm
                .get(&resource_id, &[("api-version", "2022-09-01".to_string())])
                .await?
        }
        None => {
            let endpoint = format!("/subscriptions/{}/resources", state.config.subscription_id);
            state
                .arm
                .get(
                    &endpoint,
                    &[
                        ("api-version", "2022-09-01".to_string()),
                        (
                            "$expand",
                            "createdTime,changedTime,provisioningState".to_string(),
                        ),
                    ],
                )
                .await?
        }
    };
    to_pretty(&result)
}

pub async fn resource_groups(state: &AppState) -> Result<Value, ApiFailure> {
    let endpoint = format!("/subscriptions/{}/resourcegroups", state.config.subscription_id);
    state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2022-09-01".to_string()),
                ("$expand", "tags".to_string()),
            ],
        )
        .await
}

pub async fn get_resource_group_details(state: &AppState) -> Result<String, ApiFailure> {
    to_pretty(&resource_groups(state).await?)
}

pub async fn get_resource_locks(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Authorization/locks",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(&endpoint, &[("api-version", "2020-05-01".to_string())])
        .await?;
    to_pretty(&result)
}

pub async fn get_rbac_assignments(state: &AppState) -> Result<String, ApiFailure> {
    let endpoint = format!(
        "/subscriptions/{}/providers/Microsoft.Authorization/roleAssignments",
        state.config.subscription_id
    );
    let result = state
        .arm
        .get(
            &endpoint,
            &[
                ("api-version", "2022-04-01".to_string()),
                ("$filter", "atScope()".to_string()),
            ],
        )
        .await?;
    to_pretty(&result)
}

/// Topology as seen by the first Network Watcher in the subscription.
pub async fn get_network_watchers_topology(state: &AppState) -> Result<String, ApiFailure> {
    let watchers = query_resources(state, NETWORK_WATCHERS_QUERY).await?;
    let rows = graph_rows(&watchers);
    let Some(watcher) = rows.first() else {
        return Ok("No Network Watchers found in subscription".to_string());
    };

    let name = row_str(watcher, 1);
    let resource_group = row_str(watcher, 2);
    let endpoint = format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/networkWatchers/{}/topology",
        state.config.subscription_id, resource_group, name
    );
    let body = json!({"targetResourceGroupName": resource_group});
    let result = state
        .arm
        .post(&endpoint, &[("api-version", "2023-02-01".to_string())], &body)
        .await?;
    to_pretty(&result)
}
