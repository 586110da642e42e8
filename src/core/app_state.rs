use crate::azure::{ArmClient, ClientCredentialsTokenSource, TokenSource};
use crate::core::config::AzureConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AzureConfig>,
    pub arm: ArmClient,
    pub tool_registry: Arc<crate::core::tools_registry::ToolRegistry>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("subscription_id", &self.config.subscription_id)
            .finish()
    }
}

impl AppState {
    pub fn new(http_client: reqwest::Client, config: AzureConfig) -> Self {
        let config = Arc::new(config);
        let tokens: Arc<dyn TokenSource> = Arc::new(ClientCredentialsTokenSource::new(
            http_client.clone(),
            Arc::clone(&config),
        ));
        let arm = ArmClient::new(http_client, config.management_url.clone(), tokens);
        Self {
            config,
            arm,
            tool_registry: Arc::new(crate::core::tools_registry::ToolRegistry::load()),
        }
    }

}
