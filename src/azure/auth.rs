use crate::core::config::AzureConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

/// Seam for bearer-token acquisition. Production uses the client-credentials
/// grant below; tests substitute a canned source.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns a fresh bearer token, or `None` when the identity provider
    /// refuses or is unreachable. Callers treat `None` as a hard failure for
    /// that request and must not retry.
    async fn access_token(&self) -> Option<String>;
}

/// OAuth2 client-credentials grant against the Entra ID token endpoint.
///
/// Every call re-authenticates: tokens are never cached, never refreshed,
/// and their expiry is never inspected.
pub struct ClientCredentialsTokenSource {
    http: reqwest::Client,
    config: Arc<AzureConfig>,
}

impl ClientCredentialsTokenSource {
    pub fn new(http: reqwest::Client, config: Arc<AzureConfig>) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsTokenSource {
    async fn access_token(&self) -> Option<String> {
        let url = format!(
            "{}/{}/oauth2/token",
            self.config.login_url, self.config.tenant_id
        );
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("resource", super::MANAGEMENT_RESOURCE),
        ];

        let response = match self.http.post(&url).form(&form).send().await {
            Ok(r) => r,
            Err(e) => {
                error!("Error getting Azure token: {}", e);
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Error getting Azure token: {}", body);
            return None;
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("access_token")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string()),
            Err(e) => {
                error!("Error decoding Azure token response: {}", e);
                None
            }
        }
    }
}
