use super::error::ApiFailure;
use super::TokenSource;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// One authenticated REST call against the Azure Resource Manager host,
/// with both transport failures and HTTP error statuses normalized into
/// [`ApiFailure`].
///
/// The endpoint string is concatenated onto the management host verbatim:
/// callers pass either a root-relative path (`/subscriptions/...`) or a
/// fully-qualified resource-ID path, and both must keep working.
#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ArmClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    /// GET with query parameters. `params` must include the API version;
    /// the client never defaults it.
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ApiFailure> {
        self.request(Method::GET, endpoint, params, None).await
    }

    /// POST with query parameters and a JSON body.
    pub async fn post(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        body: &Value,
    ) -> Result<Value, ApiFailure> {
        self.request(Method::POST, endpoint, params, Some(body)).await
    }

    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiFailure> {
        // Method gate comes first: an unsupported verb must never reach the
        // network, not even for token acquisition.
        if method != Method::GET && method != Method::POST {
            return Err(ApiFailure::UnsupportedMethod(method.to_string()));
        }

        let token = self
            .tokens
            .access_token()
            .await
            .ok_or(ApiFailure::Authentication)?;

        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiFailure::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))
    }
}
