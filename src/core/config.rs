use std::env;
use tracing::warn;

// ---------------------------------------------------------------------------
// AzureConfig: env-based credential/config loader, read once at startup
// ---------------------------------------------------------------------------

/// Service-principal credentials plus the two fixed hosts every call targets.
///
/// Constructed once at process start and shared by reference. Fields may be
/// empty when the environment is incomplete; the process still starts and
/// calls fail at token acquisition instead.
#[derive(Clone, Debug)]
pub struct AzureConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
    pub login_url: String,
    pub management_url: String,
}

impl AzureConfig {
    /// Read `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`, and
    /// `AZURE_SUBSCRIPTION_ID`. Missing values produce a startup warning,
    /// not a fatal error.
    pub fn from_env() -> Self {
        let tenant_id = env::var("AZURE_TENANT_ID").unwrap_or_default();
        let client_id = env::var("AZURE_CLIENT_ID").unwrap_or_default();
        let client_secret = env::var("AZURE_CLIENT_SECRET").unwrap_or_default();
        let subscription_id = env::var("AZURE_SUBSCRIPTION_ID").unwrap_or_default();

        if tenant_id.is_empty()
            || client_id.is_empty()
            || client_secret.is_empty()
            || subscription_id.is_empty()
        {
            warn!(
                "Azure environment variables not fully configured. Set AZURE_TENANT_ID, \
                 AZURE_CLIENT_ID, AZURE_CLIENT_SECRET, and AZURE_SUBSCRIPTION_ID."
            );
        }

        Self {
            tenant_id,
            client_id,
            client_secret,
            subscription_id,
            login_url: crate::azure::LOGIN_URL.to_string(),
            management_url: crate::azure::MANAGEMENT_URL.to_string(),
        }
    }

    /// Config with explicit hosts, for tests that stand up a local upstream.
    pub fn for_endpoints(
        login_url: impl Into<String>,
        management_url: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: "tenant".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            subscription_id: subscription_id.into(),
            login_url: login_url.into(),
            management_url: management_url.into(),
        }
    }
}

pub fn http_timeout_secs() -> u64 {
    env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(30)
}

pub fn http_connect_timeout_secs() -> u64 {
    env::var("HTTP_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(10)
}
