use serde_json::{json, Value};
use thiserror::Error;

/// Uniform failure envelope for everything that can go wrong between a tool
/// call and the Azure APIs. Tools match on the variant, never on message
/// prefixes or opportunistic JSON keys.
#[derive(Debug, Clone, Error)]
pub enum ApiFailure {
    #[error("Failed to authenticate with Azure")]
    Authentication,

    /// Azure answered with a status >= 400. `body` is the raw response text,
    /// passed through without reinterpretation.
    #[error("Azure API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// DNS failure, refused connection, timeout, or an unparseable success
    /// body. Caught at the client boundary; never propagated raw.
    #[error("API request failed: {0}")]
    Transport(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A post-processing step over already-fetched JSON failed.
    #[error("Response shaping failed: {0}")]
    Shaping(String),
}

impl ApiFailure {
    /// Wire shape used when a sub-call failure is embedded inside a larger
    /// success payload (fan-out aggregates, combined reports).
    pub fn to_envelope(&self) -> Value {
        match self {
            ApiFailure::Upstream { status, body } => json!({
                "error": true,
                "status_code": status,
                "message": body,
            }),
            other => json!({
                "error": true,
                "message": other.to_string(),
            }),
        }
    }

    /// Same envelope with a `source` tag naming the section that failed.
    pub fn to_envelope_tagged(&self, source: &str) -> Value {
        let mut envelope = self.to_envelope();
        if let Some(map) = envelope.as_object_mut() {
            map.insert("source".to_string(), Value::String(source.to_string()));
        }
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_envelope_carries_status_and_raw_body() {
        let failure = ApiFailure::Upstream {
            status: 403,
            body: "<html>forbidden</html>".to_string(),
        };
        let envelope = failure.to_envelope();
        assert_eq!(envelope["error"], true);
        assert_eq!(envelope["status_code"], 403);
        assert_eq!(envelope["message"], "<html>forbidden</html>");
    }

    #[test]
    fn auth_envelope_has_no_status_code() {
        let envelope = ApiFailure::Authentication.to_envelope();
        assert_eq!(envelope["error"], true);
        assert!(envelope.get("status_code").is_none());
        assert_eq!(envelope["message"], "Failed to authenticate with Azure");
    }

    #[test]
    fn tagged_envelope_names_the_failed_section() {
        let envelope =
            ApiFailure::Transport("connection reset".to_string()).to_envelope_tagged("storage");
        assert_eq!(envelope["source"], "storage");
        assert_eq!(envelope["message"], "API request failed: connection reset");
    }
}
