use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use azure_scout::core::config::AzureConfig;
use azure_scout::mcp::dispatch_tool;
use azure_scout::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

async fn state_with_upstream() -> Arc<AppState> {
    let app = Router::new()
        .route(
            "/tenant/oauth2/token",
            post(|| async { Json(json!({"access_token": "test-token"})) }),
        )
        .route(
            "/subscriptions/sub",
            get(|| async { Json(json!({"subscriptionId": "sub", "state": "Enabled"})) }),
        )
        .route(
            "/subscriptions/sub/providers/Microsoft.Consumption/budgets",
            get(|| async { (StatusCode::FORBIDDEN, "not allowed") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = format!("http://{}", addr);
    let config = AzureConfig::for_endpoints(base.clone(), base, "sub");
    Arc::new(AppState::new(reqwest::Client::new(), config))
}

#[tokio::test]
async fn known_tool_returns_success_content() {
    let state = state_with_upstream().await;
    let response = dispatch_tool(state, "get_subscription_details", &json!({}))
        .await
        .unwrap();
    assert!(!response.is_error);
    let payload: Value = serde_json::from_str(&response.content[0].text).unwrap();
    assert_eq!(payload["state"], "Enabled");
}

#[tokio::test]
async fn failing_tool_returns_error_content_not_transport_error() {
    let state = state_with_upstream().await;
    let response = dispatch_tool(state, "get_budgets", &json!({})).await.unwrap();
    assert!(response.is_error);
    let payload: Value = serde_json::from_str(&response.content[0].text).unwrap();
    assert_eq!(payload["error"], true);
    assert_eq!(payload["status_code"], 403);
    assert_eq!(payload["message"], "not allowed");
}

#[tokio::test]
async fn unknown_tool_is_a_bad_request() {
    let state = state_with_upstream().await;
    let (status, body) = dispatch_tool(state, "drop_all_resources", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "Unknown tool: drop_all_resources");
}

#[tokio::test]
async fn missing_required_parameter_is_a_bad_request() {
    let state = state_with_upstream().await;
    let (status, body) = dispatch_tool(state, "get_alert_details", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "Missing required parameter: alert_id");
}
