use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use azure_scout::azure::{ApiFailure, ArmClient, ClientCredentialsTokenSource, TokenSource};
use azure_scout::core::config::AzureConfig;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

async fn spawn_upstream(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct Upstream {
    client: ArmClient,
    token_hits: Arc<AtomicUsize>,
    arm_hits: Arc<AtomicUsize>,
}

/// One local server plays both roles: the token endpoint and the ARM host.
async fn upstream_with_token_status(token_status: StatusCode) -> Upstream {
    let token_hits = Arc::new(AtomicUsize::new(0));
    let arm_hits = Arc::new(AtomicUsize::new(0));

    let token_counter = Arc::clone(&token_hits);
    let arm_counter_ok = Arc::clone(&arm_hits);
    let arm_counter_echo = Arc::clone(&arm_hits);
    let arm_counter_denied = Arc::clone(&arm_hits);

    let app = Router::new()
        .route(
            "/tenant/oauth2/token",
            post(move || {
                let hits = Arc::clone(&token_counter);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (
                        token_status,
                        Json(json!({"access_token": "test-token"})),
                    )
                }
            }),
        )
        .route(
            "/subscriptions/sub",
            get(move || {
                let hits = Arc::clone(&arm_counter_ok);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"subscriptionId": "sub", "displayName": "Test Sub"}))
                }
            }),
        )
        .route(
            "/echo",
            post(move |Json(body): Json<serde_json::Value>| {
                let hits = Arc::clone(&arm_counter_echo);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"received": body}))
                }
            }),
        )
        .route(
            "/denied",
            get(move || {
                let hits = Arc::clone(&arm_counter_denied);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::FORBIDDEN, "<html>forbidden by policy</html>")
                }
            }),
        );

    let addr = spawn_upstream(app).await;
    let base = format!("http://{}", addr);
    let config = Arc::new(AzureConfig::for_endpoints(base.clone(), base, "sub"));
    let http = reqwest::Client::new();
    let tokens: Arc<dyn TokenSource> = Arc::new(ClientCredentialsTokenSource::new(
        http.clone(),
        Arc::clone(&config),
    ));
    let client = ArmClient::new(http, config.management_url.clone(), tokens);

    Upstream {
        client,
        token_hits,
        arm_hits,
    }
}

#[tokio::test]
async fn get_parses_success_payload() {
    let upstream = upstream_with_token_status(StatusCode::OK).await;
    let result = upstream
        .client
        .get(
            "/subscriptions/sub",
            &[("api-version", "2022-12-01".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(result["displayName"], "Test Sub");
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn identical_gets_return_identical_payloads() {
    let upstream = upstream_with_token_status(StatusCode::OK).await;
    let params = [("api-version", "2022-12-01".to_string())];
    let first = upstream.client.get("/subscriptions/sub", &params).await.unwrap();
    let second = upstream.client.get("/subscriptions/sub", &params).await.unwrap();
    assert_eq!(first, second);
    // No token caching: each call re-authenticates.
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn post_sends_json_body() {
    let upstream = upstream_with_token_status(StatusCode::OK).await;
    let body = json!({"query": "Resources | limit 1"});
    let result = upstream
        .client
        .post("/echo", &[("api-version", "2021-03-01".to_string())], &body)
        .await
        .unwrap();
    assert_eq!(result["received"]["query"], "Resources | limit 1");
}

#[tokio::test]
async fn upstream_error_carries_status_and_raw_body() {
    let upstream = upstream_with_token_status(StatusCode::OK).await;
    let failure = upstream
        .client
        .get("/denied", &[("api-version", "2022-01-01".to_string())])
        .await
        .unwrap_err();
    match failure {
        ApiFailure::Upstream { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "<html>forbidden by policy</html>");
        }
        other => panic!("expected upstream failure, got {:?}", other),
    }
}

#[tokio::test]
async fn unsupported_method_issues_no_network_calls() {
    let upstream = upstream_with_token_status(StatusCode::OK).await;
    let failure = upstream
        .client
        .request(
            reqwest::Method::DELETE,
            "/subscriptions/sub",
            &[("api-version", "2022-12-01".to_string())],
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(failure, ApiFailure::UnsupportedMethod(_)));
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 0);
    assert_eq!(upstream.arm_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn auth_failure_short_circuits_before_the_management_host() {
    let upstream = upstream_with_token_status(StatusCode::UNAUTHORIZED).await;
    let failure = upstream
        .client
        .get(
            "/subscriptions/sub",
            &[("api-version", "2022-12-01".to_string())],
        )
        .await
        .unwrap_err();
    assert!(matches!(failure, ApiFailure::Authentication));
    assert_eq!(failure.to_string(), "Failed to authenticate with Azure");
    assert_eq!(upstream.token_hits.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.arm_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_token_endpoint_reads_as_auth_failure() {
    // Nothing listens on the login host; the token source logs and returns
    // None, and the client reports an authentication failure.
    let config = Arc::new(AzureConfig::for_endpoints(
        "http://127.0.0.1:1",
        "http://127.0.0.1:1",
        "sub",
    ));
    let http = reqwest::Client::new();
    let tokens: Arc<dyn TokenSource> = Arc::new(ClientCredentialsTokenSource::new(
        http.clone(),
        Arc::clone(&config),
    ));
    let client = ArmClient::new(http, config.management_url.clone(), tokens);

    let failure = client
        .get("/subscriptions/sub", &[("api-version", "2022-12-01".to_string())])
        .await
        .unwrap_err();
    assert!(matches!(failure, ApiFailure::Authentication));
}
