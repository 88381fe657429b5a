//! Integration tests for the PHC API client.
//!
//! Each test starts an in-process axum stub on an ephemeral port, so no
//! external service is required:
//!   cargo test -p phc-api --test client_tests

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use phc_api::{ApiConfig, ApiError, ApiParams, PhcApi, PhcApiClient};
use phc_core::{AlertKind, AlertLevel};
use serde_json::{json, Value};

/// Serve `app` on 127.0.0.1 and return its address.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> PhcApiClient {
    PhcApiClient::new(ApiConfig::new(format!("http://{}/api/v1", addr))).unwrap()
}

fn stub_router() -> Router {
    Router::new()
        .route(
            "/api/v1/outbreak-alerts",
            get(|| async {
                Json(json!({"data": [
                    {"PHC Name": "Asokoro PHC", "PHC LGA": "AMAC", "shortage_score": "3.2"},
                    {"name": "Kuje PHC", "alert_level": "low"}
                ]}))
            }),
        )
        .route(
            "/api/v1/underserved",
            get(|| async {
                Json(json!([
                    {"name": "a", "underserved_index": 0.2},
                    {"name": "b", "underserved_index": 0.9},
                    {"name": "c", "underserved_index": 0.5}
                ]))
            }),
        )
        .route(
            "/api/v1/alerts-feed",
            get(|| async {
                Json(json!({"feed": [
                    {"id": "f1", "type": "warning", "phc_name": "Kuje PHC"},
                    {"type": "connectivity"}
                ]}))
            }),
        )
        .route(
            "/api/v1/telecom-advice",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                let name = query.get("name").cloned().unwrap_or_default();
                Json(json!({"data": [{"phc_name": name, "state": query.get("state")}]}))
            }),
        )
        .route(
            "/api/v1/resource-warnings",
            get(|| async { Json(json!({"data": [{"drug": "ACT"}, {"drug": "ORS"}]})) }),
        )
        .route(
            "/api/v1/metrics-summary",
            get(|| async { Json(json!({"total_phcs": 120})) }),
        )
        .route(
            "/api/v1/health",
            get(|| async { Json(json!({"status": "ok", "message": "healthy"})) }),
        )
}

// ============================================================================
// Successful responses
// ============================================================================

#[tokio::test]
async fn test_outbreak_alerts_are_normalized() {
    let client = client_for(serve(stub_router()).await);
    let facilities = client.outbreak_alerts(&ApiParams::new()).await.unwrap();

    assert_eq!(facilities.len(), 2);
    assert_eq!(facilities[0].id, "asokoro phc");
    assert_eq!(facilities[0].alert_level, AlertLevel::High);
    assert_eq!(facilities[1].alert_level, AlertLevel::Low);
}

#[tokio::test]
async fn test_underserved_honours_top_n() {
    let client = client_for(serve(stub_router()).await);
    let response = client
        .underserved(&ApiParams::new().top_n(2))
        .await
        .unwrap();

    let top: Vec<&str> = response
        .summary
        .top_underserved_facilities
        .iter()
        .map(|t| t.canonical_name.as_str())
        .collect();
    assert_eq!(top, vec!["b", "c"]);
    assert_eq!(response.summary.average_underserved_index, 0.533);
}

#[tokio::test]
async fn test_alerts_feed_is_normalized() {
    let client = client_for(serve(stub_router()).await);
    let feed = client.alerts_feed(&ApiParams::new()).await.unwrap();

    assert_eq!(feed[0].id, "f1");
    assert_eq!(feed[0].kind, AlertKind::Resource);
    assert_eq!(feed[1].id, "connectivity_1_Facility_2");
    assert_eq!(feed[1].channel, "API");
}

#[tokio::test]
async fn test_telecom_advice_sends_name_and_params() {
    let client = client_for(serve(stub_router()).await);
    let advice = client
        .telecom_advice("Kuje PHC", &ApiParams::new().state("FCT"))
        .await
        .unwrap();

    assert_eq!(advice.len(), 1);
    assert_eq!(advice[0].facility_name, "Kuje PHC");
    assert_eq!(advice[0].advice, "Preferred channel: SMS");
}

#[tokio::test]
async fn test_pass_through_endpoints() {
    let client = client_for(serve(stub_router()).await);

    let warnings = client.resource_warnings(&ApiParams::new()).await.unwrap();
    assert_eq!(warnings, vec![json!({"drug": "ACT"}), json!({"drug": "ORS"})]);

    let metrics = client.metrics_summary(&ApiParams::new()).await.unwrap();
    assert_eq!(metrics["total_phcs"], json!(120));

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.message, "healthy");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_status_error_uses_detail() {
    let app = Router::new().route(
        "/api/v1/alerts-feed",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"detail": "insight engine warming up"})),
            )
        }),
    );
    let client = client_for(serve(app).await);

    let err = client.alerts_feed(&ApiParams::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));

    let shape = err.shape();
    assert_eq!(shape.message, "insight engine warming up");
    assert_eq!(shape.status, Some(503));
    assert_eq!(shape.code.as_deref(), Some("ERR_BAD_RESPONSE"));
}

#[tokio::test]
async fn test_missing_route_is_status_error() {
    let client = client_for(serve(Router::new()).await);
    let err = client.health().await.unwrap_err();
    assert_eq!(err.shape().status, Some(404));
}

#[tokio::test]
async fn test_malformed_json() {
    let app = Router::new().route("/api/v1/outbreak-alerts", get(|| async { "<html>oops</html>" }));
    let client = client_for(serve(app).await);

    let err = client.outbreak_alerts(&ApiParams::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Json(_)));
}

#[tokio::test]
async fn test_wrong_shape_is_not_an_error() {
    let app = Router::new().route(
        "/api/v1/alerts-feed",
        get(|| async { Json(json!({"unexpected": true})) }),
    );
    let client = client_for(serve(app).await);

    let feed = client.alerts_feed(&ApiParams::new()).await.unwrap();
    assert!(feed.is_empty());
}

#[tokio::test]
async fn test_timeout_shape() {
    let app = Router::new().route(
        "/api/v1/health",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(Value::Null)
        }),
    );
    let addr = serve(app).await;
    let client = PhcApiClient::new(
        ApiConfig::new(format!("http://{}/api/v1", addr)).with_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(err.shape().code.as_deref(), Some("ETIMEDOUT"));
}

#[tokio::test]
async fn test_connection_refused_shape() {
    // Bind then release a port so nothing is listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).health().await.unwrap_err();
    let shape = err.shape();
    assert_eq!(shape.status, None);
    assert_eq!(shape.code.as_deref(), Some("ERR_NETWORK"));
}
