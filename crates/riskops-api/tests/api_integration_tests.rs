//! Integration tests for the RiskOps API endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use riskops_api::{create_router, AppState};
use riskops_core::{ReturnObservation, Symbol};
use riskops_storage::{InMemoryStorage, RedbStorage, StorageAdapter};

const REFERENCE: [f64; 10] = [
    0.01, -0.02, 0.015, -0.03, 0.005, -0.01, 0.02, -0.005, 0.0, 0.01,
];

/// Seed AAPL returns and return the app state.
fn create_test_state(storage: Arc<dyn StorageAdapter>) -> AppState {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let returns: Vec<_> = REFERENCE
        .iter()
        .enumerate()
        .map(|(i, r)| {
            ReturnObservation::new(
                Symbol::new("AAPL").unwrap(),
                start + chrono::Days::new(i as u64),
                *r,
            )
        })
        .collect();
    storage.upsert_returns(&returns).unwrap();
    AppState::new(storage)
}

fn create_test_app() -> Router {
    create_router(create_test_state(Arc::new(InMemoryStorage::new())))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));

    (status, json)
}

async fn create_demo(app: &Router) {
    let (status, _) = send(
        app.clone(),
        "POST",
        "/portfolios",
        Some(json!({
            "name": "demo",
            "positions": [{"symbol": "aapl", "weight": 1.0}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = send(create_test_app(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
    assert!(json["version"].is_string());
    assert!(json["time_utc"].is_string());
}

#[tokio::test]
async fn test_portfolio_crud() {
    let app = create_test_app();

    let (_, json) = send(app.clone(), "GET", "/portfolios", None).await;
    assert_eq!(json["count"], 0);

    create_demo(&app).await;

    let (status, json) = send(app.clone(), "GET", "/portfolios/demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "demo");
    assert_eq!(json["positions"][0]["symbol"], "AAPL");
    assert_eq!(json["positions"][0]["weight"], 1.0);

    let (_, json) = send(app, "GET", "/portfolios", None).await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_get_missing_portfolio() {
    let (status, json) = send(create_test_app(), "GET", "/portfolios/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_portfolio_negative_weight() {
    let (status, json) = send(
        create_test_app(),
        "POST",
        "/portfolios",
        Some(json!({"name": "bad", "positions": [{"symbol": "AAPL", "weight": -1.0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_WEIGHT");
}

#[tokio::test]
async fn test_risk_calc_defaults() {
    let app = create_test_app();
    create_demo(&app).await;

    let (status, json) = send(app.clone(), "POST", "/risk/calc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["portfolio"], "demo");
    assert_eq!(json["as_of_date"], "2024-01-10");
    assert_eq!(json["method"], "historical");
    assert_eq!(json["model_version"], "baseline-historical-v1");
    assert_eq!(json["observations"], 10);
    assert_eq!(json["persisted"], true);
    assert!((json["var"].as_f64().unwrap() - 0.0294).abs() < 1e-12);
    assert!((json["cvar"].as_f64().unwrap() - 0.03).abs() < 1e-12);

    let (status, latest) = send(app, "GET", "/risk/latest?portfolio=demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["as_of_date"], "2024-01-10");
    assert_eq!(latest["var"], json["var"]);
    assert_eq!(latest["cvar"], json["cvar"]);
}

#[tokio::test]
async fn test_risk_calc_without_persist() {
    let app = create_test_app();
    create_demo(&app).await;

    let (status, json) = send(
        app.clone(),
        "POST",
        "/risk/calc",
        Some(json!({"portfolio": "demo", "alpha": 0.95, "persist": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["persisted"], false);
    assert!(json.get("result_id").is_none());

    let (status, latest) = send(app, "GET", "/risk/latest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["portfolio"], "demo");
    assert!(latest["var"].is_null());
}

#[tokio::test]
async fn test_risk_calc_invalid_alpha() {
    let app = create_test_app();
    create_demo(&app).await;

    let (status, json) = send(app, "POST", "/risk/calc", Some(json!({"alpha": 1.0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn test_risk_calc_unsupported_method() {
    let app = create_test_app();
    create_demo(&app).await;

    let (status, json) = send(app, "POST", "/risk/calc", Some(json!({"method": "mc"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn test_risk_calc_insufficient_data() {
    let app = create_test_app();
    create_demo(&app).await;

    let (status, json) = send(
        app,
        "POST",
        "/risk/calc",
        Some(json!({"lookback_days": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INSUFFICIENT_DATA");
}

#[tokio::test]
async fn test_risk_calc_unknown_portfolio() {
    let (status, _) = send(
        create_test_app(),
        "POST",
        "/risk/calc",
        Some(json!({"portfolio": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(create_test_app(), "GET", "/risk/latest?portfolio=nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_risk_calc_without_returns() {
    let app = create_test_app();
    send(
        app.clone(),
        "POST",
        "/portfolios",
        Some(json!({"name": "tech", "positions": [{"symbol": "MSFT", "weight": 1.0}]})),
    )
    .await;

    let (status, json) = send(app, "POST", "/risk/calc", Some(json!({"portfolio": "tech"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_redb_backed_app() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(RedbStorage::open(dir.path().join("api.redb")).unwrap());
    let app = create_router(create_test_state(storage).with_model_version("redb-v1"));
    create_demo(&app).await;

    let (status, json) = send(app.clone(), "POST", "/risk/calc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["model_version"], "redb-v1");

    let (_, health) = send(app, "GET", "/health", None).await;
    assert_eq!(health["storage"], "redb");
    assert_eq!(health["status"], "ok");
    assert_eq!(health["storage_ok"], true);
}

#[tokio::test]
async fn test_risk_calc_symbol_without_returns() {
    let app = create_test_app();
    send(
        app.clone(),
        "POST",
        "/portfolios",
        Some(json!({
            "name": "mixed",
            "positions": [{"symbol": "AAPL", "weight": 0.5}, {"symbol": "TSLA", "weight": 0.5}]
        })),
    )
    .await;

    let (status, json) = send(app, "POST", "/risk/calc", Some(json!({"portfolio": "mixed"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "UNKNOWN_SYMBOL");
}
