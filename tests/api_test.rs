//! Integration tests for API endpoints

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::{cycle, presentation, settings, Candle, Reply, ScriptedSource, BASE, HOUR};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use trendboard::api;
use trendboard::config::Config;
use trendboard::services::{MemoryStore, Session};
use trendboard::AppState;

fn app(replies: Vec<Reply>) -> Router {
    let session = Arc::new(Session::new(
        ScriptedSource::new(replies),
        MemoryStore::new(),
        settings(),
        presentation(),
    ));
    let state = AppState::new(Arc::new(Config::default()), session);
    Router::new()
        .merge(api::router::<ScriptedSource, MemoryStore>())
        .with_state(state)
}

fn candles() -> Reply {
    Reply::Series(cycle(&[
        Candle::new(BASE - HOUR, 1990.0, 30.0, 20.0, 45.0),
        Candle::new(BASE, 2000.4, 10.0, 20.0, 72.5),
    ]))
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(vec![]), "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_indicators_snapshot() {
    let (status, body) = send(app(vec![candles()]), "GET", "/api/indicators").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["symbol"], "ETH/USDT");
    assert_eq!(body["meta"]["locale"], "en");
    assert_eq!(body["data"]["refreshed"], true);
    assert!(body["data"]["warning"].is_null());

    let records = body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["timestamp"], BASE);
    assert_eq!(records[0]["price"], 2000.4);
    assert_eq!(records[0]["signals"]["kdj"]["trend"], "bearish");
    assert_eq!(
        records[0]["signals"]["kdj"]["description"],
        "KDJ death cross (K crossed below D) (10.00<20.00)"
    );
    assert_eq!(records[0]["signals"]["rsi"]["trend"], "overbought");
}

#[tokio::test]
async fn test_indicators_table() {
    let (status, body) = send(app(vec![candles()]), "GET", "/api/indicators/table").await;

    assert_eq!(status, StatusCode::OK);
    let table = &body["data"];
    assert_eq!(table["columns"].as_array().unwrap().len(), 2);
    assert_eq!(table["columns"][0]["name"], "KDJ");

    let rows = table["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["price"], "2000");
    assert_eq!(rows[0]["time"], "2023-11-14 22:00");
    assert_eq!(rows[0]["cells"][1]["trend"], "overbought");
    assert_eq!(rows[0]["cells"][1]["style"]["bold"], true);
}

#[tokio::test]
async fn test_forced_refresh() {
    let (status, body) = send(app(vec![candles()]), "POST", "/api/indicators/refresh").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["refreshed"], true);
    assert_eq!(body["data"]["records"].as_array().unwrap().len(), 2);
    assert!(body["data"]["lastUpdate"].is_number());
}

#[tokio::test]
async fn test_rate_limit_with_nothing_stored() {
    let (status, body) = send(app(vec![Reply::RateLimited]), "GET", "/api/indicators").await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["status"], 429);
    assert!(body["error"].as_str().unwrap().contains("Rate limited"));
}

#[tokio::test]
async fn test_fetch_failure_is_bad_gateway() {
    let (status, body) = send(app(vec![Reply::Status(500)]), "POST", "/api/indicators/refresh").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Fetching bulk failed: 500 - scripted failure");
}
