use crate::services::RecordStore;
use crate::sources::IndicatorSource;
use crate::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router<S, R>() -> Router<AppState<S, R>>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    Router::new().route("/api/health", get(health))
}
