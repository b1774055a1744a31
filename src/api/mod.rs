pub mod health;
pub mod indicators;

use crate::services::RecordStore;
use crate::sources::IndicatorSource;
use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router<S, R>() -> Router<AppState<S, R>>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    Router::new()
        .merge(health::router())
        .nest("/api/indicators", indicators::router())
}
