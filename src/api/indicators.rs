//! Indicator board endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::DateTime;
use serde::Serialize;

use crate::error::Result;
use crate::services::{Presentation, RecordStore, Snapshot};
use crate::sources::IndicatorSource;
use crate::types::{ClassifiedRecord, IndicatorId, Trend, TrendStyle};
use crate::AppState;

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Serialize)]
pub struct ApiMeta {
    pub symbol: String,
    pub interval: String,
    pub locale: &'static str,
}

impl<T> ApiResponse<T> {
    fn new<S, R>(data: T, state: &AppState<S, R>) -> Self {
        let settings = state.session.settings();
        Self {
            data,
            meta: ApiMeta {
                symbol: settings.symbol.clone(),
                interval: settings.interval.clone(),
                locale: state.session.presentation().locale.as_str(),
            },
        }
    }
}

/// One styled table cell.
#[derive(Debug, Serialize)]
pub struct TableCell {
    pub indicator: IndicatorId,
    pub description: String,
    pub trend: Trend,
    pub style: TrendStyle,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub timestamp: i64,
    /// UTC time of the candle, "YYYY-MM-DD HH:MM".
    pub time: String,
    pub price: String,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Serialize)]
pub struct TableColumn {
    pub id: IndicatorId,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    /// Newest first.
    pub rows: Vec<TableRow>,
    pub warning: Option<String>,
}

/// Create the indicators router.
pub fn router<S, R>() -> Router<AppState<S, R>>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    Router::new()
        .route("/", get(get_snapshot::<S, R>))
        .route("/table", get(get_table::<S, R>))
        .route("/refresh", post(force_refresh::<S, R>))
}

/// Stored records, refreshed first when a new hour has started.
async fn get_snapshot<S, R>(
    State(state): State<AppState<S, R>>,
) -> Result<Json<ApiResponse<Snapshot>>>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    let snapshot = state.session.load().await?;
    Ok(Json(ApiResponse::new(snapshot, &state)))
}

/// The same snapshot laid out as styled table rows.
async fn get_table<S, R>(State(state): State<AppState<S, R>>) -> Result<Json<ApiResponse<Table>>>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    let snapshot = state.session.load().await?;
    let table = build_table(
        &snapshot,
        &state.session.settings().indicators,
        state.session.presentation(),
    );
    Ok(Json(ApiResponse::new(table, &state)))
}

/// Run a refresh cycle regardless of the hourly schedule.
async fn force_refresh<S, R>(
    State(state): State<AppState<S, R>>,
) -> Result<Json<ApiResponse<Snapshot>>>
where
    S: IndicatorSource + 'static,
    R: RecordStore + 'static,
{
    state.session.refresh().await?;
    let snapshot = Snapshot {
        records: state.session.stored()?,
        last_update: state.session.store().last_update_mark()?,
        warning: None,
        refreshed: true,
    };
    Ok(Json(ApiResponse::new(snapshot, &state)))
}

/// Lay records out as rows, one cell per classified indicator.
pub fn build_table(snapshot: &Snapshot, indicators: &[IndicatorId], fmt: &Presentation) -> Table {
    let columns: Vec<TableColumn> = indicators
        .iter()
        .filter(|&&id| id != IndicatorId::Price)
        .map(|&id| TableColumn { id, name: id.name() })
        .collect();

    let rows = snapshot
        .records
        .iter()
        .map(|record| table_row(record, &columns, fmt))
        .collect();

    Table {
        columns,
        rows,
        warning: snapshot.warning.clone(),
    }
}

fn table_row(record: &ClassifiedRecord, columns: &[TableColumn], fmt: &Presentation) -> TableRow {
    let cells = columns
        .iter()
        .filter_map(|column| {
            let analysis = record.signals.get(column.id)?;
            Some(TableCell {
                indicator: column.id,
                description: analysis.description.clone(),
                trend: analysis.trend,
                style: analysis.trend.style_for(&analysis.description),
            })
        })
        .collect();

    TableRow {
        timestamp: record.timestamp(),
        time: format_time(record.timestamp()),
        price: fmt.price(record.record.price),
        cells,
    }
}

fn format_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
