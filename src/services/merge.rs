//! Folds independently fetched indicator series into one record per timestamp.

use crate::error::{AppError, Result};
use crate::services::signals::indicators::fibonacci;
use crate::types::{IndicatorId, RawPoint, SeriesMap, UnifiedRecord};
use std::collections::HashMap;
use tracing::debug;

// Candidate source fields, highest priority first.
const PRICE: &[&str] = &["value", "price"];
const KDJ_K: &[&str] = &["valueK", "value", "k"];
const KDJ_D: &[&str] = &["valueD", "valueSlowD", "d"];
const KDJ_J: &[&str] = &["valueJ", "j"];
const VALUE: &[&str] = &["value"];
const MACD_LINE: &[&str] = &["valueMACD", "value"];
const MACD_SIGNAL: &[&str] = &["valueMACDSignal", "signal"];
const MACD_HIST: &[&str] = &["valueMACDHist", "hist"];
const BAND_UPPER: &[&str] = &["valueUpperBand", "upper"];
const BAND_MIDDLE: &[&str] = &["valueMiddleBand", "middle"];
const BAND_LOWER: &[&str] = &["valueLowerBand", "lower"];
const SQUEEZE: &[&str] = &["squeeze", "value"];
const ADVICE: &[&str] = &["valueAdvice", "advice"];

/// Merge per-indicator series into unified records, newest first.
///
/// Fails with [`AppError::NoData`] when every series is empty. Points
/// without a timestamp are skipped; absent fields default to zero values.
pub fn merge(series: &SeriesMap) -> Result<Vec<UnifiedRecord>> {
    if series.values().all(|points| points.is_empty()) {
        return Err(AppError::NoData);
    }

    let mut by_timestamp: HashMap<i64, UnifiedRecord> = HashMap::new();

    for (indicator, points) in series {
        let mut folded = 0usize;
        for point in points {
            let Some(timestamp) = point.timestamp() else {
                continue;
            };
            let record = by_timestamp
                .entry(timestamp)
                .or_insert_with(|| UnifiedRecord::new(timestamp));
            apply_point(*indicator, point, record);
            if let Some(backtrack) = point.backtrack() {
                record.backtrack = backtrack;
            }
            folded += 1;
        }
        debug!("Folded {} of {} {} points", folded, points.len(), indicator);
    }

    let mut records: Vec<UnifiedRecord> = by_timestamp.into_values().collect();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(records)
}

/// Set one indicator's fields on a record from a raw point.
fn apply_point(indicator: IndicatorId, point: &RawPoint, record: &mut UnifiedRecord) {
    match indicator {
        IndicatorId::Price => {
            record.price = point.number(PRICE);
        }
        IndicatorId::Kdj => {
            let k = point.number(KDJ_K);
            let d = point.number(KDJ_D);
            record.k_value = k;
            record.d_value = d;
            record.j_value = match point.first_present(KDJ_J) {
                Some(_) => point.number(KDJ_J),
                None => 3.0 * k - 2.0 * d,
            };
        }
        IndicatorId::Rsi => {
            record.rsi_value = point.number(VALUE);
        }
        IndicatorId::Macd => {
            record.macd_value = point.number(MACD_LINE);
            record.signal_value = point.number(MACD_SIGNAL);
            record.hist_value = point.number(MACD_HIST);
        }
        IndicatorId::Bbands => {
            record.bbands_upper = point.number(BAND_UPPER);
            record.bbands_middle = point.number(BAND_MIDDLE);
            record.bbands_lower = point.number(BAND_LOWER);
        }
        IndicatorId::Keltner => {
            record.keltner_upper = point.number(BAND_UPPER);
            record.keltner_middle = point.number(BAND_MIDDLE);
            record.keltner_lower = point.number(BAND_LOWER);
        }
        IndicatorId::Squeeze => {
            record.squeeze = point.flag(SQUEEZE);
        }
        IndicatorId::Psar => {
            record.psar_value = point.number(VALUE);
        }
        IndicatorId::Supertrend => {
            record.supertrend_advice = point.text(ADVICE);
        }
        IndicatorId::Mfi => {
            record.mfi_value = point.number(VALUE);
        }
        IndicatorId::Atr => {
            record.atr_value = point.number(VALUE);
        }
        IndicatorId::Dmi => {
            record.adx_value = point.number(&["adx"]);
            record.pdi_value = point.number(&["pdi"]);
            record.mdi_value = point.number(&["mdi"]);
        }
        IndicatorId::Fibonacci => {
            let current = point.number(VALUE);
            let start = point.number(&["startPrice"]);
            let end = point.number(&["endPrice"]);
            let trend = point.text(&["trend"]);
            record.fib_value =
                fibonacci::retracement(fibonacci::is_uptrend(&trend), start, end, current);
            record.fib_current_price = current;
            record.fib_start_price = start;
            record.fib_end_price = end;
            record.fib_trend = trend;
        }
    }
}
