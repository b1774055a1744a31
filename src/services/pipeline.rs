//! Merge and classify one cycle of fetched series.

use crate::error::Result;
use crate::services::merge::merge;
use crate::services::signals::{classify_series, Presentation};
use crate::types::{fetched_indicators, ClassifiedRecord, SeriesMap};
use tracing::debug;

/// Run the merge-and-classify pipeline.
///
/// `seed` is the newest known record from an earlier cycle. It is used as
/// the predecessor of the oldest merged record only when strictly older.
/// The result is newest first with one record per timestamp.
pub fn process(
    series: &SeriesMap,
    seed: Option<&ClassifiedRecord>,
    fmt: &Presentation,
) -> Result<Vec<ClassifiedRecord>> {
    let records = merge(series)?;
    let fetched = fetched_indicators(series);

    let oldest = records.iter().map(|r| r.timestamp).min();
    let seed = seed.filter(|s| oldest.map_or(false, |oldest| s.timestamp() < oldest));

    debug!(
        "Classifying {} records from {} indicators (seeded: {})",
        records.len(),
        fetched.len(),
        seed.is_some()
    );

    Ok(classify_series(records, seed, &fetched, fmt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::types::{series_from_value, IndicatorId, Trend, UnifiedRecord};
    use serde_json::json;

    fn kdj_series(points: serde_json::Value) -> SeriesMap {
        let mut series = SeriesMap::new();
        series.insert(IndicatorId::Kdj, series_from_value(points));
        series
    }

    fn seed(timestamp: i64, k: f64, d: f64) -> ClassifiedRecord {
        ClassifiedRecord {
            record: UnifiedRecord {
                k_value: k,
                d_value: d,
                ..UnifiedRecord::new(timestamp)
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let result = process(&kdj_series(json!([])), None, &Presentation::default());
        assert!(matches!(result, Err(AppError::NoData)));
    }

    #[test]
    fn test_older_seed_enables_crossover() {
        let series = kdj_series(json!([{"timestamp": 7200, "valueK": 25, "valueD": 20}]));
        let out = process(&series, Some(&seed(3600, 10.0, 20.0)), &Presentation::default())
            .unwrap();
        assert!(out[0].signals.kdj.description.contains("golden cross"));
    }

    #[test]
    fn test_seed_not_older_is_ignored() {
        let series = kdj_series(json!([{"timestamp": 7200, "valueK": 25, "valueD": 20}]));
        let out = process(&series, Some(&seed(7200, 10.0, 20.0)), &Presentation::default())
            .unwrap();
        assert_eq!(out[0].signals.kdj.trend, Trend::Bullish);
        assert!(out[0].signals.kdj.description.starts_with("KDJ bullish (K>D)"));
    }
}
