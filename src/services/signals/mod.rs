//! Trend classification.
//!
//! Each indicator has one canonical rule table implementing [`Classifier`].
//! Records are classified oldest first so that crossover rules can see the
//! record immediately preceding them in time; the result is returned newest
//! first.

pub mod format;
pub mod indicators;

pub use format::{Locale, Presentation};
pub use indicators::all_classifiers;

use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Signals, Trend, UnifiedRecord};
use std::collections::BTreeSet;

/// Rule table for one indicator.
pub trait Classifier: Send + Sync {
    /// Indicator whose analysis this produces.
    fn indicator(&self) -> IndicatorId;

    /// Classify the current record given the record preceding it in time.
    ///
    /// Only called when the indicator was fetched this cycle.
    fn classify(
        &self,
        current: &UnifiedRecord,
        previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis;
}

/// Fixed "data not available" analysis.
pub fn not_available(indicator: IndicatorId, fmt: &Presentation) -> Analysis {
    let description = match fmt.locale {
        Locale::En => format!("{} data not available", indicator.name()),
        Locale::ZhTw => format!("{}數據未獲取", indicator.name()),
    };
    Analysis::new(description, Trend::Neutral)
}

/// State of two lines (K/D, MACD/signal) relative to the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCross {
    /// Fast line moved from at-or-below to above.
    GoldenCross,
    /// Fast line moved from at-or-above to below.
    DeathCross,
    StillAbove,
    StillBelow,
    Flat,
    /// No usable previous point.
    Above,
    Below,
    Level,
}

impl LineCross {
    /// Compare fast vs slow, using the previous pair when one is usable.
    pub fn detect(previous: Option<(f64, f64)>, fast: f64, slow: f64) -> Self {
        match previous {
            Some((prev_fast, prev_slow)) => {
                if prev_fast <= prev_slow && fast > slow {
                    Self::GoldenCross
                } else if prev_fast >= prev_slow && fast < slow {
                    Self::DeathCross
                } else if fast > slow {
                    Self::StillAbove
                } else if fast < slow {
                    Self::StillBelow
                } else {
                    Self::Flat
                }
            }
            None => {
                if fast > slow {
                    Self::Above
                } else if fast < slow {
                    Self::Below
                } else {
                    Self::Level
                }
            }
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            Self::GoldenCross | Self::StillAbove | Self::Above => Trend::Bullish,
            Self::DeathCross | Self::StillBelow | Self::Below => Trend::Bearish,
            Self::Flat | Self::Level => Trend::Neutral,
        }
    }
}

/// Oscillator zone for bounded indicators (RSI, MFI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Overbought,
    Oversold,
    Bullish,
    Bearish,
    Neutral,
}

impl Zone {
    /// Thresholds are inclusive and checked before the midline.
    pub fn of(value: f64, overbought: f64, oversold: f64) -> Self {
        if value >= overbought {
            Self::Overbought
        } else if value <= oversold {
            Self::Oversold
        } else if value > 50.0 {
            Self::Bullish
        } else if value < 50.0 {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            Self::Overbought => Trend::Overbought,
            Self::Oversold => Trend::Oversold,
            Self::Bullish => Trend::Bullish,
            Self::Bearish => Trend::Bearish,
            Self::Neutral => Trend::Neutral,
        }
    }

    /// Describe a zone reading, e.g. "RSI overbought (≥70)(72.10)".
    pub fn describe(
        &self,
        indicator: IndicatorId,
        value: f64,
        overbought: f64,
        oversold: f64,
        fmt: &Presentation,
    ) -> String {
        let (label, threshold) = match self {
            Self::Overbought => (fmt.pick("overbought", "超買"), format!("≥{}", overbought)),
            Self::Oversold => (fmt.pick("oversold", "超賣"), format!("≤{}", oversold)),
            Self::Bullish => (fmt.pick("bullish", "偏多"), ">50".to_string()),
            Self::Bearish => (fmt.pick("bearish", "偏空"), "<50".to_string()),
            Self::Neutral => (fmt.pick("neutral", "中性"), "≈50".to_string()),
        };
        let separator = fmt.pick(" ", "");
        format!(
            "{}{}{} ({})({})",
            indicator.name(),
            separator,
            label,
            threshold,
            fmt.value(value)
        )
    }
}

/// Classify one record with every registered classifier.
///
/// Indicators absent from `fetched` get the "not available" analysis before
/// any numeric rule runs.
pub fn classify_record(
    classifiers: &[Box<dyn Classifier>],
    record: UnifiedRecord,
    previous: Option<&ClassifiedRecord>,
    fetched: &BTreeSet<IndicatorId>,
    fmt: &Presentation,
) -> ClassifiedRecord {
    let mut signals = Signals::default();
    for classifier in classifiers {
        let indicator = classifier.indicator();
        let analysis = if fetched.contains(&indicator) {
            classifier.classify(&record, previous, fmt)
        } else {
            not_available(indicator, fmt)
        };
        signals.set(indicator, analysis);
    }
    ClassifiedRecord { record, signals }
}

/// Classify a series in ascending time order, returning it newest first.
///
/// `seed` is the record preceding the oldest one in `records`, when known
/// from an earlier cycle.
pub fn classify_series(
    records: Vec<UnifiedRecord>,
    seed: Option<&ClassifiedRecord>,
    fetched: &BTreeSet<IndicatorId>,
    fmt: &Presentation,
) -> Vec<ClassifiedRecord> {
    let classifiers = all_classifiers();

    let mut ascending = records;
    ascending.sort_by_key(|record| record.timestamp);

    let mut classified: Vec<ClassifiedRecord> = Vec::with_capacity(ascending.len());
    for record in ascending {
        let previous = classified.last().or(seed);
        let next = classify_record(&classifiers, record, previous, fetched, fmt);
        classified.push(next);
    }

    classified.reverse();
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kdj_record(timestamp: i64, k: f64, d: f64) -> UnifiedRecord {
        UnifiedRecord {
            k_value: k,
            d_value: d,
            ..UnifiedRecord::new(timestamp)
        }
    }

    fn fetched(ids: &[IndicatorId]) -> BTreeSet<IndicatorId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_line_cross_detection() {
        assert_eq!(LineCross::detect(Some((10.0, 20.0)), 25.0, 20.0), LineCross::GoldenCross);
        assert_eq!(LineCross::detect(Some((20.0, 20.0)), 19.0, 20.0), LineCross::DeathCross);
        assert_eq!(LineCross::detect(Some((30.0, 20.0)), 25.0, 20.0), LineCross::StillAbove);
        assert_eq!(LineCross::detect(Some((10.0, 20.0)), 15.0, 20.0), LineCross::StillBelow);
        assert_eq!(LineCross::detect(Some((30.0, 20.0)), 20.0, 20.0), LineCross::Flat);
        assert_eq!(LineCross::detect(None, 25.0, 20.0), LineCross::Above);
        assert_eq!(LineCross::detect(None, 20.0, 20.0), LineCross::Level);
    }

    #[test]
    fn test_zone_boundaries() {
        assert_eq!(Zone::of(70.0, 70.0, 30.0), Zone::Overbought);
        assert_eq!(Zone::of(69.999, 70.0, 30.0), Zone::Bullish);
        assert_eq!(Zone::of(50.0, 70.0, 30.0), Zone::Neutral);
        assert_eq!(Zone::of(30.0, 70.0, 30.0), Zone::Oversold);
        assert_eq!(Zone::of(45.0, 70.0, 30.0), Zone::Bearish);
    }

    #[test]
    fn test_unfetched_indicator_is_not_available() {
        let record = UnifiedRecord::new(3600);
        let classified = classify_series(
            vec![record],
            None,
            &fetched(&[IndicatorId::Price]),
            &Presentation::default(),
        );
        let rsi = &classified[0].signals.rsi;
        assert_eq!(rsi.trend, Trend::Neutral);
        assert_eq!(rsi.description, "RSI data not available");
    }

    #[test]
    fn test_not_available_localized() {
        let fmt = Presentation::new(Locale::ZhTw, 2);
        assert_eq!(not_available(IndicatorId::Kdj, &fmt).description, "KDJ數據未獲取");
    }

    #[test]
    fn test_series_classified_ascending_returned_descending() {
        // Newer record first on input; crossover must still be detected.
        let records = vec![kdj_record(7200, 25.0, 20.0), kdj_record(3600, 10.0, 20.0)];
        let classified = classify_series(
            records,
            None,
            &fetched(&[IndicatorId::Kdj]),
            &Presentation::default(),
        );

        assert_eq!(classified[0].timestamp(), 7200);
        assert_eq!(classified[1].timestamp(), 3600);
        assert_eq!(classified[0].signals.kdj.trend, Trend::Bullish);
        assert!(classified[0].signals.kdj.description.contains("golden cross"));
        assert_eq!(classified[1].signals.kdj.trend, Trend::Bearish);
    }

    #[test]
    fn test_seed_supplies_previous_for_oldest_record() {
        let seed = ClassifiedRecord {
            record: kdj_record(3600, 10.0, 20.0),
            signals: Signals::default(),
        };
        let classified = classify_series(
            vec![kdj_record(7200, 25.0, 20.0)],
            Some(&seed),
            &fetched(&[IndicatorId::Kdj]),
            &Presentation::default(),
        );
        assert!(classified[0].signals.kdj.description.contains("golden cross"));
    }
}
