//! Fibonacci retracement of the latest swing.
//!
//! The provider reports the swing (`startPrice`, `endPrice`, `trend`) and
//! the current price; the retracement fraction is derived here rather than
//! read from the payload.

use crate::services::signals::{not_available, Classifier, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Trend, UnifiedRecord};

const SHALLOW: f64 = 0.382;
const HALF: f64 = 0.5;
const DEEP: f64 = 0.618;

/// Only the exact provider tag counts as an uptrend.
pub fn is_uptrend(trend: &str) -> bool {
    trend == "UPTREND"
}

/// Fraction of the swing given back by `current`, 0 for a flat swing.
///
/// Uptrend: `(end - current) / range`. Downtrend: `(current - end) / range`.
pub fn retracement(uptrend: bool, start: f64, end: f64, current: f64) -> f64 {
    let range = (end - start).abs();
    if !(range > 0.0) {
        return 0.0;
    }
    if uptrend {
        (end - current) / range
    } else {
        (current - end) / range
    }
}

/// Next support and resistance prices for a retracement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub support: f64,
    pub resistance: f64,
}

pub fn levels(uptrend: bool, start: f64, end: f64, retracement: f64) -> Levels {
    let range = (end - start).abs();
    let band = if retracement <= SHALLOW {
        Some(SHALLOW)
    } else if retracement <= HALF {
        Some(HALF)
    } else if retracement <= DEEP {
        Some(DEEP)
    } else {
        None
    };

    if uptrend {
        Levels {
            support: band.map(|b| end - range * b).unwrap_or(start),
            resistance: end,
        }
    } else {
        Levels {
            support: end,
            resistance: band.map(|b| end + range * b).unwrap_or(start),
        }
    }
}

pub struct Fibonacci;

impl Classifier for Fibonacci {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Fibonacci
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let (start, end) = (current.fib_start_price, current.fib_end_price);
        if start == 0.0 || end == 0.0 {
            return not_available(IndicatorId::Fibonacci, fmt);
        }

        let uptrend = is_uptrend(&current.fib_trend);
        let fraction = current.fib_value;
        let Levels {
            support,
            resistance,
        } = levels(uptrend, start, end, fraction);

        let trend = if fraction <= SHALLOW {
            if uptrend { Trend::Bullish } else { Trend::Bearish }
        } else if fraction <= DEEP {
            Trend::Neutral
        } else if uptrend {
            Trend::Bearish
        } else {
            Trend::Bullish
        };

        let range = (end - start).abs();
        let price = if current.price != 0.0 {
            current.price
        } else if current.fib_current_price != 0.0 {
            current.fib_current_price
        } else if uptrend {
            end - range * fraction
        } else {
            end + range * fraction
        };

        let near_support = (price - support).abs() <= (price - resistance).abs();
        let label = if near_support {
            fmt.pick("Near support", "近支撐位")
        } else {
            fmt.pick("Near resistance", "近阻力位")
        };
        let description = format!(
            "{} S:${} R:${}",
            label,
            fmt.price(support),
            fmt.price(resistance)
        );
        Analysis::new(description, trend)
    }
}
