//! Relative Strength Index zones.

use crate::services::signals::{Classifier, Presentation, Zone};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, UnifiedRecord};

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;

/// RSI (Relative Strength Index).
///
/// - 70 or above: overbought
/// - 30 or below: oversold
/// - otherwise bullish/bearish around the 50 midline
pub struct Rsi;

impl Classifier for Rsi {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Rsi
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let value = current.rsi_value;
        let zone = Zone::of(value, OVERBOUGHT, OVERSOLD);
        Analysis::new(
            zone.describe(IndicatorId::Rsi, value, OVERBOUGHT, OVERSOLD, fmt),
            zone.trend(),
        )
    }
}
