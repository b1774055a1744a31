//! Parabolic SAR position and reversals.

use crate::services::signals::format::relation;
use crate::services::signals::{not_available, Classifier, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Trend, UnifiedRecord};

/// Price above the SAR is an uptrend; a flip between consecutive points is a
/// reversal. The previous point is usable when both its price and SAR are
/// non-zero.
pub struct Psar;

impl Classifier for Psar {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Psar
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let (price, psar) = (current.price, current.psar_value);
        if price == 0.0 || psar == 0.0 {
            return not_available(IndicatorId::Psar, fmt);
        }

        let above = price > psar;
        let was_above = previous
            .map(|p| &p.record)
            .filter(|p| p.psar_value != 0.0 && p.price != 0.0)
            .map(|p| p.price > p.psar_value);

        let (label, trend) = match (was_above, above) {
            (Some(true), false) => (
                fmt.pick("PSAR reversal (turned bearish)", "PSAR反轉 (轉空頭)"),
                Trend::BearishReversal,
            ),
            (Some(false), true) => (
                fmt.pick("PSAR reversal (turned bullish)", "PSAR反轉 (轉多頭)"),
                Trend::BullishReversal,
            ),
            (_, true) => (fmt.pick("Uptrend", "上漲趨勢"), Trend::Bullish),
            (_, false) => (fmt.pick("Downtrend", "下跌趨勢"), Trend::Bearish),
        };

        let description = format!(
            "{} ({}{}{})",
            label,
            fmt.price(price),
            relation(price, psar),
            fmt.price(psar)
        );
        Analysis::new(description, trend)
    }
}
