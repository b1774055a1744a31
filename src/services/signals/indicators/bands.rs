//! Price position inside a band channel (Bollinger Bands, Keltner Channels).

use crate::services::signals::{not_available, Classifier, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Trend, UnifiedRecord};

/// Band levels as (upper, middle, lower).
type BandSelector = fn(&UnifiedRecord) -> (f64, f64, f64);

/// One rule shared by every upper/middle/lower channel.
pub struct BandChannel {
    indicator: IndicatorId,
    bands: BandSelector,
}

impl BandChannel {
    pub fn bollinger() -> Self {
        Self {
            indicator: IndicatorId::Bbands,
            bands: |r| (r.bbands_upper, r.bbands_middle, r.bbands_lower),
        }
    }

    pub fn keltner() -> Self {
        Self {
            indicator: IndicatorId::Keltner,
            bands: |r| (r.keltner_upper, r.keltner_middle, r.keltner_lower),
        }
    }
}

/// Percentage distance of price from a band.
fn distance(price: f64, band: f64) -> f64 {
    (price - band) / band * 100.0
}

impl Classifier for BandChannel {
    fn indicator(&self) -> IndicatorId {
        self.indicator
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let price = current.price;
        let (upper, middle, lower) = (self.bands)(current);
        if price == 0.0 || upper == 0.0 || middle == 0.0 || lower == 0.0 {
            return not_available(self.indicator, fmt);
        }

        let (label, band, trend) = if price > upper {
            (fmt.pick("Above upper band", "上軌上方"), upper, Trend::UpperBreakout)
        } else if price < lower {
            (fmt.pick("Below lower band", "下軌下方"), lower, Trend::LowerBreakout)
        } else if price > middle {
            (fmt.pick("Above middle band", "中軌上方"), middle, Trend::AboveMiddle)
        } else if price < middle {
            (fmt.pick("Below middle band", "中軌下方"), middle, Trend::BelowMiddle)
        } else {
            let description = format!(
                "{} ({}≈{})",
                fmt.pick("Near middle band", "中軌附近"),
                fmt.price(price),
                fmt.price(middle)
            );
            return Analysis::new(description, Trend::AtMiddle);
        };

        let symbol = if price > band { ">" } else { "<" };
        let description = format!(
            "{} ({}{}{}) ({})",
            label,
            fmt.price(price),
            symbol,
            fmt.price(band),
            fmt.percent(distance(price, band))
        );
        Analysis::new(description, trend)
    }
}
