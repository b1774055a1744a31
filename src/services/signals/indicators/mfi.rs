//! Money Flow Index zones.

use crate::services::signals::{Classifier, Presentation, Zone};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, UnifiedRecord};

const OVERBOUGHT: f64 = 80.0;
const OVERSOLD: f64 = 20.0;

pub struct Mfi;

impl Classifier for Mfi {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Mfi
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let value = current.mfi_value;
        let zone = Zone::of(value, OVERBOUGHT, OVERSOLD);
        Analysis::new(
            zone.describe(IndicatorId::Mfi, value, OVERBOUGHT, OVERSOLD, fmt),
            zone.trend(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::Locale;
    use crate::types::Trend;

    fn classify(value: f64, fmt: &Presentation) -> Analysis {
        let record = UnifiedRecord {
            mfi_value: value,
            ..UnifiedRecord::new(3600)
        };
        Mfi.classify(&record, None, fmt)
    }

    #[test]
    fn test_mfi_thresholds() {
        let fmt = Presentation::default();
        assert_eq!(classify(80.0, &fmt).trend, Trend::Overbought);
        assert_eq!(classify(79.0, &fmt).trend, Trend::Bullish);
        assert_eq!(classify(50.0, &fmt).trend, Trend::Neutral);
        assert_eq!(classify(21.0, &fmt).trend, Trend::Bearish);
        assert_eq!(classify(20.0, &fmt).trend, Trend::Oversold);
    }

    #[test]
    fn test_mfi_localized_description() {
        let fmt = Presentation::new(Locale::ZhTw, 2);
        assert_eq!(classify(85.0, &fmt).description, "MFI超買 (≥80)(85.00)");
    }
}
