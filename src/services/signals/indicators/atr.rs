//! Average True Range volatility buckets.

use crate::services::signals::{Classifier, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Trend, UnifiedRecord};

// Absolute price units. Sized for ETH-scale quotes; other instruments will
// land in the wrong bucket.
const HIGH: f64 = 100.0;
const MEDIUM: f64 = 50.0;

pub struct Atr;

impl Classifier for Atr {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Atr
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let atr = current.atr_value;
        let (label, trend) = if atr > HIGH {
            (fmt.pick("ATR high volatility", "ATR高波動"), Trend::HighVolatility)
        } else if atr > MEDIUM {
            (fmt.pick("ATR medium volatility", "ATR中波動"), Trend::MediumVolatility)
        } else {
            (fmt.pick("ATR low volatility", "ATR低波動"), Trend::LowVolatility)
        };
        Analysis::new(format!("{} ({})", label, fmt.value(atr)), trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(atr: f64) -> Analysis {
        let record = UnifiedRecord {
            atr_value: atr,
            ..UnifiedRecord::new(3600)
        };
        Atr.classify(&record, None, &Presentation::default())
    }

    #[test]
    fn test_atr_buckets() {
        assert_eq!(classify(100.01).trend, Trend::HighVolatility);
        assert_eq!(classify(100.0).trend, Trend::MediumVolatility);
        assert_eq!(classify(50.0).trend, Trend::LowVolatility);
        assert_eq!(classify(0.0).trend, Trend::LowVolatility);
    }

    #[test]
    fn test_atr_description() {
        assert_eq!(classify(72.5).description, "ATR medium volatility (72.50)");
    }
}
