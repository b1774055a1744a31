//! Indicators shown as reported: Supertrend advice and the squeeze flag.

use crate::services::signals::{Classifier, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Trend, UnifiedRecord};

pub struct Supertrend;

impl Classifier for Supertrend {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Supertrend
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        if current.supertrend_advice.is_empty() {
            return Analysis::new(fmt.pick("None", "無"), Trend::Neutral);
        }
        Analysis::new(current.supertrend_advice.clone(), Trend::Supertrend)
    }
}

pub struct Squeeze;

impl Classifier for Squeeze {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Squeeze
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        _fmt: &Presentation,
    ) -> Analysis {
        if current.squeeze {
            Analysis::new("True", Trend::Squeeze)
        } else {
            Analysis::new("False", Trend::Neutral)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supertrend_advice_copied_verbatim() {
        let record = UnifiedRecord {
            supertrend_advice: "long".to_string(),
            ..UnifiedRecord::new(3600)
        };
        let analysis = Supertrend.classify(&record, None, &Presentation::default());
        assert_eq!(analysis, Analysis::new("long", Trend::Supertrend));

        let empty = Supertrend.classify(&UnifiedRecord::new(3600), None, &Presentation::default());
        assert_eq!(empty.trend, Trend::Neutral);
    }

    #[test]
    fn test_squeeze_flag() {
        let record = UnifiedRecord {
            squeeze: true,
            ..UnifiedRecord::new(3600)
        };
        let fmt = Presentation::default();
        assert_eq!(Squeeze.classify(&record, None, &fmt).trend, Trend::Squeeze);
        assert_eq!(
            Squeeze.classify(&UnifiedRecord::new(3600), None, &fmt).description,
            "False"
        );
    }
}
