//! Directional Movement Index.

use crate::services::signals::{Classifier, Locale, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, Trend, UnifiedRecord};

/// ADX at or above this makes a directional trend "strong".
const STRONG_ADX: f64 = 25.0;

/// Direction from +DI vs -DI, strength from ADX.
pub struct Dmi;

fn strength(adx: f64, fmt: &Presentation) -> &'static str {
    if adx >= 50.0 {
        fmt.pick("extreme", "極強")
    } else if adx >= STRONG_ADX {
        fmt.pick("strong", "強勢")
    } else if adx >= 20.0 {
        fmt.pick("moderate", "中等")
    } else {
        fmt.pick("weak", "弱勢")
    }
}

impl Classifier for Dmi {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Dmi
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        _previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let (adx, pdi, mdi) = (current.adx_value, current.pdi_value, current.mdi_value);
        let strong = adx >= STRONG_ADX;

        let (direction, lines, trend) = if pdi > mdi {
            (
                fmt.pick("Uptrend", "上漲"),
                format!("PDI:{}>MDI:{}", fmt.value(pdi), fmt.value(mdi)),
                if strong { Trend::StrongBullish } else { Trend::WeakBullish },
            )
        } else if mdi > pdi {
            (
                fmt.pick("Downtrend", "下跌"),
                format!("MDI:{}>PDI:{}", fmt.value(mdi), fmt.value(pdi)),
                if strong { Trend::StrongBearish } else { Trend::WeakBearish },
            )
        } else {
            (
                fmt.pick("Sideways", "盤整"),
                format!("PDI:{}≈MDI:{}", fmt.value(pdi), fmt.value(mdi)),
                Trend::Sideways,
            )
        };

        let heading = match fmt.locale {
            Locale::En => {
                format!("{} ({})", direction, strength(adx, fmt))
            }
            Locale::ZhTw => {
                format!("{}{}", direction, strength(adx, fmt))
            }
        };
        let description = format!("{} ADX:{} ({})", heading, fmt.value(adx), lines);
        Analysis::new(description, trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(adx: f64, pdi: f64, mdi: f64) -> UnifiedRecord {
        UnifiedRecord {
            adx_value: adx,
            pdi_value: pdi,
            mdi_value: mdi,
            ..UnifiedRecord::new(3600)
        }
    }

    fn trend(adx: f64, pdi: f64, mdi: f64) -> Trend {
        Dmi.classify(&record(adx, pdi, mdi), None, &Presentation::default())
            .trend
    }

    #[test]
    fn test_dmi_direction_and_strength() {
        assert_eq!(trend(25.0, 30.0, 10.0), Trend::StrongBullish);
        assert_eq!(trend(24.9, 30.0, 10.0), Trend::WeakBullish);
        assert_eq!(trend(40.0, 10.0, 30.0), Trend::StrongBearish);
        assert_eq!(trend(10.0, 10.0, 30.0), Trend::WeakBearish);
        assert_eq!(trend(60.0, 20.0, 20.0), Trend::Sideways);
    }

    #[test]
    fn test_dmi_description() {
        let analysis = Dmi.classify(&record(55.0, 30.0, 10.0), None, &Presentation::default());
        assert_eq!(
            analysis.description,
            "Uptrend (extreme) ADX:55.00 (PDI:30.00>MDI:10.00)"
        );

        let fmt = Presentation::new(Locale::ZhTw, 2);
        let analysis = Dmi.classify(&record(21.0, 10.0, 15.0), None, &fmt);
        assert_eq!(analysis.description, "下跌中等 ADX:21.00 (MDI:15.00>PDI:10.00)");
    }
}
