//! MACD line vs signal line.

use crate::services::signals::format::relation;
use crate::services::signals::{Classifier, LineCross, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, UnifiedRecord};

/// Same crossover pattern as KDJ; the histogram is appended to the text.
pub struct Macd;

fn label(cross: LineCross, fmt: &Presentation) -> &'static str {
    match cross {
        LineCross::GoldenCross => fmt.pick("MACD golden cross", "MACD金叉"),
        LineCross::DeathCross => fmt.pick("MACD death cross", "MACD死叉"),
        LineCross::StillAbove => fmt.pick("MACD bullish continuation", "MACD多頭持續"),
        LineCross::StillBelow => fmt.pick("MACD bearish continuation", "MACD空頭持續"),
        LineCross::Flat => fmt.pick("MACD consolidation", "MACD盤整"),
        LineCross::Above => fmt.pick("MACD bullish", "MACD多頭"),
        LineCross::Below => fmt.pick("MACD bearish", "MACD空頭"),
        LineCross::Level => fmt.pick("MACD neutral", "MACD中性"),
    }
}

impl Classifier for Macd {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Macd
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let (line, signal) = (current.macd_value, current.signal_value);
        let usable = previous
            .map(|p| &p.record)
            .filter(|p| p.macd_value != 0.0)
            .map(|p| (p.macd_value, p.signal_value));

        let cross = LineCross::detect(usable, line, signal);
        let description = format!(
            "{} ({}{}{}) Hist:{}",
            label(cross, fmt),
            fmt.value(line),
            relation(line, signal),
            fmt.value(signal),
            fmt.value(current.hist_value)
        );
        Analysis::new(description, cross.trend())
    }
}
