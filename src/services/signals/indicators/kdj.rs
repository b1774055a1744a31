//! KDJ (stochastic) crossover rules.

use crate::services::signals::format::relation;
use crate::services::signals::{Classifier, LineCross, Presentation};
use crate::types::{Analysis, ClassifiedRecord, IndicatorId, UnifiedRecord};

/// Compares K against D; a previous point is usable when its K is non-zero.
pub struct Kdj;

fn label(cross: LineCross, fmt: &Presentation) -> &'static str {
    match cross {
        LineCross::GoldenCross => fmt.pick("KDJ golden cross (K crossed above D)", "KDJ金叉 (K線上穿D線)"),
        LineCross::DeathCross => fmt.pick("KDJ death cross (K crossed below D)", "KDJ死叉 (K線下穿D線)"),
        LineCross::StillAbove => fmt.pick("KDJ bullish continuation (K>D)", "KDJ多頭持續 (K>D)"),
        LineCross::StillBelow => fmt.pick("KDJ bearish continuation (K<D)", "KDJ空頭持續 (K<D)"),
        LineCross::Flat => fmt.pick("KDJ consolidation (K≈D)", "KDJ盤整 (K≈D)"),
        LineCross::Above => fmt.pick("KDJ bullish (K>D)", "KDJ多頭 (K>D)"),
        LineCross::Below => fmt.pick("KDJ bearish (K<D)", "KDJ空頭 (K<D)"),
        LineCross::Level => fmt.pick("KDJ neutral", "KDJ中性"),
    }
}

impl Classifier for Kdj {
    fn indicator(&self) -> IndicatorId {
        IndicatorId::Kdj
    }

    fn classify(
        &self,
        current: &UnifiedRecord,
        previous: Option<&ClassifiedRecord>,
        fmt: &Presentation,
    ) -> Analysis {
        let (k, d) = (current.k_value, current.d_value);
        let usable = previous
            .map(|p| &p.record)
            .filter(|p| p.k_value != 0.0)
            .map(|p| (p.k_value, p.d_value));

        let cross = LineCross::detect(usable, k, d);
        let description = format!(
            "{} ({}{}{})",
            label(cross, fmt),
            fmt.value(k),
            relation(k, d),
            fmt.value(d)
        );
        Analysis::new(description, cross.trend())
    }
}
