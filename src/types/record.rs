use super::{IndicatorId, Trend};
use serde::{Deserialize, Serialize};

/// All indicator values for one timestamp.
///
/// Every field starts at its zero value so partially fetched cycles never
/// leave anything unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnifiedRecord {
    /// Unix timestamp (seconds).
    pub timestamp: i64,
    /// Intervals back from the most recent one (0 = latest).
    pub backtrack: i64,
    pub price: f64,
    pub k_value: f64,
    pub d_value: f64,
    pub j_value: f64,
    pub rsi_value: f64,
    pub macd_value: f64,
    pub signal_value: f64,
    pub hist_value: f64,
    pub bbands_upper: f64,
    pub bbands_middle: f64,
    pub bbands_lower: f64,
    pub keltner_upper: f64,
    pub keltner_middle: f64,
    pub keltner_lower: f64,
    pub squeeze: bool,
    pub psar_value: f64,
    pub supertrend_advice: String,
    pub mfi_value: f64,
    pub atr_value: f64,
    pub adx_value: f64,
    pub pdi_value: f64,
    pub mdi_value: f64,
    /// Retracement fraction derived from the swing and current price (0-1).
    pub fib_value: f64,
    pub fib_current_price: f64,
    /// Swing direction reported by the provider ("UPTREND" or other).
    pub fib_trend: String,
    pub fib_start_price: f64,
    pub fib_end_price: f64,
}

impl UnifiedRecord {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }
}

/// Description and trend tag for one indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub description: String,
    pub trend: Trend,
}

impl Analysis {
    pub fn new(description: impl Into<String>, trend: Trend) -> Self {
        Self {
            description: description.into(),
            trend,
        }
    }
}

/// Per-indicator analyses of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signals {
    pub kdj: Analysis,
    pub rsi: Analysis,
    pub macd: Analysis,
    pub bbands: Analysis,
    pub keltner: Analysis,
    pub squeeze: Analysis,
    pub psar: Analysis,
    pub supertrend: Analysis,
    pub mfi: Analysis,
    pub atr: Analysis,
    pub dmi: Analysis,
    pub fibonacci: Analysis,
}

impl Signals {
    pub fn get(&self, indicator: IndicatorId) -> Option<&Analysis> {
        match indicator {
            IndicatorId::Price => None,
            IndicatorId::Kdj => Some(&self.kdj),
            IndicatorId::Rsi => Some(&self.rsi),
            IndicatorId::Macd => Some(&self.macd),
            IndicatorId::Bbands => Some(&self.bbands),
            IndicatorId::Keltner => Some(&self.keltner),
            IndicatorId::Squeeze => Some(&self.squeeze),
            IndicatorId::Psar => Some(&self.psar),
            IndicatorId::Supertrend => Some(&self.supertrend),
            IndicatorId::Mfi => Some(&self.mfi),
            IndicatorId::Atr => Some(&self.atr),
            IndicatorId::Dmi => Some(&self.dmi),
            IndicatorId::Fibonacci => Some(&self.fibonacci),
        }
    }

    /// Store an analysis. Price carries no analysis and is ignored.
    pub fn set(&mut self, indicator: IndicatorId, analysis: Analysis) {
        let slot = match indicator {
            IndicatorId::Price => return,
            IndicatorId::Kdj => &mut self.kdj,
            IndicatorId::Rsi => &mut self.rsi,
            IndicatorId::Macd => &mut self.macd,
            IndicatorId::Bbands => &mut self.bbands,
            IndicatorId::Keltner => &mut self.keltner,
            IndicatorId::Squeeze => &mut self.squeeze,
            IndicatorId::Psar => &mut self.psar,
            IndicatorId::Supertrend => &mut self.supertrend,
            IndicatorId::Mfi => &mut self.mfi,
            IndicatorId::Atr => &mut self.atr,
            IndicatorId::Dmi => &mut self.dmi,
            IndicatorId::Fibonacci => &mut self.fibonacci,
        };
        *slot = analysis;
    }
}

/// A unified record plus its analyses. Immutable once computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: UnifiedRecord,
    pub signals: Signals,
}

impl ClassifiedRecord {
    pub fn timestamp(&self) -> i64 {
        self.record.timestamp
    }
}
