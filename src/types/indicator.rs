use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Indicators the board knows how to merge and classify.
///
/// Declaration order is the fold order used by the merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorId {
    Price,
    Kdj,
    Rsi,
    Macd,
    Bbands,
    Keltner,
    Squeeze,
    Psar,
    Supertrend,
    Mfi,
    Atr,
    Dmi,
    Fibonacci,
}

impl IndicatorId {
    pub const ALL: [IndicatorId; 13] = [
        IndicatorId::Price,
        IndicatorId::Kdj,
        IndicatorId::Rsi,
        IndicatorId::Macd,
        IndicatorId::Bbands,
        IndicatorId::Keltner,
        IndicatorId::Squeeze,
        IndicatorId::Psar,
        IndicatorId::Supertrend,
        IndicatorId::Mfi,
        IndicatorId::Atr,
        IndicatorId::Dmi,
        IndicatorId::Fibonacci,
    ];

    /// Parse from a series id or provider endpoint name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "price" => Some(Self::Price),
            "kdj" | "stoch" | "stochastic" => Some(Self::Kdj),
            "rsi" => Some(Self::Rsi),
            "macd" => Some(Self::Macd),
            "bbands" | "bollinger" => Some(Self::Bbands),
            "keltner" | "keltnerchannels" => Some(Self::Keltner),
            "squeeze" => Some(Self::Squeeze),
            "psar" | "sar" => Some(Self::Psar),
            "supertrend" => Some(Self::Supertrend),
            "mfi" => Some(Self::Mfi),
            "atr" => Some(Self::Atr),
            "dmi" => Some(Self::Dmi),
            "fibonacci" | "fibonacciretracement" | "fib" => Some(Self::Fibonacci),
            _ => None,
        }
    }

    /// Series id used in bulk requests and responses.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Kdj => "kdj",
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::Bbands => "bbands",
            Self::Keltner => "keltner",
            Self::Squeeze => "squeeze",
            Self::Psar => "psar",
            Self::Supertrend => "supertrend",
            Self::Mfi => "mfi",
            Self::Atr => "atr",
            Self::Dmi => "dmi",
            Self::Fibonacci => "fibonacci",
        }
    }

    /// Provider endpoint that serves this indicator.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Kdj => "stoch",
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::Bbands => "bbands",
            Self::Keltner => "keltnerchannels",
            Self::Squeeze => "squeeze",
            Self::Psar => "sar",
            Self::Supertrend => "supertrend",
            Self::Mfi => "mfi",
            Self::Atr => "atr",
            Self::Dmi => "dmi",
            Self::Fibonacci => "fibonacciretracement",
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::Kdj => "KDJ",
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::Bbands => "BBands",
            Self::Keltner => "Keltner",
            Self::Squeeze => "Squeeze",
            Self::Psar => "PSAR",
            Self::Supertrend => "Supertrend",
            Self::Mfi => "MFI",
            Self::Atr => "ATR",
            Self::Dmi => "DMI",
            Self::Fibonacci => "Fib",
        }
    }
}

impl std::fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One loosely-typed point of an indicator series as returned by the provider.
///
/// Field names differ between indicators and provider versions, so values
/// are looked up through prioritized candidate lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPoint(Map<String, Value>);

impl RawPoint {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// UNIX-second timestamp. Missing, null, non-numeric and zero values
    /// all count as absent.
    pub fn timestamp(&self) -> Option<i64> {
        let ts = match self.0.get("timestamp")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
            Value::String(s) => s.trim().parse::<f64>().ok()? as i64,
            _ => return None,
        };
        (ts != 0).then_some(ts)
    }

    /// Backtrack offset, only when explicitly present (0 included).
    pub fn backtrack(&self) -> Option<i64> {
        match self.0.get("backtrack")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// First candidate field that is present and not null.
    pub fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// Numeric value of the first present candidate, 0 otherwise.
    pub fn number(&self, keys: &[&str]) -> f64 {
        self.first_present(keys).map(as_number).unwrap_or(0.0)
    }

    /// String value of the first present candidate, empty otherwise.
    pub fn text(&self, keys: &[&str]) -> String {
        match self.first_present(keys) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Boolean value of the first present candidate, false otherwise.
    pub fn flag(&self, keys: &[&str]) -> bool {
        match self.first_present(keys) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1"),
            _ => false,
        }
    }
}

impl From<Map<String, Value>> for RawPoint {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn as_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

/// Normalize a provider payload into a series: arrays keep their object
/// elements in order, a single object becomes a one-element series, and
/// anything else is empty.
pub fn series_from_value(value: Value) -> Vec<RawPoint> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(RawPoint(fields)),
                _ => None,
            })
            .collect(),
        Value::Object(fields) => vec![RawPoint(fields)],
        _ => Vec::new(),
    }
}

/// Raw series per indicator. Missing keys are treated as empty series.
pub type SeriesMap = BTreeMap<IndicatorId, Vec<RawPoint>>;

/// Indicators whose series came back non-empty this cycle.
pub fn fetched_indicators(series: &SeriesMap) -> BTreeSet<IndicatorId> {
    series
        .iter()
        .filter(|(_, points)| !points.is_empty())
        .map(|(id, _)| *id)
        .collect()
}

/// One indicator entry of a bulk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkIndicator {
    pub id: String,
    pub indicator: String,
    pub backtracks: u32,
    pub add_result_timestamp: bool,
}

impl BulkIndicator {
    pub fn new(indicator: IndicatorId, backtracks: u32) -> Self {
        Self {
            id: indicator.id().to_string(),
            indicator: indicator.endpoint().to_string(),
            backtracks,
            add_result_timestamp: true,
        }
    }
}

/// Construct section of a bulk request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkConstruct {
    pub exchange: String,
    pub symbol: String,
    pub interval: String,
    pub indicators: Vec<BulkIndicator>,
}

/// Bulk request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    pub secret: String,
    pub construct: BulkConstruct,
}

/// One entry of a bulk response.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkEntry {
    pub id: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Bulk response: `{data: [{id, result}, ...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub data: Vec<BulkEntry>,
}

impl BulkResponse {
    /// Project `data[].result` keyed by `data[].id` into the same series map
    /// the per-call fetch produces. Unknown ids are ignored and the first
    /// entry for an id wins.
    pub fn into_series_map(self) -> SeriesMap {
        let mut map = SeriesMap::new();
        for entry in self.data {
            let Some(indicator) = IndicatorId::from_str(&entry.id) else {
                debug!("Ignoring bulk entry with unknown id {}", entry.id);
                continue;
            };
            if !entry.errors.is_empty() {
                warn!("Bulk entry {} reported errors: {:?}", entry.id, entry.errors);
            }
            map.entry(indicator)
                .or_insert_with(|| series_from_value(entry.result));
        }
        map
    }
}
