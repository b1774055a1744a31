//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Semaphore;
use trendboard::error::{AppError, Result};
use trendboard::services::{Presentation, SessionSettings};
use trendboard::sources::{FetchParams, IndicatorSource};
use trendboard::types::{series_from_value, IndicatorId, RawPoint, SeriesMap};

/// Start of an hour, comfortably in the past.
pub const BASE: i64 = 1_699_999_200;
pub const HOUR: i64 = 3600;

/// One scripted provider reply.
pub enum Reply {
    Series(SeriesMap),
    RateLimited,
    Status(u16),
}

/// Source that answers each cycle from a queue of replies and records the
/// backtracks each cycle asked for.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    requested: Mutex<Vec<u32>>,
    gate: Option<Semaphore>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    /// Like `new`, but every cycle waits for a permit on the gate first.
    pub fn gated(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            gate: Some(Semaphore::new(0)),
            ..Default::default()
        }
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Backtracks requested per cycle, in call order.
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }

    fn next_reply(&self, params: &FetchParams) -> Option<Reply> {
        self.requested.lock().unwrap().push(params.backtracks);
        self.replies.lock().unwrap().pop_front()
    }
}

impl IndicatorSource for ScriptedSource {
    async fn fetch_series(&self, indicator: IndicatorId, params: &FetchParams) -> Result<Vec<RawPoint>> {
        let mut series = self.fetch_all(&[indicator], params).await?;
        Ok(series.remove(&indicator).unwrap_or_default())
    }

    async fn fetch_all(&self, indicators: &[IndicatorId], params: &FetchParams) -> Result<SeriesMap> {
        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| AppError::Internal("gate closed".to_string()))?;
            permit.forget();
        }

        match self.next_reply(params) {
            Some(Reply::Series(mut series)) => {
                series.retain(|indicator, _| indicators.contains(indicator));
                Ok(series)
            }
            Some(Reply::RateLimited) => Err(AppError::RateLimited("slow down".to_string())),
            Some(Reply::Status(status)) => Err(AppError::FetchFailed {
                indicator: "bulk".to_string(),
                status,
                body: "scripted failure".to_string(),
            }),
            None => Err(AppError::FetchFailed {
                indicator: "bulk".to_string(),
                status: 500,
                body: "script exhausted".to_string(),
            }),
        }
    }
}

/// Price, KDJ and RSI points for one candle.
pub struct Candle {
    pub timestamp: i64,
    pub price: f64,
    pub k: f64,
    pub d: f64,
    pub rsi: f64,
}

impl Candle {
    pub fn new(timestamp: i64, price: f64, k: f64, d: f64, rsi: f64) -> Self {
        Self {
            timestamp,
            price,
            k,
            d,
            rsi,
        }
    }
}

fn points(candles: &[&Candle], f: impl Fn(&Candle) -> Value) -> Vec<RawPoint> {
    series_from_value(Value::Array(candles.iter().map(|c| f(c)).collect()))
}

/// Build one cycle's series, newest candle first like the provider does.
pub fn cycle(candles: &[Candle]) -> SeriesMap {
    let mut ordered: Vec<&Candle> = candles.iter().collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut series = SeriesMap::new();
    series.insert(
        IndicatorId::Price,
        points(&ordered, |c| json!({"timestamp": c.timestamp, "value": c.price})),
    );
    series.insert(
        IndicatorId::Kdj,
        points(&ordered, |c| json!({"timestamp": c.timestamp, "valueK": c.k, "valueD": c.d})),
    );
    series.insert(
        IndicatorId::Rsi,
        points(&ordered, |c| json!({"timestamp": c.timestamp, "value": c.rsi})),
    );
    series
}

pub fn settings() -> SessionSettings {
    SessionSettings {
        exchange: "binance".to_string(),
        symbol: "ETH/USDT".to_string(),
        interval: "1h".to_string(),
        indicators: vec![IndicatorId::Price, IndicatorId::Kdj, IndicatorId::Rsi],
        backtracks: 10,
        incremental_backtracks: 1,
    }
}

pub fn presentation() -> Presentation {
    Presentation::default()
}
