pub mod pacing;
pub mod taapi;

pub use pacing::{Pacer, RateLimitPolicy};
pub use taapi::{FetchMode, TaapiClient};

use crate::error::Result;
use crate::types::{IndicatorId, RawPoint, SeriesMap};
use std::future::Future;

/// Market selection for one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub exchange: String,
    pub symbol: String,
    pub interval: String,
    /// Number of past intervals to return in addition to the latest.
    pub backtracks: u32,
}

/// Provider of raw indicator series.
pub trait IndicatorSource: Send + Sync {
    /// Fetch one indicator's series.
    fn fetch_series(
        &self,
        indicator: IndicatorId,
        params: &FetchParams,
    ) -> impl Future<Output = Result<Vec<RawPoint>>> + Send;

    /// Fetch every requested indicator. The first failure aborts the cycle.
    fn fetch_all(
        &self,
        indicators: &[IndicatorId],
        params: &FetchParams,
    ) -> impl Future<Output = Result<SeriesMap>> + Send {
        fetch_sequentially(self, indicators, params)
    }
}

/// Fetch indicators one after another in the given order.
pub async fn fetch_sequentially<S: IndicatorSource + ?Sized>(
    source: &S,
    indicators: &[IndicatorId],
    params: &FetchParams,
) -> Result<SeriesMap> {
    let mut series = SeriesMap::new();
    for &indicator in indicators {
        let points = source.fetch_series(indicator, params).await?;
        series.insert(indicator, points);
    }
    Ok(series)
}
