//! Refresh session: owns the fetch source, the record store and the
//! in-flight guard, and runs fetch → merge → classify → persist cycles.

use crate::error::{AppError, Result};
use crate::services::pipeline;
use crate::services::signals::{Locale, Presentation};
use crate::services::store::{needs_hourly_update, RecordStore};
use crate::sources::{FetchParams, IndicatorSource};
use crate::types::{ClassifiedRecord, IndicatorId, SeriesMap};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// What a session fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub exchange: String,
    pub symbol: String,
    pub interval: String,
    pub indicators: Vec<IndicatorId>,
    /// Backtracks for the first load into an empty store.
    pub backtracks: u32,
    /// Backtracks once the store holds data.
    pub incremental_backtracks: u32,
}

impl SessionSettings {
    pub fn params(&self, backtracks: u32) -> FetchParams {
        FetchParams {
            exchange: self.exchange.clone(),
            symbol: self.symbol.clone(),
            interval: self.interval.clone(),
            backtracks,
        }
    }
}

/// Records ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Newest first.
    pub records: Vec<ClassifiedRecord>,
    pub last_update: Option<i64>,
    /// Set when a refresh failed and stored data is shown instead.
    pub warning: Option<String>,
    /// True when this load ran a successful refresh.
    pub refreshed: bool,
}

pub struct Session<S, R> {
    source: S,
    store: R,
    settings: SessionSettings,
    presentation: Presentation,
    refresh_guard: Mutex<()>,
}

impl<S, R> Session<S, R> {
    pub fn new(source: S, store: R, settings: SessionSettings, presentation: Presentation) -> Self {
        Self {
            source,
            store,
            settings,
            presentation,
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_guard.try_lock().is_err()
    }
}

impl<S, R> Session<S, R>
where
    S: IndicatorSource,
    R: RecordStore,
{
    /// Run one refresh cycle now.
    pub async fn refresh(&self) -> Result<Vec<ClassifiedRecord>> {
        self.refresh_at(chrono::Utc::now().timestamp()).await
    }

    /// Run one refresh cycle, stamping the last-update mark with `now`.
    ///
    /// Fails with [`AppError::RefreshInProgress`] while another cycle runs.
    /// Any fetch or merge failure aborts the cycle before the store is
    /// touched.
    pub async fn refresh_at(&self, now: i64) -> Result<Vec<ClassifiedRecord>> {
        let _guard = self
            .refresh_guard
            .try_lock()
            .map_err(|_| AppError::RefreshInProgress)?;

        let latest = self.store.latest_timestamp()?;
        let backtracks = if latest == 0 {
            self.settings.backtracks
        } else {
            self.settings.incremental_backtracks
        };
        let params = self.settings.params(backtracks);

        info!(
            "Refreshing {} {} indicators for {} {} ({} backtracks)",
            self.settings.indicators.len(),
            params.exchange,
            params.symbol,
            params.interval,
            backtracks
        );

        let series = self
            .source
            .fetch_all(&self.settings.indicators, &params)
            .await?;

        let seed = match oldest_timestamp(&series) {
            Some(oldest) => self.store.latest_before(oldest)?,
            None => None,
        };

        let classified = pipeline::process(&series, seed.as_ref(), &self.presentation)?;
        if classified.is_empty() {
            return Err(AppError::NoData);
        }

        self.store.upsert(&classified)?;
        self.store.set_last_update_mark(now)?;

        info!(
            "Refresh complete: {} records, newest {}",
            classified.len(),
            classified[0].timestamp()
        );
        Ok(classified)
    }

    /// Every stored record, newest first.
    pub fn stored(&self) -> Result<Vec<ClassifiedRecord>> {
        let mut records = self.store.get_all()?;
        records.reverse();
        Ok(records)
    }

    /// Load records for display, refreshing first when a new hour started.
    pub async fn load(&self) -> Result<Snapshot> {
        self.load_at(chrono::Utc::now().timestamp()).await
    }

    /// Load as of `now`.
    ///
    /// A failed refresh falls back to stored data with a warning; with
    /// nothing stored the error is returned.
    pub async fn load_at(&self, now: i64) -> Result<Snapshot> {
        let latest = self.store.latest_timestamp()?;
        let mut warning = None;
        let mut refreshed = false;

        if needs_hourly_update(latest, now) {
            match self.refresh_at(now).await {
                Ok(_) => refreshed = true,
                Err(e) => {
                    if latest == 0 {
                        return Err(e);
                    }
                    warn!("Refresh failed, serving stored data: {}", e);
                    warning = Some(self.fallback_warning(&e));
                }
            }
        }

        Ok(Snapshot {
            records: self.stored()?,
            last_update: self.store.last_update_mark()?,
            warning,
            refreshed,
        })
    }

    fn fallback_warning(&self, error: &AppError) -> String {
        let fmt = &self.presentation;
        match error {
            e if e.is_rate_limited() => fmt
                .pick(
                    "API rate limit reached, showing stored data. Please try again later.",
                    "API 請求頻率超限，顯示已儲存的資料，請稍後再試。",
                )
                .to_string(),
            AppError::RefreshInProgress => fmt
                .pick(
                    "A refresh is already running, showing stored data.",
                    "資料更新中，顯示已儲存的資料。",
                )
                .to_string(),
            e => match fmt.locale {
                Locale::En => {
                    format!("Could not refresh indicators ({}), showing stored data.", e)
                }
                Locale::ZhTw => {
                    format!("無法更新指標資料（{}），顯示已儲存的資料。", e)
                }
            },
        }
    }
}

/// Oldest timestamp in any fetched series.
fn oldest_timestamp(series: &SeriesMap) -> Option<i64> {
    series
        .values()
        .flat_map(|points| points.iter().filter_map(|p| p.timestamp()))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::series_from_value;
    use serde_json::json;

    #[test]
    fn test_oldest_timestamp_across_series() {
        let mut series = SeriesMap::new();
        series.insert(
            IndicatorId::Price,
            series_from_value(json!([{"timestamp": 7200}, {"value": 1}])),
        );
        series.insert(IndicatorId::Rsi, series_from_value(json!([{"timestamp": 3600}])));
        assert_eq!(oldest_timestamp(&series), Some(3600));
        assert_eq!(oldest_timestamp(&SeriesMap::new()), None);
    }

    #[test]
    fn test_params_carry_backtracks() {
        let settings = SessionSettings {
            exchange: "binance".into(),
            symbol: "ETH/USDT".into(),
            interval: "1h".into(),
            indicators: vec![IndicatorId::Price],
            backtracks: 10,
            incremental_backtracks: 1,
        };
        assert_eq!(settings.params(3).backtracks, 3);
        assert_eq!(settings.params(3).symbol, "ETH/USDT");
    }
}
