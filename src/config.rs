use crate::error::{AppError, Result};
use crate::services::signals::{Locale, Presentation};
use crate::services::SessionSettings;
use crate::sources::{FetchMode, RateLimitPolicy};
use crate::types::IndicatorId;
use std::env;
use std::time::Duration;
use tracing::warn;

/// Placeholder shipped in example env files.
const API_KEY_PLACEHOLDER: &str = "YOUR_TAAPI_API_KEY_HERE";

const DEFAULT_INDICATORS: [IndicatorId; 9] = [
    IndicatorId::Price,
    IndicatorId::Kdj,
    IndicatorId::Rsi,
    IndicatorId::Macd,
    IndicatorId::Psar,
    IndicatorId::Supertrend,
    IndicatorId::Mfi,
    IndicatorId::Dmi,
    IndicatorId::Fibonacci,
];

/// Indicator provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// TAAPI secret. Required to fetch.
    pub api_key: Option<String>,
    pub base_url: String,
    pub exchange: String,
    /// Trading pair, e.g. "ETH/USDT".
    pub symbol: String,
    /// Candle interval, e.g. "1h".
    pub interval: String,
    pub fetch_mode: FetchMode,
    pub rate_limit: RateLimitPolicy,
}

/// Refresh cycle configuration.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Backtracks requested when nothing is stored yet.
    pub backtracks: u32,
    /// Backtracks requested once data exists.
    pub incremental_backtracks: u32,
    /// How often the scheduler checks for a new hour.
    pub check_interval_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub provider: ProviderConfig,
    pub refresh: RefreshConfig,
    /// Indicators fetched each cycle, in request order.
    pub indicators: Vec<IndicatorId>,
    pub presentation: Presentation,
    /// SQLite database file (":memory:" for a volatile store).
    pub database_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults
    /// for missing or malformed values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let rate_limit = RateLimitPolicy {
            min_interval: Duration::from_millis(parsed("API_DELAY_MS").unwrap_or(15_000)),
            max_retries: parsed("RATE_LIMIT_RETRIES").unwrap_or(0) as u32,
            backoff: Duration::from_millis(parsed("RATE_LIMIT_BACKOFF_MS").unwrap_or(30_000)),
            ..RateLimitPolicy::default()
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(3001),
            provider: ProviderConfig {
                api_key: lookup("TAAPI_API_KEY")
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER),
                base_url: lookup("TAAPI_BASE_URL")
                    .unwrap_or_else(|| crate::sources::taapi::TAAPI_API_URL.to_string()),
                exchange: lookup("EXCHANGE").unwrap_or_else(|| "binance".to_string()),
                symbol: lookup("SYMBOL").unwrap_or_else(|| "ETH/USDT".to_string()),
                interval: lookup("INTERVAL").unwrap_or_else(|| "1h".to_string()),
                fetch_mode: lookup("FETCH_MODE")
                    .and_then(|m| FetchMode::from_str(&m))
                    .unwrap_or_default(),
                rate_limit,
            },
            refresh: RefreshConfig {
                backtracks: parsed("BACKTRACKS").unwrap_or(10) as u32,
                incremental_backtracks: parsed("INCREMENTAL_BACKTRACKS").unwrap_or(1) as u32,
                check_interval_secs: parsed("UPDATE_CHECK_SECS").unwrap_or(300).max(1),
            },
            indicators: lookup("INDICATORS")
                .map(|list| parse_indicators(&list))
                .filter(|list| !list.is_empty())
                .unwrap_or_else(|| DEFAULT_INDICATORS.to_vec()),
            presentation: Presentation {
                locale: lookup("LOCALE")
                    .and_then(|l| Locale::from_str(&l))
                    .unwrap_or_default(),
                decimals: parsed("DECIMAL_PLACES").unwrap_or(2).min(8) as usize,
                ..Presentation::default()
            },
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "trendboard.db".to_string()),
        }
    }

    /// The provider secret, or a configuration error when unset.
    pub fn api_key(&self) -> Result<&str> {
        self.provider.api_key.as_deref().ok_or_else(|| {
            AppError::Config("TAAPI_API_KEY is not set; add it to .env".to_string())
        })
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            exchange: self.provider.exchange.clone(),
            symbol: self.provider.symbol.clone(),
            interval: self.provider.interval.clone(),
            indicators: self.indicators.clone(),
            backtracks: self.refresh.backtracks,
            incremental_backtracks: self.refresh.incremental_backtracks,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Parse a comma-separated indicator list, dropping unknown and repeated ids.
fn parse_indicators(list: &str) -> Vec<IndicatorId> {
    let mut indicators = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match IndicatorId::from_str(name) {
            Some(id) if !indicators.contains(&id) => indicators.push(id),
            Some(_) => {}
            None => warn!("Ignoring unknown indicator '{}'", name),
        }
    }
    indicators
}
