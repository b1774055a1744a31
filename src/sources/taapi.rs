//! TAAPI.IO indicator client.
//!
//! Supports one GET per indicator (paced) or a single bulk POST carrying
//! every indicator of the cycle.

use super::{fetch_sequentially, FetchParams, IndicatorSource, Pacer, RateLimitPolicy};
use crate::error::{AppError, Result};
use crate::types::{
    series_from_value, BulkConstruct, BulkIndicator, BulkRequest, BulkResponse, IndicatorId,
    RawPoint, SeriesMap,
};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const TAAPI_API_URL: &str = "https://api.taapi.io";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How a cycle's indicators are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// One request per indicator, spaced by the pacer.
    #[default]
    Sequential,
    /// One bulk request for all indicators.
    Bulk,
}

impl FetchMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "single" => Some(Self::Sequential),
            "bulk" => Some(Self::Bulk),
            _ => None,
        }
    }
}

/// TAAPI REST client.
pub struct TaapiClient {
    client: Client,
    base_url: String,
    secret: String,
    mode: FetchMode,
    pacer: Pacer,
}

impl TaapiClient {
    pub fn new(
        base_url: impl Into<String>,
        secret: impl Into<String>,
        mode: FetchMode,
        policy: RateLimitPolicy,
    ) -> Self {
        let client = Client::builder()
            .user_agent("trendboard/0.1 (Indicator Dashboard)")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
            mode,
            pacer: Pacer::new(policy),
        }
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    async fn get_series(&self, indicator: IndicatorId, params: &FetchParams) -> Result<Vec<RawPoint>> {
        let url = format!("{}/{}", self.base_url, indicator.endpoint());
        debug!("Fetching {} ({} backtracks)", indicator, params.backtracks);

        let response = self
            .client
            .get(&url)
            .query(&series_query(&self.secret, params))
            .send()
            .await?;
        let response = check_status(indicator.name(), response).await?;

        let body: Value = response.json().await?;
        let points = series_from_value(body);
        debug!("Received {} {} points", points.len(), indicator);
        Ok(points)
    }

    async fn post_bulk(&self, indicators: &[IndicatorId], params: &FetchParams) -> Result<SeriesMap> {
        let url = format!("{}/bulk", self.base_url);
        let request = bulk_request(&self.secret, indicators, params);
        info!("Fetching {} indicators in one bulk request", indicators.len());

        let response = self.client.post(&url).json(&request).send().await?;
        let response = check_status("bulk", response).await?;

        let body: BulkResponse = response.json().await?;
        Ok(body.into_series_map())
    }
}

impl IndicatorSource for TaapiClient {
    async fn fetch_series(&self, indicator: IndicatorId, params: &FetchParams) -> Result<Vec<RawPoint>> {
        self.pacer.run(|| self.get_series(indicator, params)).await
    }

    async fn fetch_all(&self, indicators: &[IndicatorId], params: &FetchParams) -> Result<SeriesMap> {
        match self.mode {
            FetchMode::Sequential => fetch_sequentially(self, indicators, params).await,
            FetchMode::Bulk => {
                let mut series = self.pacer.run(|| self.post_bulk(indicators, params)).await?;
                // Requested but missing from the reply counts as empty.
                for &indicator in indicators {
                    series.entry(indicator).or_default();
                }
                series.retain(|indicator, _| indicators.contains(indicator));
                Ok(series)
            }
        }
    }
}

/// Query string for a single-indicator request.
fn series_query(secret: &str, params: &FetchParams) -> Vec<(&'static str, String)> {
    vec![
        ("secret", secret.to_string()),
        ("exchange", params.exchange.clone()),
        ("symbol", params.symbol.clone()),
        ("interval", params.interval.clone()),
        ("backtracks", params.backtracks.to_string()),
        ("addResultTimestamp", "true".to_string()),
    ]
}

fn bulk_request(secret: &str, indicators: &[IndicatorId], params: &FetchParams) -> BulkRequest {
    BulkRequest {
        secret: secret.to_string(),
        construct: BulkConstruct {
            exchange: params.exchange.clone(),
            symbol: params.symbol.clone(),
            interval: params.interval.clone(),
            indicators: indicators
                .iter()
                .map(|&indicator| BulkIndicator::new(indicator, params.backtracks))
                .collect(),
        },
    }
}

/// Map a non-success status to the matching error.
fn status_error(target: &str, status: StatusCode, body: &str) -> Option<AppError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Some(AppError::RateLimited(format!(
            "{} request throttled, try again later",
            target
        )));
    }
    if !status.is_success() {
        return Some(AppError::FetchFailed {
            indicator: target.to_string(),
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    None
}

async fn check_status(target: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    warn!("Provider returned {} for {}: {}", status, target, excerpt);
    match status_error(target, status, &excerpt) {
        Some(err) => Err(err),
        None => Err(AppError::Internal(format!("unexpected status {}", status))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FetchParams {
        FetchParams {
            exchange: "binance".to_string(),
            symbol: "ETH/USDT".to_string(),
            interval: "1h".to_string(),
            backtracks: 10,
        }
    }

    #[test]
    fn test_fetch_mode_parsing() {
        assert_eq!(FetchMode::from_str("BULK"), Some(FetchMode::Bulk));
        assert_eq!(FetchMode::from_str("sequential"), Some(FetchMode::Sequential));
        assert_eq!(FetchMode::from_str("parallel"), None);
    }

    #[test]
    fn test_series_query_parameters() {
        let query = series_query("key", &params());
        assert!(query.contains(&("symbol", "ETH/USDT".to_string())));
        assert!(query.contains(&("backtracks", "10".to_string())));
        assert!(query.contains(&("addResultTimestamp", "true".to_string())));
    }

    #[test]
    fn test_bulk_request_shape() {
        let request = bulk_request("key", &[IndicatorId::Kdj, IndicatorId::Psar], &params());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["secret"], "key");
        assert_eq!(json["construct"]["symbol"], "ETH/USDT");
        assert_eq!(json["construct"]["indicators"][0]["id"], "kdj");
        assert_eq!(json["construct"]["indicators"][0]["indicator"], "stoch");
        assert_eq!(json["construct"]["indicators"][1]["indicator"], "sar");
        assert_eq!(json["construct"]["indicators"][1]["backtracks"], 10);
    }

    #[test]
    fn test_status_mapping() {
        let throttled = status_error("RSI", StatusCode::TOO_MANY_REQUESTS, "").unwrap();
        assert!(throttled.is_rate_limited());

        let failed = status_error("RSI", StatusCode::INTERNAL_SERVER_ERROR, "boom").unwrap();
        assert_eq!(failed.to_string(), "Fetching RSI failed: 500 - boom");

        assert!(status_error("RSI", StatusCode::OK, "").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TaapiClient::new(
            "https://api.taapi.io/",
            "key",
            FetchMode::Bulk,
            RateLimitPolicy::unpaced(),
        );
        assert_eq!(client.base_url, TAAPI_API_URL);
        assert_eq!(client.mode(), FetchMode::Bulk);
    }
}
