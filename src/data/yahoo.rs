//! Yahoo Finance adapter for daily OHLCV bars.
//!
//! # API
//! `GET /v8/finance/chart/{symbol}?range={range}&interval=1d`
//!
//! No token required. Taiwan symbols use the `.TW` (TWSE) and `.TWO` (TPEx)
//! suffixes. Halted sessions come back as nulls in the quote arrays and are
//! dropped during conversion.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use super::provider::{BarDataProvider, ProviderError};
use super::DailyBar;

// ============================================================================
// Constants
// ============================================================================

/// Yahoo Finance chart API base URL
const YAHOO_API_BASE: &str = "https://query1.finance.yahoo.com";

/// Chart endpoint prefix
const CHART_ENDPOINT: &str = "/v8/finance/chart";

/// Request timeout
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Yahoo rejects requests without a browser-ish user agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) twse-screener/0.1";

/// Map a session lookback to the coarse range strings the chart API accepts.
fn range_for_lookback(sessions: usize) -> &'static str {
    match sessions {
        0..=5 => "5d",
        6..=22 => "1mo",
        23..=66 => "3mo",
        67..=130 => "6mo",
        _ => "1y",
    }
}

// ============================================================================
// Response Shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Convert one chart result into a chronological bar series.
///
/// Sessions with any missing field (trading halt, partial data) are skipped.
fn bars_from_chart(result: &ChartResult) -> Vec<DailyBar> {
    let Some(timestamps) = result.timestamp.as_deref() else {
        return Vec::new();
    };
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let fields = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if !close.is_finite() || !volume.is_finite() {
            continue;
        }
        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    bars
}

// ============================================================================
// Yahoo Gateway
// ============================================================================

/// Yahoo Finance gateway for daily bars.
pub struct YahooGateway {
    client: reqwest::Client,
    base_url: String,
}

impl YahooGateway {
    /// Create a gateway against the public Yahoo endpoint.
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_API_BASE.to_string())
    }

    /// Create a gateway against a custom base URL (tests, proxies).
    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }
}

impl Default for YahooGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BarDataProvider for YahooGateway {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn daily_bars(
        &self,
        symbol: &str,
        lookback: usize,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        let url = format!("{}{}/{}", self.base_url, CHART_ENDPOINT, symbol);
        let range = range_for_lookback(lookback);

        let response = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?;

        let body: ChartResponse = response.json().await?;

        if let Some(error) = body.chart.error {
            return Err(ProviderError::DataNotAvailable(format!(
                "{}: {}",
                symbol, error
            )));
        }

        let result = body
            .chart
            .result
            .as_ref()
            .and_then(|r| r.first())
            .ok_or_else(|| ProviderError::DataNotAvailable(symbol.to_string()))?;

        let mut bars = bars_from_chart(result);

        // The coarse range strings over-fetch; keep only the trailing window.
        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }

        debug!(symbol, bars = bars.len(), range, "fetched daily bars");
        Ok(bars)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "2330.TW"},
                "timestamp": [1748822400, 1748908800, 1748995200],
                "indicators": {
                    "quote": [{
                        "open":   [975.0, 980.0, null],
                        "high":   [985.0, 990.0, 995.0],
                        "low":    [970.0, 975.0, 980.0],
                        "close":  [982.0, 978.0, 991.0],
                        "volume": [21500000.0, 18200000.0, 25100000.0]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_bars_from_chart() {
        let body: ChartResponse = serde_json::from_str(SAMPLE_CHART).unwrap();
        let result = &body.chart.result.unwrap()[0];
        let bars = bars_from_chart(result);

        // Third session has a null open and must be skipped
        assert_eq!(bars.len(), 2);
        assert!((bars[0].close - 982.0).abs() < f64::EPSILON);
        assert!((bars[1].volume - 18_200_000.0).abs() < f64::EPSILON);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn test_bars_from_chart_empty_result() {
        let body: ChartResponse = serde_json::from_str(
            r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#,
        )
        .unwrap();
        let result = &body.chart.result.unwrap()[0];
        assert!(bars_from_chart(result).is_empty());
    }

    #[test]
    fn test_range_for_lookback() {
        assert_eq!(range_for_lookback(2), "5d");
        assert_eq!(range_for_lookback(5), "5d");
        assert_eq!(range_for_lookback(20), "1mo");
        assert_eq!(range_for_lookback(60), "3mo");
        assert_eq!(range_for_lookback(120), "6mo");
        assert_eq!(range_for_lookback(250), "1y");
    }
}
