//! Exchange open-data adapter for the instrument universe.
//!
//! # Endpoints
//! - TWSE listed board: `https://openapi.twse.com.tw/v1/opendata/t187ap03_L`
//! - TPEx OTC board:    `https://www.tpex.org.tw/openapi/v1/mopsfin_t187ap03_O`
//!
//! Both return JSON arrays of company registry rows. Only common-stock codes
//! (four digits) are kept; ETFs, warrants, and TDRs carry longer codes and
//! are dropped before the screener ever sees them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{ProviderError, UniverseProvider};
use super::MarketSegment;

// ============================================================================
// Constants
// ============================================================================

/// TWSE open-data listed company registry
const TWSE_REGISTRY_URL: &str = "https://openapi.twse.com.tw/v1/opendata/t187ap03_L";

/// TPEx open-data OTC company registry
const TPEX_REGISTRY_URL: &str = "https://www.tpex.org.tw/openapi/v1/mopsfin_t187ap03_O";

/// Request timeout
const REQUEST_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// Registry Row Shapes
// ============================================================================

/// One row of the TWSE listed company registry.
#[derive(Debug, Deserialize)]
struct ListedCompany {
    #[serde(rename = "公司代號")]
    code: String,
}

/// One row of the TPEx OTC company registry.
#[derive(Debug, Deserialize)]
struct OtcCompany {
    #[serde(rename = "SecuritiesCompanyCode")]
    code: String,
}

/// Common stocks on both boards use four-digit numeric codes.
fn is_common_stock_code(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Build a Yahoo-style identifier from an exchange code.
fn symbol_for(code: &str, segment: MarketSegment) -> String {
    format!("{}.{}", code, segment.symbol_suffix())
}

// ============================================================================
// TWSE Registry
// ============================================================================

/// Universe provider backed by the exchanges' open-data company registries.
pub struct TwseRegistry {
    client: reqwest::Client,
    listed_url: String,
    otc_url: String,
}

impl TwseRegistry {
    /// Create a registry client against the public endpoints.
    pub fn new() -> Self {
        Self::with_urls(TWSE_REGISTRY_URL.to_string(), TPEX_REGISTRY_URL.to_string())
    }

    /// Create a registry client against custom endpoints (tests, mirrors).
    pub fn with_urls(listed_url: String, otc_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .unwrap_or_default();

        Self {
            client,
            listed_url,
            otc_url,
        }
    }

    async fn fetch_codes(&self, segment: MarketSegment) -> Result<Vec<String>, ProviderError> {
        match segment {
            MarketSegment::Listed => {
                let rows: Vec<ListedCompany> = self
                    .client
                    .get(&self.listed_url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(rows.into_iter().map(|r| r.code).collect())
            }
            MarketSegment::Otc => {
                let rows: Vec<OtcCompany> = self
                    .client
                    .get(&self.otc_url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                Ok(rows.into_iter().map(|r| r.code).collect())
            }
        }
    }
}

impl Default for TwseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UniverseProvider for TwseRegistry {
    fn name(&self) -> &'static str {
        "twse-registry"
    }

    async fn universe(&self, segment: MarketSegment) -> Result<Vec<String>, ProviderError> {
        let codes = self.fetch_codes(segment).await?;

        let mut symbols: Vec<String> = codes
            .iter()
            .filter(|c| is_common_stock_code(c))
            .map(|c| symbol_for(c, segment))
            .collect();
        symbols.sort();
        symbols.dedup();

        debug!(
            segment = %segment,
            total = codes.len(),
            kept = symbols.len(),
            "fetched universe from registry"
        );
        Ok(symbols)
    }
}

// ============================================================================
// Tests
// ============================================================================
