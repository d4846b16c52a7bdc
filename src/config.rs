//! Scan configuration.
//!
//! One `ScanConfig` describes a complete scan invocation: direction, score
//! cutoff, liquidity thresholds, and lookback window lengths. All threshold
//! logic reads from here; nothing is hardcoded per pipeline variant.

use serde::{Deserialize, Serialize};

// ============================================================================
// Scan Mode
// ============================================================================

/// Direction of the scan: hunting short-sell or long-entry setups.
///
/// Long mode is the exact mirror image of short mode in the scoring rules;
/// the only asymmetry is the limit-up exclusion in the pre-filter (a stock
/// locked limit-up cannot be shorted at the reference price, but a stock
/// locked limit-down can still be bought the next session).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Screen for short-sell candidates (weak stocks)
    #[default]
    Short,
    /// Screen for long-entry candidates (strong stocks)
    Long,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            _ => Err(format!("unknown scan mode: {} (expected short|long)", s)),
        }
    }
}

// ============================================================================
// Scan Configuration
// ============================================================================

/// Configuration for one scan invocation. Immutable for the scan's duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Scan direction
    #[serde(default)]
    pub mode: ScanMode,

    /// Minimum composite score a candidate needs to appear in the ranked
    /// output. Applied only at the ranking stage; the scorer itself reports
    /// every structurally valid instrument, including score 0.
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Maximum number of candidates in the ranked output
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Minimum latest-session volume (shares) to survive the pre-filter
    #[serde(default = "default_min_volume")]
    pub min_volume: f64,

    /// Minimum latest close (TWD) to survive the pre-filter
    #[serde(default = "default_min_price")]
    pub min_price: f64,

    /// Sessions fetched for the cheap pre-filter pass
    #[serde(default = "default_prefilter_lookback")]
    pub prefilter_lookback: usize,

    /// Sessions fetched for the scoring pass (must cover MA20)
    #[serde(default = "default_scoring_lookback")]
    pub scoring_lookback: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            min_score: default_min_score(),
            top_n: default_top_n(),
            min_volume: default_min_volume(),
            min_price: default_min_price(),
            prefilter_lookback: default_prefilter_lookback(),
            scoring_lookback: default_scoring_lookback(),
        }
    }
}

fn default_min_score() -> u32 {
    1
}

fn default_top_n() -> usize {
    10
}

fn default_min_volume() -> f64 {
    1_000_000.0 // 1000 board lots; thinner names are not worth day-trading
}

fn default_min_price() -> f64 {
    10.0 // TWD; sub-10 stocks have distorted percentage moves
}

fn default_prefilter_lookback() -> usize {
    5
}

fn default_scoring_lookback() -> usize {
    60 // ~3 months of sessions, comfortably covers MA20
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.mode, ScanMode::Short);
        assert_eq!(config.min_score, 1);
        assert_eq!(config.top_n, 10);
        assert!((config.min_volume - 1_000_000.0).abs() < f64::EPSILON);
        assert!((config.min_price - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.prefilter_lookback, 5);
        assert_eq!(config.scoring_lookback, 60);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("short".parse::<ScanMode>().unwrap(), ScanMode::Short);
        assert_eq!("LONG".parse::<ScanMode>().unwrap(), ScanMode::Long);
        assert!("sideways".parse::<ScanMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [ScanMode::Short, ScanMode::Long] {
            assert_eq!(mode.to_string().parse::<ScanMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = ScanConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("min_score"));
        assert!(json.contains("short"));

        let parsed: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.mode, config.mode);
        assert_eq!(parsed.top_n, config.top_n);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: ScanConfig = serde_json::from_str(r#"{"mode":"long","min_score":3}"#).unwrap();
        assert_eq!(parsed.mode, ScanMode::Long);
        assert_eq!(parsed.min_score, 3);
        assert_eq!(parsed.top_n, 10);
        assert_eq!(parsed.scoring_lookback, 60);
    }
}
