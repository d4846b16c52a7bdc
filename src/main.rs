//! twse-screener - end-of-day screener for TWSE/TPEx equities.
//!
//! Scans a market segment's universe through a liquidity pre-filter and a
//! technical signal scorer, then prints the ranked candidate table.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use twse_screener::config::{ScanConfig, ScanMode};
use twse_screener::data::{
    CachedUniverse, FixedUniverse, MarketSegment, TwseRegistry, YahooGateway,
};
use twse_screener::logging::init_logging;
use twse_screener::screener::{Report, ReportFormat, ScanEngine};

fn parse_mode(s: &str) -> Result<ScanMode, String> {
    ScanMode::from_str(s)
}

fn parse_segment(s: &str) -> Result<MarketSegment, String> {
    MarketSegment::from_str(s)
}

fn parse_format(s: &str) -> Result<ReportFormat, String> {
    ReportFormat::from_str(s)
}

#[derive(Debug, Parser)]
#[command(
    name = "twse-screener",
    version,
    about = "Screen TWSE/TPEx equities for short-sell or long-entry candidates"
)]
struct Cli {
    /// Scan direction: short or long
    #[arg(long, default_value = "short", value_parser = parse_mode)]
    mode: ScanMode,

    /// Market segment: listed (TWSE) or otc (TPEx)
    #[arg(long, default_value = "listed", value_parser = parse_segment)]
    segment: MarketSegment,

    /// Minimum composite score to appear in the result
    #[arg(long, default_value_t = 1)]
    min_score: u32,

    /// Maximum number of candidates to show
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Minimum latest-session volume in shares
    #[arg(long)]
    min_volume: Option<f64>,

    /// Minimum latest close in TWD
    #[arg(long)]
    min_price: Option<f64>,

    /// Scan only these symbols (comma-separated, e.g. "2330.TW,2317.TW")
    /// instead of fetching the registry universe
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Output format: console, markdown, or json
    #[arg(long, default_value = "console", value_parser = parse_format)]
    format: ReportFormat,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format: pretty or json
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

impl Cli {
    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig {
            mode: self.mode,
            min_score: self.min_score,
            top_n: self.top,
            ..ScanConfig::default()
        };
        if let Some(min_volume) = self.min_volume {
            config.min_volume = min_volume;
        }
        if let Some(min_price) = self.min_price {
            config.min_price = min_price;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    tracing::info!("twse-screener v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.scan_config();
    let gateway = Arc::new(YahooGateway::new());

    let report = if cli.symbols.is_empty() {
        let universe = Arc::new(CachedUniverse::new(TwseRegistry::new()));
        ScanEngine::new(config, gateway, universe)
            .run_scan(cli.segment)
            .await?
    } else {
        let universe = Arc::new(FixedUniverse::new(cli.symbols.clone()));
        ScanEngine::new(config, gateway, universe)
            .run_scan(cli.segment)
            .await?
    };

    println!("{}", Report::new(&report).generate(cli.format));
    Ok(())
}
