//! Report rendering for scan results.
//!
//! Formats:
//! - Console (fixed-width table for the terminal)
//! - Markdown (for notes/documentation)
//! - JSON (machine-readable, full report)

use serde::{Deserialize, Serialize};

use super::engine::ScanReport;
use super::signals::Candidate;

// ============================================================================
// Report Format
// ============================================================================

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Fixed-width console table
    Console,
    /// Markdown document
    Markdown,
    /// Pretty-printed JSON of the full report
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "table" => Ok(Self::Console),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "unknown report format: {} (expected console|markdown|json)",
                s
            )),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Renders a [`ScanReport`] in the requested format.
pub struct Report<'a> {
    report: &'a ScanReport,
}

impl<'a> Report<'a> {
    pub fn new(report: &'a ScanReport) -> Self {
        Self { report }
    }

    /// Generate the report in the given format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Console => self.to_console(),
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
        }
    }

    fn signals_line(candidate: &Candidate) -> String {
        candidate
            .signals
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Fixed-width table for the terminal.
    pub fn to_console(&self) -> String {
        let r = self.report;
        let mut out = String::new();

        out.push_str(&format!(
            "{} scan, {} board: {} candidates ({} scanned, {} past pre-filter, {} skipped)\n\n",
            r.mode,
            r.segment,
            r.candidates.len(),
            r.total_universe,
            r.prefilter_survivors,
            r.skipped.total(),
        ));

        if r.candidates.is_empty() {
            out.push_str("No qualifying candidates.\n");
            return out;
        }

        out.push_str(&format!(
            "{:<4} {:<10} {:>9} {:>8} {:>6} {:>8} {:>8}  {}\n",
            "#", "Symbol", "Close", "Chg%", "Score", "Dev%", "Lots", "Signals"
        ));
        for (i, c) in r.candidates.iter().enumerate() {
            out.push_str(&format!(
                "{:<4} {:<10} {:>9.2} {:>+8.2} {:>6} {:>+8.2} {:>8}  {}\n",
                i + 1,
                c.symbol,
                c.close,
                c.change_percent,
                c.score,
                c.deviation * 100.0,
                c.lots,
                Self::signals_line(c),
            ));
        }
        out
    }

    /// Markdown document with the funnel summary and candidate table.
    pub fn to_markdown(&self) -> String {
        let r = self.report;
        let mut md = String::new();

        md.push_str(&format!(
            "# Scan report\n\n**ID**: {}\n**Mode**: {}\n**Segment**: {}\n**Completed**: {}\n**Duration**: {:.1}s\n\n",
            r.id,
            r.mode,
            r.segment,
            r.completed_at.format("%Y-%m-%d %H:%M:%S"),
            r.duration_secs
        ));

        md.push_str("## Funnel\n\n");
        md.push_str("| Stage | Passed | Eliminated | Rate |\n");
        md.push_str("|-------|--------|------------|------|\n");
        for fr in &r.funnel {
            md.push_str(&format!(
                "| {} | {} | {} | {:.1}% |\n",
                fr.stage, fr.passed, fr.eliminated, fr.elimination_rate
            ));
        }
        md.push_str(&format!(
            "\nSkipped: {} unavailable, {} short history, {} degenerate\n\n",
            r.skipped.unavailable, r.skipped.insufficient_history, r.skipped.degenerate
        ));

        md.push_str(&format!("## Candidates ({})\n\n", r.candidates.len()));
        if r.candidates.is_empty() {
            md.push_str("No qualifying candidates.\n");
            return md;
        }

        md.push_str("| # | Symbol | Close | Chg% | Score | Dev% | Lots | Signals |\n");
        md.push_str("|---|--------|-------|------|-------|------|------|--------|\n");
        for (i, c) in r.candidates.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.2} | {:+.2} | {} | {:+.2} | {} | {} |\n",
                i + 1,
                c.symbol,
                c.close,
                c.change_percent,
                c.score,
                c.deviation * 100.0,
                c.lots,
                Self::signals_line(c),
            ));
        }
        md
    }

    /// Full report as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self.report).unwrap_or_else(|_| String::from("{}"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanMode;
    use crate::data::MarketSegment;
    use crate::screener::engine::SkipCounts;
    use crate::screener::prefilter::{FilterResult, FilterStage};
    use crate::screener::signals::Signal;
    use chrono::Utc;

    fn sample_report() -> ScanReport {
        ScanReport {
            id: "scan_20250602_180000".to_string(),
            mode: ScanMode::Short,
            segment: MarketSegment::Listed,
            candidates: vec![Candidate {
                symbol: "2603.TW".to_string(),
                close: 128.0,
                change_percent: -5.88,
                score: 5,
                signals: vec![
                    Signal::BelowShortMa,
                    Signal::BearishClose,
                    Signal::OverextendedPullback,
                    Signal::Distribution,
                ],
                deviation: 0.0802,
                lots: 5_000,
            }],
            funnel: vec![
                FilterResult::new(FilterStage::Liquidity, 900, 120),
                FilterResult::new(FilterStage::Scoring, 120, 115),
                FilterResult::new(FilterStage::Threshold, 115, 1),
            ],
            total_universe: 900,
            prefilter_survivors: 120,
            scored: 115,
            skipped: SkipCounts {
                unavailable: 3,
                insufficient_history: 2,
                degenerate: 0,
            },
            started_at: Utc::now(),
            completed_at: Utc::now(),
            duration_secs: 42.0,
        }
    }

    #[test]
    fn test_console_table() {
        let report = sample_report();
        let out = Report::new(&report).generate(ReportFormat::Console);
        assert!(out.contains("2603.TW"));
        assert!(out.contains("bearish close"));
        assert!(out.contains("900"));
    }

    #[test]
    fn test_console_empty_result() {
        let mut report = sample_report();
        report.candidates.clear();
        let out = Report::new(&report).to_console();
        assert!(out.contains("No qualifying candidates"));
    }

    #[test]
    fn test_markdown_tables() {
        let report = sample_report();
        let md = Report::new(&report).to_markdown();
        assert!(md.contains("| Stage |"));
        assert!(md.contains("| liquidity |"));
        assert!(md.contains("| 1 | 2603.TW |"));
        assert!(md.contains("down day on heavy volume"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = Report::new(&report).to_json();
        let parsed: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].score, 5);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("table".parse::<ReportFormat>().unwrap(), ReportFormat::Console);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
