//! # Financial Statement Parser
//!
//! A library for extracting balance-sheet and income-statement figures from
//! the plain text of Hungarian annual reports ("éves beszámoló") and turning
//! them into financial ratios and a rule-based risk score.
//!
//! ## Core Concepts
//!
//! - **Snapshot**: the full extraction result, every tracked line item with
//!   its current- and previous-year value in thousands of HUF, or `None`
//!   where the document gave nothing usable
//! - **Taxonomy**: the fixed set of tracked line items and the Hungarian
//!   label patterns that locate them
//! - **Column disambiguation**: heuristics that split a statement row into
//!   previous-year and current-year figures, including digit chains the text
//!   extraction glued together
//! - **Overrides**: caller-supplied corrections applied to a snapshot before
//!   ratios are recomputed
//! - **Risk score**: a 0..=100 composite (higher means riskier) built from
//!   configurable band tables, liquidity nudges and sector benchmarks
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_parser::*;
//!
//! let text = std::fs::read_to_string("beszamolo.txt")?;
//! let analyzer = StatementAnalyzer::new();
//! let report = analyzer.analyze(
//!     &text,
//!     &AnalysisOptions {
//!         sector: Some("Nagykereskedelem".to_string()),
//!         ..AnalysisOptions::default()
//!     },
//! );
//!
//! println!("{}", report.snapshot.to_json()?);
//! println!("score: {} ({:?})", report.ratios.score, report.ratios.risk_tier);
//! ```

pub mod columns;
pub mod error;
pub mod locator;
pub mod numeric;
pub mod overrides;
pub mod ratios;
pub mod scoring;
pub mod section;
pub mod snapshot;
pub mod taxonomy;

pub use columns::{resolve_columns, strip_line_code, ColumnOrder, ColumnPair};
pub use error::{Result, StatementError};
pub use locator::{locate_line, locate_revenue_fallback, locate_trade_payables};
pub use numeric::{extract_tokens, extract_values, normalize_token, NumericToken};
pub use overrides::{SnapshotOverrides, ValueOverride};
pub use ratios::{compute_ratios, safe_div, RatioInputs, RatioSet};
pub use scoring::{
    BenchmarkAssessment, BenchmarkStatus, BenchmarkTable, BenchmarkTargets, RiskModel, RiskTier,
    ScoringConfig, SectorBenchmark,
};
pub use section::segment_sections;
pub use snapshot::{FinancialSnapshot, LineItem, ResolvedLine};
pub use taxonomy::{fold_diacritics, LineItemId, StatementSide};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Caller-side knobs for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Free-form sector description matched against sector keywords; `None`
    /// or an unrecognized sector uses the fallback benchmark.
    pub sector: Option<String>,
    /// Manual corrections applied to the parsed snapshot before ratios are
    /// computed.
    pub overrides: Option<SnapshotOverrides>,
    /// Optional externally produced 0..=100 risk opinion blended into the
    /// composite score at 20% weight.
    pub auxiliary_score: Option<f64>,
}

/// One document's complete analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub snapshot: FinancialSnapshot,
    pub ratios: RatioSet,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The extraction and scoring pipeline behind one reusable value.
#[derive(Debug, Clone, Default)]
pub struct StatementAnalyzer {
    model: RiskModel,
}

impl StatementAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            model: RiskModel::with_config(config),
        }
    }

    /// Extracts a snapshot from statement text.
    ///
    /// Extraction never fails: line items the heuristics cannot resolve stay
    /// `None` in the snapshot and propagate as "not available" through the
    /// ratios.
    pub fn parse(&self, text: &str) -> FinancialSnapshot {
        info!("Parsing financial statement text ({} chars)", text.len());
        let (balance, income) = segment_sections(text);

        let mut snapshot = FinancialSnapshot::empty();
        for id in LineItemId::BALANCE_SHEET
            .iter()
            .chain(LineItemId::INCOME_STATEMENT.iter())
        {
            let section = match id.statement() {
                StatementSide::BalanceSheet => balance,
                StatementSide::IncomeStatement => income,
            };
            let resolved = locate_line(section, id.pattern(), ColumnOrder::PreviousFirst);
            debug!(
                "{:?}: current={:?} previous={:?}",
                id, resolved.current, resolved.previous
            );
            snapshot.set_resolved(*id, resolved);
        }

        // The revenue row often loses its label to the text extraction; fall
        // back to scanning for the "I." summary row when the labelled lookup
        // produced no current-year figure.
        if snapshot.current(LineItemId::NetRevenue).is_none() {
            if let Some(resolved) = locate_revenue_fallback(income) {
                debug!(
                    "NetRevenue recovered by summary-row fallback: current={:?}",
                    resolved.current
                );
                snapshot.set_resolved(LineItemId::NetRevenue, resolved);
            }
        }

        // Trade payables run their own strategy chain over the whole text;
        // a conclusive generic hit is kept as-is.
        let payables_inconclusive = snapshot
            .line(LineItemId::TradePayables)
            .map_or(true, |item| item.resolved.is_inconclusive());
        if payables_inconclusive {
            if let Some(resolved) = locate_trade_payables(text) {
                debug!(
                    "TradePayables recovered by strategy chain: current={:?} previous={:?}",
                    resolved.current, resolved.previous
                );
                snapshot.set_resolved(LineItemId::TradePayables, resolved);
            }
        }

        snapshot
    }

    /// Runs the full pipeline: parse, apply overrides, compute ratios and
    /// score.
    pub fn analyze(&self, text: &str, options: &AnalysisOptions) -> AnalysisReport {
        let parsed = self.parse(text);
        let snapshot = match &options.overrides {
            Some(overrides) => overrides.apply(&parsed),
            None => parsed,
        };
        let ratios = self.model.assess(
            &snapshot,
            options.sector.as_deref(),
            options.auxiliary_score,
        );
        AnalysisReport { snapshot, ratios }
    }
}

/// Parses statement text into a snapshot with the default pipeline.
pub fn parse_statement(text: &str) -> FinancialSnapshot {
    StatementAnalyzer::new().parse(text)
}

/// Parses, scores and reports on statement text with the default pipeline.
pub fn analyze_statement(text: &str, options: &AnalysisOptions) -> AnalysisReport {
    StatementAnalyzer::new().analyze(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Éves beszámoló

MÉRLEG
A. Befektetett eszközök 120 000 135 000
B. Forgóeszközök 510 432 155 474
I. Készletek 80 000 90 000
II. Követelések 200 000 210 000
IV. Pénzeszközök 30 000 40 000
Eszközök összesen 630 432 290 474
D. Saját tőke 300 000 310 000
Kötelezettségek összesen 330 432 160 474
II. Hosszú lejáratú kötelezettségek 100 000 90 000
III. Rövid lejáratú kötelezettségek 230 432 70 474
ebből: kötelezettségek áruszállításból és szolgáltatásból (szállítók)
101. Szállítók 50 000 60 000

EREDMÉNYKIMUTATÁS
I. Értékesítés nettó árbevétele 900 000 980 000
Anyagjellegű ráfordítások 500 000 540 000
Személyi jellegű ráfordítások 200 000 210 000
Értékcsökkenési leírás 30 000 32 000
A. Üzemi (üzleti) tevékenység eredménye 120 000 140 000
Pénzügyi műveletek ráfordításai 10 000 9 000
F. Adózott eredmény 90 000 105 000
";

    #[test]
    fn test_end_to_end_analysis() {
        let report = analyze_statement(SAMPLE, &AnalysisOptions::default());
        let snapshot = &report.snapshot;

        // Column order is previous-then-current.
        assert_eq!(snapshot.previous(LineItemId::CurrentAssets), Some(510_432));
        assert_eq!(snapshot.current(LineItemId::CurrentAssets), Some(155_474));
        assert_eq!(snapshot.current(LineItemId::NetRevenue), Some(980_000));
        assert_eq!(snapshot.current(LineItemId::Equity), Some(310_000));
        assert_eq!(snapshot.current(LineItemId::TradePayables), Some(60_000));

        assert!(report.ratios.current_ratio.is_some());
        assert!(report.ratios.score >= 0.0 && report.ratios.score <= 100.0);
    }

    #[test]
    fn test_parse_is_total_on_irrelevant_text() {
        let snapshot = parse_statement("lorem ipsum dolor sit amet");
        assert_eq!(snapshot.balance_sheet.len(), LineItemId::BALANCE_SHEET.len());
        assert_eq!(snapshot.current(LineItemId::TotalAssets), None);
        let ratios = RiskModel::new().assess(&snapshot, None, None);
        assert_eq!(ratios.current_ratio, None);
    }

    #[test]
    fn test_overrides_flow_through_analysis() {
        let overrides = SnapshotOverrides {
            modifications: vec![ValueOverride::SetValue {
                target: LineItemId::NetRevenue,
                current: Some(1_000_000),
                previous: None,
            }],
        };
        let options = AnalysisOptions {
            overrides: Some(overrides),
            ..AnalysisOptions::default()
        };
        let report = analyze_statement(SAMPLE, &options);
        assert_eq!(
            report.snapshot.current(LineItemId::NetRevenue),
            Some(1_000_000)
        );
        // Previous year untouched by a None field.
        assert_eq!(
            report.snapshot.previous(LineItemId::NetRevenue),
            Some(900_000)
        );
    }
}
