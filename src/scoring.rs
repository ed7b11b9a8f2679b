//! Rule-based risk scoring.
//!
//! A [`RiskModel`] turns a snapshot into a composite risk score on a 0..=100
//! scale (higher means riskier) by summing banded points for profitability
//! and leverage, liquidity nudges, sector working-capital comparisons, loss
//! guards and a size adjustment on top of a neutral base. Every band and
//! threshold lives in [`ScoringConfig`], which deserializes from JSON and
//! falls back to built-in defaults when no file is available.

use crate::error::{Result, StatementError};
use crate::ratios::{compute_ratios, safe_div, RatioInputs, RatioSet};
use crate::snapshot::FinancialSnapshot;
use crate::taxonomy::fold_diacritics;
use log::debug;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A `(threshold, points)` step in an ascending band table.
pub type Band = (f64, f64);

/// Coarse risk classification derived from the composite score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn from_score(score: f64) -> Self {
        if score < 40.0 {
            RiskTier::Low
        } else if score < 70.0 {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }
}

/// Relative importance of the scoring categories. Carried in the config so a
/// recalibration does not require a code change; the rule flow itself reads
/// the band tables directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CategoryWeights {
    pub liquidity: f64,
    pub wc_cycle: f64,
    pub leverage: f64,
    pub profitability: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            liquidity: 25.0,
            wc_cycle: 20.0,
            leverage: 25.0,
            profitability: 30.0,
        }
    }
}

/// Band tables for the margin and leverage rules. Margins are expressed in
/// percentage points, the leverage ratios as plain multiples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BandTables {
    pub ebit_margin: Vec<Band>,
    pub net_margin: Vec<Band>,
    pub debt_to_equity: Vec<Band>,
    pub net_debt_to_ebitda: Vec<Band>,
    pub interest_cover: Vec<Band>,
}

impl Default for BandTables {
    fn default() -> Self {
        Self {
            ebit_margin: vec![
                (0.0, 12.0),
                (3.0, 8.0),
                (6.0, 4.0),
                (10.0, 0.0),
                (20.0, -3.0),
                (999.0, -6.0),
            ],
            net_margin: vec![
                (0.0, 8.0),
                (2.0, 4.0),
                (5.0, 0.0),
                (10.0, -2.0),
                (999.0, -4.0),
            ],
            debt_to_equity: vec![
                (0.6, -2.0),
                (1.2, 0.0),
                (1.6, 3.0),
                (2.0, 6.0),
                (999.0, 10.0),
            ],
            net_debt_to_ebitda: vec![
                (1.0, -3.0),
                (2.0, 0.0),
                (3.0, 3.0),
                (5.0, 6.0),
                (999.0, 10.0),
            ],
            interest_cover: vec![
                (1.0, 12.0),
                (2.0, 8.0),
                (4.0, 4.0),
                (8.0, 0.0),
                (999.0, -3.0),
            ],
        }
    }
}

/// Loss penalties, the cash-conversion-cycle bonus ladder and the revenue
/// size adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GuardRules {
    /// Added when exactly one of operating or net profit is negative.
    pub loss_one: f64,
    /// Added when both are negative.
    pub loss_both: f64,
    pub ccc_bonus: Vec<Band>,
    /// Points *subtracted* for the first threshold the revenue fits under;
    /// larger companies carry less structural risk.
    pub size_bonus: Vec<Band>,
}

impl Default for GuardRules {
    fn default() -> Self {
        Self {
            loss_one: 12.0,
            loss_both: 18.0,
            ccc_bonus: vec![(0.0, -4.0), (60.0, 0.0), (120.0, 3.0), (99_999.0, 6.0)],
            size_bonus: vec![
                (0.0, 0.0),
                (1_000_000.0, 2.0),
                (10_000_000.0, 4.0),
                (50_000_000.0, 6.0),
            ],
        }
    }
}

/// Current- and quick-ratio comfort bands for the liquidity nudges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LiquidityTargets {
    pub current_min: f64,
    pub current_good: f64,
    pub quick_min: f64,
    pub quick_good: f64,
}

impl Default for LiquidityTargets {
    fn default() -> Self {
        Self {
            current_min: 1.2,
            current_good: 1.5,
            quick_min: 1.0,
            quick_good: 1.2,
        }
    }
}

/// Typical working-capital day counts for one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SectorBenchmark {
    pub dso: f64,
    pub dio: f64,
    pub dpo: f64,
    pub ccc: f64,
}

impl Default for SectorBenchmark {
    // Used verbatim when the sector is unknown.
    fn default() -> Self {
        Self {
            dso: 60.0,
            dio: 90.0,
            dpo: 40.0,
            ccc: 60.0,
        }
    }
}

fn default_sector_benchmarks() -> BTreeMap<String, SectorBenchmark> {
    let mut map = BTreeMap::new();
    map.insert(
        "trade".to_string(),
        SectorBenchmark {
            dso: 45.0,
            dio: 60.0,
            dpo: 35.0,
            ccc: 45.0,
        },
    );
    map.insert(
        "manufacturing".to_string(),
        SectorBenchmark {
            dso: 60.0,
            dio: 90.0,
            dpo: 40.0,
            ccc: 60.0,
        },
    );
    map.insert(
        "construction".to_string(),
        SectorBenchmark {
            dso: 75.0,
            dio: 75.0,
            dpo: 45.0,
            ccc: 75.0,
        },
    );
    map.insert(
        "energy".to_string(),
        SectorBenchmark {
            dso: 75.0,
            dio: 75.0,
            dpo: 45.0,
            ccc: 75.0,
        },
    );
    map
}

/// Full scoring calibration. Any field missing from a JSON config file falls
/// back to the built-in default, so a partial file tweaking a single band
/// table is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    /// Neutral starting score before any rule fires.
    pub base: f64,
    pub weights: CategoryWeights,
    pub bands: BandTables,
    pub guards: GuardRules,
    pub liquidity: LiquidityTargets,
    pub sector_benchmarks: BTreeMap<String, SectorBenchmark>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: 50.0,
            weights: CategoryWeights::default(),
            bands: BandTables::default(),
            guards: GuardRules::default(),
            liquidity: LiquidityTargets::default(),
            sector_benchmarks: default_sector_benchmarks(),
        }
    }
}

impl ScoringConfig {
    /// Loads a calibration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the calibration for thresholds the scorer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.base) {
            return Err(StatementError::InvalidScoringConfig(format!(
                "base score {} outside 0..=100",
                self.base
            )));
        }
        let tables: [(&str, &[Band]); 7] = [
            ("ebit_margin", &self.bands.ebit_margin),
            ("net_margin", &self.bands.net_margin),
            ("debt_to_equity", &self.bands.debt_to_equity),
            ("net_debt_to_ebitda", &self.bands.net_debt_to_ebitda),
            ("interest_cover", &self.bands.interest_cover),
            ("ccc_bonus", &self.guards.ccc_bonus),
            ("size_bonus", &self.guards.size_bonus),
        ];
        for (name, bands) in tables {
            if bands.is_empty() {
                return Err(StatementError::InvalidScoringConfig(format!(
                    "band table '{}' is empty",
                    name
                )));
            }
            if bands.windows(2).any(|w| w[0].0 >= w[1].0) {
                return Err(StatementError::InvalidScoringConfig(format!(
                    "band table '{}' thresholds are not strictly ascending",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Loads a calibration, falling back to the defaults when the file is
    /// missing or malformed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                debug!(
                    "Using built-in scoring config ({} unavailable: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Generates the JSON schema for a config file.
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schema_for!(ScoringConfig)
    }

    /// The JSON schema as a pretty-printed string.
    pub fn schema_as_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::generate_json_schema())?)
    }
}

/// Looks up the points for a value in an ascending band table: the first
/// threshold the value does not exceed wins, past the last threshold the last
/// entry applies. A missing value scores zero.
fn band_points(bands: &[Band], value: Option<f64>) -> f64 {
    let v = match value {
        Some(v) => v,
        None => return 0.0,
    };
    let mut last = 0.0;
    for (threshold, points) in bands {
        if v <= *threshold {
            return *points;
        }
        last = *points;
    }
    last
}

/// Maps free-form Hungarian sector text onto a benchmark key.
pub fn sector_key_from_text(sector: &str) -> Option<&'static str> {
    let folded = fold_diacritics(sector);
    if folded.contains("keresk") {
        Some("trade")
    } else if folded.contains("epit") {
        // Checked before the generic "ipar" keyword: construction sector
        // names like "építőipar" contain both.
        Some("construction")
    } else if folded.contains("gyart") || folded.contains("ipar") {
        Some("manufacturing")
    } else if folded.contains("energia") {
        Some("energy")
    } else {
        None
    }
}

/// The scoring engine. Stateless apart from its configuration; every
/// assessment recomputes ratios and score from the snapshot it is given.
#[derive(Debug, Clone, Default)]
pub struct RiskModel {
    config: ScoringConfig,
}

impl RiskModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Computes the full ratio set and composite risk score for a snapshot.
    ///
    /// `sector` is free-form text matched against sector keywords; an
    /// unrecognized or absent sector uses the fallback benchmark.
    /// `auxiliary_score` is an optional externally produced 0..=100 risk
    /// opinion blended in at 20% weight.
    pub fn assess(
        &self,
        snapshot: &FinancialSnapshot,
        sector: Option<&str>,
        auxiliary_score: Option<f64>,
    ) -> RatioSet {
        let inputs = RatioInputs::from_snapshot(snapshot);
        let mut ratios = compute_ratios(&inputs);
        let score = self.score(&inputs, &ratios, sector, auxiliary_score);
        debug!("Composite risk score: {:.1}", score);
        ratios.score = score;
        ratios.risk_tier = RiskTier::from_score(score);
        ratios
    }

    fn score(
        &self,
        inputs: &RatioInputs,
        ratios: &RatioSet,
        sector: Option<&str>,
        auxiliary_score: Option<f64>,
    ) -> f64 {
        let cfg = &self.config;
        let mut pts = 0.0;

        // Profitability and leverage bands. Margins enter in percentage
        // points to match the band thresholds.
        let ebit_margin =
            safe_div(inputs.operating_profit, inputs.revenue).map(|m| m * 100.0);
        let net_margin = safe_div(inputs.net_profit, inputs.revenue).map(|m| m * 100.0);
        pts += band_points(&cfg.bands.ebit_margin, ebit_margin);
        pts += band_points(&cfg.bands.net_margin, net_margin);
        pts += band_points(&cfg.bands.debt_to_equity, ratios.debt_to_equity);

        let ebitda = inputs
            .operating_profit
            .zip(inputs.depreciation)
            .map(|(e, d)| e + d);
        let net_debt = if inputs.current_liabilities.is_some()
            || inputs.long_term_liabilities.is_some()
            || inputs.cash.is_some()
        {
            Some(
                inputs.current_liabilities.unwrap_or(0.0)
                    + inputs.long_term_liabilities.unwrap_or(0.0)
                    - inputs.cash.unwrap_or(0.0),
            )
        } else {
            None
        };
        let net_debt_to_ebitda = match (net_debt, ebitda) {
            (Some(nd), Some(e)) if e > 0.0 => Some(nd / e),
            _ => None,
        };
        pts += band_points(&cfg.bands.net_debt_to_ebitda, net_debt_to_ebitda);

        let interest_cover = match inputs.financial_expenses {
            Some(interest) if interest > 0.0 => {
                safe_div(inputs.operating_profit, Some(interest))
            }
            _ => None,
        };
        pts += band_points(&cfg.bands.interest_cover, interest_cover);

        // Liquidity nudges around the comfort bands.
        if let Some(cr) = ratios.current_ratio {
            if cr < cfg.liquidity.current_min {
                pts += 4.0;
            } else if cr > cfg.liquidity.current_good {
                pts -= 2.0;
            }
        }
        if let Some(qr) = ratios.quick_ratio {
            if qr < cfg.liquidity.quick_min {
                pts += 4.0;
            } else if qr > cfg.liquidity.quick_good {
                pts -= 2.0;
            }
        }

        // Working-capital cycle versus the sector benchmark.
        let benchmark = sector
            .and_then(sector_key_from_text)
            .and_then(|key| cfg.sector_benchmarks.get(key))
            .copied()
            .unwrap_or_default();
        if let Some(dso) = ratios.days_sales_outstanding {
            if dso > benchmark.dso {
                pts += 3.0;
            }
        }
        if let Some(dio) = ratios.days_inventory_outstanding {
            if dio > benchmark.dio {
                pts += 3.0;
            }
        }
        if let Some(dpo) = ratios.days_payables_outstanding {
            if dpo < benchmark.dpo {
                pts += 3.0;
            }
        }
        if let Some(ccc) = ratios.cash_conversion_cycle {
            for (threshold, bonus) in &cfg.guards.ccc_bonus {
                if ccc <= *threshold {
                    pts += bonus;
                    break;
                }
            }
        }

        // Loss guards.
        let operating_loss = inputs.operating_profit.map_or(false, |v| v < 0.0);
        let net_loss = inputs.net_profit.map_or(false, |v| v < 0.0);
        if operating_loss && net_loss {
            pts += cfg.guards.loss_both;
        } else if operating_loss || net_loss {
            pts += cfg.guards.loss_one;
        }

        // Size adjustment: revenue above the last threshold still earns the
        // last bonus.
        let revenue = inputs.revenue.unwrap_or(0.0);
        let mut size_bonus = cfg
            .guards
            .size_bonus
            .last()
            .map_or(0.0, |(_, bonus)| *bonus);
        for (threshold, bonus) in &cfg.guards.size_bonus {
            if revenue <= *threshold {
                size_bonus = *bonus;
                break;
            }
        }
        pts -= size_bonus;

        let mut score = (cfg.base + pts).clamp(0.0, 100.0);
        if let Some(aux) = auxiliary_score {
            score = (0.8 * score + 0.2 * aux).clamp(0.0, 100.0);
        }
        (score * 10.0).round() / 10.0
    }
}

/// Per-metric target values for a sector in a benchmark file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkTargets {
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub debt_to_equity: f64,
    pub receivables_days: f64,
    pub inventory_days: f64,
    pub payables_days_min: f64,
}

impl Default for BenchmarkTargets {
    fn default() -> Self {
        Self {
            current_ratio: 1.2,
            quick_ratio: 1.0,
            debt_to_equity: 1.6,
            receivables_days: 60.0,
            inventory_days: 90.0,
            payables_days_min: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorTargets {
    #[serde(default)]
    pub targets: BenchmarkTargets,
}

/// Benchmark targets keyed by sector name, with a `default` entry applying to
/// everything unlisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTable {
    #[serde(flatten)]
    pub sectors: BTreeMap<String, SectorTargets>,
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        let mut sectors = BTreeMap::new();
        sectors.insert("default".to_string(), SectorTargets::default());
        Self { sectors }
    }
}

impl BenchmarkTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(table) => table,
            Err(e) => {
                debug!(
                    "Using built-in benchmark targets ({} unavailable: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Targets for a sector key, falling back to the `default` entry.
    pub fn targets_for(&self, sector: &str) -> BenchmarkTargets {
        self.sectors
            .get(sector)
            .or_else(|| self.sectors.get("default"))
            .map(|s| s.targets)
            .unwrap_or_default()
    }
}

/// Traffic-light verdict of one metric against its benchmark target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    Pass,
    Warn,
    Fail,
}

/// Ratio-by-ratio comparison of one company against sector targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkAssessment {
    pub current_ratio: BenchmarkStatus,
    pub quick_ratio: BenchmarkStatus,
    pub debt_to_equity: BenchmarkStatus,
    pub receivables_days: BenchmarkStatus,
    pub inventory_days: BenchmarkStatus,
    pub payables_days: BenchmarkStatus,
    pub cash_conversion_cycle: BenchmarkStatus,
}

fn at_least(value: Option<f64>, min: f64) -> BenchmarkStatus {
    match value {
        None => BenchmarkStatus::Warn,
        Some(v) if v >= min => BenchmarkStatus::Pass,
        Some(_) => BenchmarkStatus::Fail,
    }
}

fn at_most(value: Option<f64>, max: f64) -> BenchmarkStatus {
    match value {
        None => BenchmarkStatus::Warn,
        Some(v) if v <= max => BenchmarkStatus::Pass,
        Some(_) => BenchmarkStatus::Fail,
    }
}

impl BenchmarkTargets {
    /// Grades a ratio set against these targets. Missing ratios grade as
    /// `Warn` rather than `Fail`.
    pub fn assess(&self, ratios: &RatioSet) -> BenchmarkAssessment {
        let ccc = match ratios.cash_conversion_cycle {
            None => BenchmarkStatus::Warn,
            Some(v) if v > 120.0 => BenchmarkStatus::Fail,
            Some(v) if v > 60.0 => BenchmarkStatus::Warn,
            Some(_) => BenchmarkStatus::Pass,
        };
        BenchmarkAssessment {
            current_ratio: at_least(ratios.current_ratio, self.current_ratio),
            quick_ratio: at_least(ratios.quick_ratio, self.quick_ratio),
            debt_to_equity: at_most(ratios.debt_to_equity, self.debt_to_equity),
            receivables_days: at_most(ratios.days_sales_outstanding, self.receivables_days),
            inventory_days: at_most(ratios.days_inventory_outstanding, self.inventory_days),
            payables_days: at_least(ratios.days_payables_outstanding, self.payables_days_min),
            cash_conversion_cycle: ccc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ResolvedLine;
    use crate::taxonomy::LineItemId;

    fn snapshot_with(values: &[(LineItemId, i64)]) -> FinancialSnapshot {
        let mut snapshot = FinancialSnapshot::empty();
        for &(id, value) in values {
            snapshot.set_resolved(
                id,
                ResolvedLine {
                    source_line: None,
                    current: Some(value),
                    previous: Some(value),
                },
            );
        }
        snapshot
    }

    #[test]
    fn test_band_points_first_match_wins() {
        let bands = vec![(0.0, 12.0), (3.0, 8.0), (6.0, 4.0)];
        assert_eq!(band_points(&bands, Some(-5.0)), 12.0);
        assert_eq!(band_points(&bands, Some(0.0)), 12.0);
        assert_eq!(band_points(&bands, Some(2.9)), 8.0);
        assert_eq!(band_points(&bands, Some(5.0)), 4.0);
        // Past the last threshold the last entry applies.
        assert_eq!(band_points(&bands, Some(50.0)), 4.0);
        assert_eq!(band_points(&bands, None), 0.0);
    }

    #[test]
    fn test_sector_keyword_mapping() {
        assert_eq!(sector_key_from_text("Nagykereskedelem"), Some("trade"));
        assert_eq!(sector_key_from_text("Gépgyártás"), Some("manufacturing"));
        assert_eq!(sector_key_from_text("Építőipar"), Some("construction"));
        // "építőipar" contains "ipar" too; construction must win the overlap.
        assert_eq!(
            sector_key_from_text("Magas- és mélyépítőipari kivitelezés"),
            Some("construction")
        );
        assert_eq!(sector_key_from_text("Energiaszolgáltatás"), Some("energy"));
        assert_eq!(sector_key_from_text("Mezőgazdaság"), None);
    }

    #[test]
    fn test_empty_snapshot_scores_near_base() {
        let model = RiskModel::new();
        let ratios = model.assess(&FinancialSnapshot::empty(), None, None);
        // No ratio fires, only the smallest size bonus (0) applies.
        assert_eq!(ratios.score, 50.0);
        assert_eq!(ratios.risk_tier, RiskTier::Moderate);
        assert_eq!(ratios.current_ratio, None);
    }

    #[test]
    fn test_double_loss_raises_score() {
        let model = RiskModel::new();
        let healthy = snapshot_with(&[
            (LineItemId::NetRevenue, 10_000),
            (LineItemId::OperatingProfit, 1_500),
            (LineItemId::ProfitAfterTax, 1_000),
        ]);
        let unprofitable = snapshot_with(&[
            (LineItemId::NetRevenue, 10_000),
            (LineItemId::OperatingProfit, -1_500),
            (LineItemId::ProfitAfterTax, -1_000),
        ]);
        let healthy_score = model.assess(&healthy, None, None).score;
        let unprofitable_score = model.assess(&unprofitable, None, None).score;
        assert!(unprofitable_score > healthy_score);
        assert!(unprofitable_score >= healthy_score + 18.0);
    }

    #[test]
    fn test_large_revenue_lowers_score() {
        let model = RiskModel::new();
        let small = snapshot_with(&[(LineItemId::NetRevenue, 500_000)]);
        let large = snapshot_with(&[(LineItemId::NetRevenue, 60_000_000)]);
        let small_score = model.assess(&small, None, None).score;
        let large_score = model.assess(&large, None, None).score;
        assert!(large_score < small_score);
    }

    #[test]
    fn test_score_stays_within_bounds() {
        let model = RiskModel::new();
        // Deep losses, heavy leverage, illiquid: every penalty fires at once.
        let distressed = snapshot_with(&[
            (LineItemId::CurrentAssets, 100),
            (LineItemId::Inventory, 90),
            (LineItemId::Receivables, 2_000),
            (LineItemId::ShortTermLiabilities, 5_000),
            (LineItemId::LongTermLiabilities, 9_000),
            (LineItemId::TotalLiabilities, 14_000),
            (LineItemId::Equity, 100),
            (LineItemId::NetRevenue, 1_000),
            (LineItemId::MaterialExpenses, 900),
            (LineItemId::OperatingProfit, -2_000),
            (LineItemId::ProfitAfterTax, -2_500),
            (LineItemId::FinancialExpenses, 500),
        ]);
        let ratios = model.assess(&distressed, None, None);
        assert!(ratios.score <= 100.0);
        assert!(ratios.score >= 0.0);
        assert_eq!(ratios.risk_tier, RiskTier::High);
    }

    #[test]
    fn test_auxiliary_score_blends_at_one_fifth() {
        let model = RiskModel::new();
        let snapshot = FinancialSnapshot::empty();
        let without = model.assess(&snapshot, None, None).score;
        let with = model.assess(&snapshot, None, Some(100.0)).score;
        assert_eq!(with, ((0.8 * without + 0.2 * 100.0) * 10.0).round() / 10.0);
    }

    #[test]
    fn test_sector_benchmark_changes_points() {
        let model = RiskModel::new();
        // DSO of 50 days beats the trade benchmark breach threshold (45) but
        // not the fallback one (60).
        let snapshot = snapshot_with(&[
            (LineItemId::NetRevenue, 365_000),
            (LineItemId::Receivables, 50_000),
        ]);
        let generic = model.assess(&snapshot, None, None).score;
        let trade = model.assess(&snapshot, Some("Kiskereskedelem"), None).score;
        assert!(trade > generic);
    }

    #[test]
    fn test_partial_config_file_fills_defaults() {
        let config: ScoringConfig = serde_json::from_str(r#"{"base": 40.0}"#)
            .expect("partial config should deserialize");
        assert_eq!(config.base, 40.0);
        assert_eq!(config.guards.loss_both, 18.0);
        assert!(!config.bands.ebit_margin.is_empty());
        assert!(config.sector_benchmarks.contains_key("trade"));
    }

    #[test]
    fn test_validate_rejects_bad_band_tables() {
        assert!(ScoringConfig::default().validate().is_ok());

        let mut config = ScoringConfig::default();
        config.bands.net_margin = vec![(5.0, 0.0), (2.0, 4.0)];
        assert!(config.validate().is_err());

        config.bands.net_margin = vec![];
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.base = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_schema_generation() {
        let schema = ScoringConfig::schema_as_json().expect("schema generation");
        assert!(schema.contains("sector_benchmarks"));
        assert!(schema.contains("loss_both"));
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = ScoringConfig::load_or_default("/nonexistent/scoring.json");
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_benchmark_table_fallback_sector() {
        let table: BenchmarkTable = serde_json::from_str(
            r#"{
                "default": {"targets": {"current_ratio": 1.2}},
                "trade": {"targets": {"current_ratio": 1.5, "receivables_days": 45}}
            }"#,
        )
        .expect("benchmark table should deserialize");
        assert_eq!(table.targets_for("trade").current_ratio, 1.5);
        assert_eq!(table.targets_for("trade").inventory_days, 90.0);
        assert_eq!(table.targets_for("unknown").current_ratio, 1.2);
    }

    #[test]
    fn test_benchmark_assessment_statuses() {
        let targets = BenchmarkTargets::default();
        let ratios = RatioSet {
            current_ratio: Some(1.5),
            quick_ratio: Some(0.8),
            debt_to_equity: None,
            days_sales_outstanding: Some(30.0),
            days_inventory_outstanding: Some(120.0),
            days_payables_outstanding: Some(50.0),
            cash_conversion_cycle: Some(130.0),
            ..RatioSet::default()
        };
        let assessment = targets.assess(&ratios);
        assert_eq!(assessment.current_ratio, BenchmarkStatus::Pass);
        assert_eq!(assessment.quick_ratio, BenchmarkStatus::Fail);
        assert_eq!(assessment.debt_to_equity, BenchmarkStatus::Warn);
        assert_eq!(assessment.receivables_days, BenchmarkStatus::Pass);
        assert_eq!(assessment.inventory_days, BenchmarkStatus::Fail);
        assert_eq!(assessment.payables_days, BenchmarkStatus::Pass);
        assert_eq!(assessment.cash_conversion_cycle, BenchmarkStatus::Fail);
    }

    #[test]
    fn test_risk_tier_boundaries() {
        assert_eq!(RiskTier::from_score(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(39.9), RiskTier::Low);
        assert_eq!(RiskTier::from_score(40.0), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(69.9), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(70.0), RiskTier::High);
        assert_eq!(RiskTier::from_score(100.0), RiskTier::High);
    }
}
