//! Liquidity, leverage and working-capital ratios derived from a snapshot's
//! current-year values.

use crate::scoring::RiskTier;
use crate::snapshot::FinancialSnapshot;
use crate::taxonomy::LineItemId;
use serde::{Deserialize, Serialize};

/// Null-safe division: `None` when either operand is missing or the
/// denominator is zero. A zero *numerator* is a valid value and divides to
/// `0.0`. Never raises, never returns infinity.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let a = numerator?;
    let b = denominator?;
    if b == 0.0 {
        None
    } else {
        Some(a / b)
    }
}

/// Current-year figures feeding the ratio and scoring computation, pulled out
/// of a snapshot once so the engine never reaches back into the maps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatioInputs {
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub inventory: Option<f64>,
    pub receivables: Option<f64>,
    pub payables: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub equity: Option<f64>,
    pub revenue: Option<f64>,
    /// Cost-of-goods proxy: material-type expenses.
    pub material_expenses: Option<f64>,
    pub cash: Option<f64>,
    pub long_term_liabilities: Option<f64>,
    pub operating_profit: Option<f64>,
    pub net_profit: Option<f64>,
    pub depreciation: Option<f64>,
    pub financial_expenses: Option<f64>,
}

impl RatioInputs {
    pub fn from_snapshot(snapshot: &FinancialSnapshot) -> Self {
        let value = |id: LineItemId| snapshot.current(id).map(|v| v as f64);
        Self {
            current_assets: value(LineItemId::CurrentAssets),
            current_liabilities: value(LineItemId::ShortTermLiabilities),
            inventory: value(LineItemId::Inventory),
            receivables: value(LineItemId::Receivables),
            payables: value(LineItemId::TradePayables),
            total_liabilities: value(LineItemId::TotalLiabilities),
            equity: value(LineItemId::Equity),
            revenue: value(LineItemId::NetRevenue),
            material_expenses: value(LineItemId::MaterialExpenses),
            cash: value(LineItemId::Cash),
            long_term_liabilities: value(LineItemId::LongTermLiabilities),
            operating_profit: value(LineItemId::OperatingProfit),
            net_profit: value(LineItemId::ProfitAfterTax),
            depreciation: value(LineItemId::Depreciation),
            financial_expenses: value(LineItemId::FinancialExpenses),
        }
    }
}

/// Named ratios plus the composite risk score and tier.
///
/// Every ratio is nullable: a missing operand or a zero denominator yields
/// `None`, rendered as "not available" downstream. Recomputed from scratch on
/// every call, never cached across manual overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioSet {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    /// Current assets minus current liabilities, in thousands of HUF.
    pub net_working_capital: Option<f64>,
    pub days_sales_outstanding: Option<f64>,
    pub days_inventory_outstanding: Option<f64>,
    pub days_payables_outstanding: Option<f64>,
    pub cash_conversion_cycle: Option<f64>,
    pub score: f64,
    pub risk_tier: RiskTier,
}

/// Computes the ratio fields of a [`RatioSet`]. The `score` and `risk_tier`
/// fields are left at their default state; the scoring engine fills them in.
pub fn compute_ratios(inputs: &RatioInputs) -> RatioSet {
    let day_basis = 365.0;

    let current_ratio = safe_div(inputs.current_assets, inputs.current_liabilities);
    let quick_ratio = safe_div(
        inputs
            .current_assets
            .zip(inputs.inventory)
            .map(|(ca, inv)| ca - inv),
        inputs.current_liabilities,
    );
    let debt_to_equity = safe_div(inputs.total_liabilities, inputs.equity);
    let net_working_capital = inputs
        .current_assets
        .zip(inputs.current_liabilities)
        .map(|(ca, cl)| ca - cl);

    let days_sales_outstanding =
        safe_div(inputs.receivables, inputs.revenue).map(|r| r * day_basis);
    let days_inventory_outstanding =
        safe_div(inputs.inventory, inputs.material_expenses).map(|r| r * day_basis);
    let days_payables_outstanding =
        safe_div(inputs.payables, inputs.material_expenses).map(|r| r * day_basis);

    let cash_conversion_cycle = match (
        days_sales_outstanding,
        days_inventory_outstanding,
        days_payables_outstanding,
    ) {
        (Some(dso), Some(dio), Some(dpo)) => Some(dso + dio - dpo),
        _ => None,
    };

    RatioSet {
        current_ratio,
        quick_ratio,
        debt_to_equity,
        net_working_capital,
        days_sales_outstanding,
        days_inventory_outstanding,
        days_payables_outstanding,
        cash_conversion_cycle,
        ..RatioSet::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_null_rules() {
        assert_eq!(safe_div(Some(10.0), Some(0.0)), None);
        assert_eq!(safe_div(None, Some(5.0)), None);
        assert_eq!(safe_div(Some(10.0), None), None);
        assert_eq!(safe_div(None, None), None);
        assert_eq!(safe_div(Some(10.0), Some(4.0)), Some(2.5));
    }

    #[test]
    fn test_zero_numerator_is_a_valid_value() {
        let inputs = RatioInputs {
            current_assets: Some(0.0),
            current_liabilities: Some(100.0),
            ..RatioInputs::default()
        };
        let ratios = compute_ratios(&inputs);
        assert_eq!(ratios.current_ratio, Some(0.0));
    }

    #[test]
    fn test_basic_ratio_values() {
        let inputs = RatioInputs {
            current_assets: Some(1500.0),
            current_liabilities: Some(1000.0),
            inventory: Some(500.0),
            receivables: Some(365.0),
            payables: Some(200.0),
            total_liabilities: Some(2000.0),
            equity: Some(1000.0),
            revenue: Some(3650.0),
            material_expenses: Some(730.0),
            ..RatioInputs::default()
        };
        let ratios = compute_ratios(&inputs);
        assert_eq!(ratios.current_ratio, Some(1.5));
        assert_eq!(ratios.quick_ratio, Some(1.0));
        assert_eq!(ratios.debt_to_equity, Some(2.0));
        assert_eq!(ratios.net_working_capital, Some(500.0));
        assert_eq!(ratios.days_sales_outstanding, Some(36.5));
        assert_eq!(ratios.days_inventory_outstanding, Some(250.0));
        assert_eq!(ratios.days_payables_outstanding, Some(100.0));
        assert_eq!(ratios.cash_conversion_cycle, Some(186.5));
    }

    #[test]
    fn test_missing_operands_propagate_to_none() {
        let inputs = RatioInputs {
            current_assets: Some(1500.0),
            ..RatioInputs::default()
        };
        let ratios = compute_ratios(&inputs);
        assert_eq!(ratios.current_ratio, None);
        assert_eq!(ratios.quick_ratio, None);
        assert_eq!(ratios.debt_to_equity, None);
        assert_eq!(ratios.net_working_capital, None);
        assert_eq!(ratios.cash_conversion_cycle, None);
    }

    #[test]
    fn test_from_snapshot_reads_current_year() {
        use crate::snapshot::ResolvedLine;
        let mut snapshot = FinancialSnapshot::empty();
        snapshot.set_resolved(
            LineItemId::CurrentAssets,
            ResolvedLine {
                source_line: None,
                current: Some(9876),
                previous: Some(12345),
            },
        );
        let inputs = RatioInputs::from_snapshot(&snapshot);
        assert_eq!(inputs.current_assets, Some(9876.0));
        assert_eq!(inputs.inventory, None);
    }
}
