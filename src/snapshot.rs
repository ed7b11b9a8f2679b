//! Document-level parse result types.

use crate::taxonomy::{LineItemId, StatementSide};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The resolved values of one line item: the line of text the values were read
/// from and the current/previous-year figures (in thousands of HUF).
///
/// Any field may be missing; missing values mean "not recovered from the
/// document", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedLine {
    pub source_line: Option<String>,
    pub current: Option<i64>,
    pub previous: Option<i64>,
}

impl ResolvedLine {
    pub fn has_value(&self) -> bool {
        self.current.is_some() || self.previous.is_some()
    }

    /// A resolution that a later, more specific extractor is allowed to
    /// replace.
    pub fn is_inconclusive(&self) -> bool {
        self.current.is_none() || self.previous.is_none()
    }
}

/// One tracked line item together with its resolution for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    pub id: LineItemId,
    /// Hungarian label from the taxonomy, carried for report rendering.
    pub label: String,
    pub resolved: ResolvedLine,
}

impl LineItem {
    pub fn unresolved(id: LineItemId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            resolved: ResolvedLine::default(),
        }
    }
}

/// The full extraction result for one document.
///
/// Invariant: every id of [`LineItemId::BALANCE_SHEET`] and
/// [`LineItemId::INCOME_STATEMENT`] is present in its map. Unresolved items
/// hold `None` values; a missing key is never valid. Built once per document
/// and not mutated afterwards; manual overrides produce a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FinancialSnapshot {
    pub balance_sheet: BTreeMap<LineItemId, LineItem>,
    pub income_statement: BTreeMap<LineItemId, LineItem>,
}

impl FinancialSnapshot {
    /// A snapshot with the complete taxonomy present and every value `None`.
    pub fn empty() -> Self {
        Self {
            balance_sheet: LineItemId::BALANCE_SHEET
                .iter()
                .map(|id| (*id, LineItem::unresolved(*id)))
                .collect(),
            income_statement: LineItemId::INCOME_STATEMENT
                .iter()
                .map(|id| (*id, LineItem::unresolved(*id)))
                .collect(),
        }
    }

    fn side_map(&self, side: StatementSide) -> &BTreeMap<LineItemId, LineItem> {
        match side {
            StatementSide::BalanceSheet => &self.balance_sheet,
            StatementSide::IncomeStatement => &self.income_statement,
        }
    }

    pub(crate) fn side_map_mut(&mut self, side: StatementSide) -> &mut BTreeMap<LineItemId, LineItem> {
        match side {
            StatementSide::BalanceSheet => &mut self.balance_sheet,
            StatementSide::IncomeStatement => &mut self.income_statement,
        }
    }

    pub fn line(&self, id: LineItemId) -> Option<&LineItem> {
        self.side_map(id.statement()).get(&id)
    }

    /// Current-year value of a line item, if resolved.
    pub fn current(&self, id: LineItemId) -> Option<i64> {
        self.line(id).and_then(|item| item.resolved.current)
    }

    /// Previous-year value of a line item, if resolved.
    pub fn previous(&self, id: LineItemId) -> Option<i64> {
        self.line(id).and_then(|item| item.resolved.previous)
    }

    pub(crate) fn set_resolved(&mut self, id: LineItemId, resolved: ResolvedLine) {
        let item = self
            .side_map_mut(id.statement())
            .entry(id)
            .or_insert_with(|| LineItem::unresolved(id));
        item.resolved = resolved;
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
