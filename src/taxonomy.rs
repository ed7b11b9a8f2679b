//! The fixed taxonomy of tracked line items.
//!
//! Every parse resolves exactly these items, in this order, for both
//! statement sides. Each item carries the Hungarian label as printed in
//! statutory statements, an alias regex tuned to the row-code layouts seen in
//! practice, and an English display label for report collaborators.

use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Which statement a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum StatementSide {
    BalanceSheet,
    IncomeStatement,
}

/// Identifier of one tracked line item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum LineItemId {
    // Balance sheet
    CurrentAssets,
    Inventory,
    Receivables,
    Cash,
    TotalAssets,
    Equity,
    LongTermLiabilities,
    ShortTermLiabilities,
    TotalLiabilities,
    TradePayables,
    // Income statement
    NetRevenue,
    MaterialExpenses,
    PersonnelExpenses,
    Depreciation,
    OtherIncome,
    OtherExpenses,
    FinancialExpenses,
    OperatingProfit,
    ProfitAfterTax,
}

impl LineItemId {
    pub const BALANCE_SHEET: [LineItemId; 10] = [
        LineItemId::CurrentAssets,
        LineItemId::Inventory,
        LineItemId::Receivables,
        LineItemId::Cash,
        LineItemId::TotalAssets,
        LineItemId::Equity,
        LineItemId::LongTermLiabilities,
        LineItemId::ShortTermLiabilities,
        LineItemId::TotalLiabilities,
        LineItemId::TradePayables,
    ];

    pub const INCOME_STATEMENT: [LineItemId; 9] = [
        LineItemId::NetRevenue,
        LineItemId::MaterialExpenses,
        LineItemId::PersonnelExpenses,
        LineItemId::Depreciation,
        LineItemId::OtherIncome,
        LineItemId::OtherExpenses,
        LineItemId::FinancialExpenses,
        LineItemId::OperatingProfit,
        LineItemId::ProfitAfterTax,
    ];

    pub fn statement(&self) -> StatementSide {
        if Self::BALANCE_SHEET.contains(self) {
            StatementSide::BalanceSheet
        } else {
            StatementSide::IncomeStatement
        }
    }

    /// The Hungarian label as printed in the statement.
    pub fn label(&self) -> &'static str {
        match self {
            LineItemId::CurrentAssets => "Forgóeszközök",
            LineItemId::Inventory => "Készletek",
            LineItemId::Receivables => "Követelések",
            LineItemId::Cash => "Pénzeszközök",
            LineItemId::TotalAssets => "Eszközök összesen",
            LineItemId::Equity => "Saját tőke",
            LineItemId::LongTermLiabilities => "Hosszú lejáratú kötelezettségek",
            LineItemId::ShortTermLiabilities => "Rövid lejáratú kötelezettségek",
            LineItemId::TotalLiabilities => "Kötelezettségek összesen",
            LineItemId::TradePayables => "Szállítók",
            LineItemId::NetRevenue => "Értékesítés nettó árbevétele",
            LineItemId::MaterialExpenses => "Anyagjellegű ráfordítások",
            LineItemId::PersonnelExpenses => "Személyi jellegű ráfordítások",
            LineItemId::Depreciation => "Értékcsökkenési leírás",
            LineItemId::OtherIncome => "Egyéb bevételek",
            LineItemId::OtherExpenses => "Egyéb ráfordítások",
            LineItemId::FinancialExpenses => "Pénzügyi műveletek ráfordításai",
            LineItemId::OperatingProfit => "Üzemi (üzleti) tevékenység eredménye",
            LineItemId::ProfitAfterTax => "Adózott eredmény",
        }
    }

    /// English display label for rendered reports.
    pub fn label_en(&self) -> &'static str {
        match self {
            LineItemId::CurrentAssets => "Current assets",
            LineItemId::Inventory => "Inventory",
            LineItemId::Receivables => "Receivables",
            LineItemId::Cash => "Cash and cash equivalents",
            LineItemId::TotalAssets => "Total assets",
            LineItemId::Equity => "Equity",
            LineItemId::LongTermLiabilities => "Long-term liabilities",
            LineItemId::ShortTermLiabilities => "Short-term liabilities",
            LineItemId::TotalLiabilities => "Total liabilities",
            LineItemId::TradePayables => "Trade payables",
            LineItemId::NetRevenue => "Net sales revenue",
            LineItemId::MaterialExpenses => "Material-type expenses",
            LineItemId::PersonnelExpenses => "Personnel expenses",
            LineItemId::Depreciation => "Depreciation and amortization",
            LineItemId::OtherIncome => "Other income",
            LineItemId::OtherExpenses => "Other expenses",
            LineItemId::FinancialExpenses => "Financial expenses",
            LineItemId::OperatingProfit => "Operating profit (loss)",
            LineItemId::ProfitAfterTax => "Profit after tax",
        }
    }

    /// The alias regex source for this item. Row-code prefixed alternates come
    /// first so coded layouts bind to the right row, with the bare label as a
    /// catch-all.
    fn pattern_source(&self) -> &'static str {
        match self {
            LineItemId::CurrentAssets => r"\bB\.\s*Forgóeszközök\b|\bForgóeszközök\b",
            LineItemId::Inventory => r"^\s*[0-9]+\.\s*I\.\s*Készletek\b|\bKészletek\b",
            LineItemId::Receivables => r"^\s*[0-9]+\.\s*II\.\s*Követelések\b|\bKövetelések\b",
            LineItemId::Cash => r"^\s*[0-9]+\.\s*IV\.\s*Pénzeszközök\b|\bPénzeszközök\b",
            LineItemId::TotalAssets => r"Eszközök\s*\(aktívák\)\s*összesen|Eszközök.*összesen",
            LineItemId::Equity => r"^\s*[0-9]+\.\s*D\.\s*Saját tőke\b|\bSaját tőke\b",
            LineItemId::LongTermLiabilities => {
                r"^\s*[0-9]+\.\s*II\.\s*Hosszú lejáratú kötelezettségek\b|\bHosszú lejáratú kötelezettségek\b"
            }
            LineItemId::ShortTermLiabilities => {
                r"^\s*[0-9]+\.\s*III\.\s*Rövid lejáratú kötelezettségek\b|\bRövid lejáratú kötelezettségek\b"
            }
            LineItemId::TotalLiabilities => {
                r"^\s*[0-9]+\.\s*F\.\s*Kötelezettségek\b|\bKötelezettségek\s+összesen\b"
            }
            LineItemId::TradePayables => r"\bSzállítók\b",
            LineItemId::NetRevenue => {
                r"(?:(?:^\s*[0-9]+\.\s*)?I\.\s*)?Értékesítés[\s\-]+nett[oóő][\s\-]*árbevétel(?:e)?\b|Értékesítés.*?nett[oóő].{0,3}árbev\w+"
            }
            LineItemId::MaterialExpenses => {
                r"^\s*[0-9]+\.\s*IV\.\s*Anyagjellegű ráfordítások|Anyagjellegű ráfordítások"
            }
            LineItemId::PersonnelExpenses => {
                r"^\s*[0-9]+\.\s*V\.\s*Személyi jellegű ráfordítások|Személyi jellegű ráfordítások"
            }
            LineItemId::Depreciation => r"Értékcsökkenési leírás",
            LineItemId::OtherIncome => r"Egyéb bevételek",
            LineItemId::OtherExpenses => r"Egyéb ráfordítások",
            LineItemId::FinancialExpenses => r"Pénzügyi műveletek ráfordításai",
            LineItemId::OperatingProfit => r"Üzemi\s*\(üzleti\)\s*tevékenység\s*eredménye",
            LineItemId::ProfitAfterTax => r"^\s*[0-9]+\.\s*D\.\s*Adózott eredmény|\bAdózott eredmény\b",
        }
    }

    /// Compiled case-insensitive alias regex.
    pub fn pattern(&self) -> &'static Regex {
        &PATTERNS[self]
    }
}

static PATTERNS: LazyLock<BTreeMap<LineItemId, Regex>> = LazyLock::new(|| {
    LineItemId::BALANCE_SHEET
        .iter()
        .chain(LineItemId::INCOME_STATEMENT.iter())
        .map(|id| {
            let regex = RegexBuilder::new(id.pattern_source())
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .expect("valid line item label regex");
            (*id, regex)
        })
        .collect()
});

/// Folds Hungarian diacritics to ASCII and lowercases, for alias matching
/// that must survive inconsistent accent rendering in extracted text.
pub fn fold_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' | 'ö' | 'Ö' | 'ő' | 'Ő' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' | 'ű' | 'Ű' => 'u',
            '\u{00A0}' | '\u{202F}' => ' ',
            other => other,
        })
        .flat_map(|c| c.to_lowercase())
        .collect()
}
