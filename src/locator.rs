//! Finds the best candidate line for a label pattern inside a section and
//! resolves its column values.
//!
//! Besides the generic locator this module carries the two special-case
//! extractors that run after the generic pass: an ordered strategy chain for
//! the trade-payables row (which statements print in several layouts) and an
//! accent-insensitive fallback for the net-revenue row.

use crate::columns::{resolve_columns, ColumnOrder};
use crate::numeric::extract_tokens;
use crate::snapshot::ResolvedLine;
use crate::taxonomy::fold_diacritics;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static ROW_101_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*101[.)]?\s").expect("valid payables row code regex"));

/// Numeric-content richness of a candidate line: two points per grouped
/// number plus one if any digit is present at all.
fn candidate_score(line: &str) -> u32 {
    let grouped = extract_tokens(line)
        .iter()
        .filter(|t| t.is_grouped())
        .count() as u32;
    let has_digit = line.chars().any(|c| c.is_ascii_digit());
    grouped * 2 + u32::from(has_digit)
}

/// Scans a section top to bottom for the best line matching `pattern`.
///
/// The first matching line that carries any digit is accepted immediately: a
/// label line that already has numbers wins without an exhaustive search.
/// Otherwise the highest-scoring match seen (first on ties, even at score
/// zero) is kept and resolved best-effort after the full scan. When the
/// selected line itself yields no values, the following and then the
/// preceding line are probed with the same column rules, which recovers
/// line-wrapped layouts where the label and its numbers ended up on separate
/// lines.
pub fn locate_line(section: &str, pattern: &Regex, order: ColumnOrder) -> ResolvedLine {
    let lines: Vec<&str> = section.lines().collect();
    let mut best: Option<(usize, u32)> = None;

    for (idx, line) in lines.iter().enumerate() {
        if !pattern.is_match(line) {
            continue;
        }
        let score = candidate_score(line);
        if score > 0 {
            return resolve_with_neighbors(&lines, idx, order);
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((idx, score));
        }
    }

    match best {
        Some((idx, _)) => resolve_with_neighbors(&lines, idx, order),
        None => ResolvedLine::default(),
    }
}

/// Applies the column rules to the selected line, then to its neighbors when
/// the line itself carries no usable number. The following line is probed
/// before the preceding one: wrapped layouts put the numbers below the label,
/// while the line above usually belongs to the previous row.
fn resolve_with_neighbors(lines: &[&str], idx: usize, order: ColumnOrder) -> ResolvedLine {
    let mut probes = vec![idx];
    if idx + 1 < lines.len() {
        probes.push(idx + 1);
    }
    if let Some(prev) = idx.checked_sub(1) {
        probes.push(prev);
    }

    for probe in probes {
        let pair = resolve_columns(lines[probe], order);
        if !pair.is_empty() {
            return ResolvedLine {
                source_line: Some(lines[probe].to_string()),
                current: pair.current,
                previous: pair.previous,
            };
        }
    }

    // Nothing numeric nearby; report the label line so the caller can still
    // show where the item was found.
    ResolvedLine {
        source_line: Some(lines[idx].to_string()),
        current: None,
        previous: None,
    }
}

/// Accent-folded aliases under which the trade-payables row appears.
const PAYABLES_ALIASES: [&str; 5] = [
    "szallitok",
    "szallito",
    "aruszallitasbol",
    "trade payables",
    "accounts payable",
];

type Strategy = fn(&str) -> Option<ResolvedLine>;

/// Trade-payables extraction strategies in priority order; the first one that
/// yields a value wins. Both apply the canonical previous-first convention.
const PAYABLES_STRATEGIES: [(&str, Strategy); 2] = [
    ("label-alias", payables_by_label),
    ("row-code", payables_by_row_code),
];

/// Resolves the trade-payables ("Szállítók") row from the full document text.
///
/// Runs after the generic taxonomy pass; callers should let it override the
/// generic result only when that result is inconclusive.
pub fn locate_trade_payables(text: &str) -> Option<ResolvedLine> {
    for (name, strategy) in PAYABLES_STRATEGIES {
        if let Some(found) = strategy(text) {
            debug!("Trade payables resolved via {} strategy", name);
            return Some(found);
        }
    }
    None
}

/// Finds the payables row by its label aliases, diacritic-insensitively.
/// A parenthesized "(szállítók)" sub-label or the English label is preferred
/// over a bare alias hit. The label line and both neighbors are probed.
fn payables_by_label(text: &str) -> Option<ResolvedLine> {
    let lines: Vec<&str> = text.lines().collect();
    let mut best: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        let folded = fold_diacritics(line);
        if !PAYABLES_ALIASES.iter().any(|alias| folded.contains(alias)) {
            continue;
        }
        if folded.contains("(szallitok)") || folded.contains("trade payables") {
            best = Some(idx);
            break;
        }
        if best.is_none() {
            best = Some(idx);
        }
    }

    probe_window(&lines, best?)
}

/// Finds the payables row by its statutory row code ("101."), directly or via
/// a neighboring "(szállítók)" continuation line.
fn payables_by_row_code(text: &str) -> Option<ResolvedLine> {
    let lines: Vec<&str> = text.lines().collect();

    let mut row = lines.iter().position(|line| ROW_101_RE.is_match(line));

    if row.is_none() {
        for (idx, line) in lines.iter().enumerate() {
            if !fold_diacritics(line).contains("(szallitok)") {
                continue;
            }
            if idx > 0 && ROW_101_RE.is_match(lines[idx - 1]) {
                row = Some(idx - 1);
                break;
            }
            if idx + 1 < lines.len() && ROW_101_RE.is_match(lines[idx + 1]) {
                row = Some(idx + 1);
                break;
            }
        }
    }

    let idx = row?;
    let pair = resolve_columns(lines[idx], ColumnOrder::PreviousFirst);
    if pair.is_empty() {
        return None;
    }
    Some(ResolvedLine {
        source_line: Some(lines[idx].to_string()),
        current: pair.current,
        previous: pair.previous,
    })
}

/// Probes a label line and its immediate neighbors, first value wins. Same
/// probe order as the generic locator: the line itself, then below, then
/// above.
fn probe_window(lines: &[&str], idx: usize) -> Option<ResolvedLine> {
    let mut probes = vec![idx];
    if idx + 1 < lines.len() {
        probes.push(idx + 1);
    }
    if let Some(prev) = idx.checked_sub(1) {
        probes.push(prev);
    }

    for probe in probes {
        let pair = resolve_columns(lines[probe], ColumnOrder::PreviousFirst);
        if !pair.is_empty() {
            return Some(ResolvedLine {
                source_line: Some(lines[probe].to_string()),
                current: pair.current,
                previous: pair.previous,
            });
        }
    }
    None
}

/// Fallback locator for the net-revenue row when the generic pattern resolves
/// nothing: accent-insensitive match requiring the "I." row marker and
/// excluding the belföldi/export sub-rows.
pub fn locate_revenue_fallback(section: &str) -> Option<ResolvedLine> {
    for line in section.lines() {
        let folded = fold_diacritics(line);
        let is_revenue = folded.contains("ertekesites")
            && folded.contains("netto")
            && folded.contains("arbev");
        if !is_revenue || folded.contains("belfoldi") || folded.contains("export") {
            continue;
        }
        if !(folded.contains(" i.") || folded.trim_start().starts_with("i.")) {
            continue;
        }
        let pair = resolve_columns(line, ColumnOrder::PreviousFirst);
        if pair.current.is_some() {
            return Some(ResolvedLine {
                source_line: Some(line.to_string()),
                current: pair.current,
                previous: pair.previous,
            });
        }
    }
    None
}
