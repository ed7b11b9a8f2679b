//! Decides which numeric tokens on a candidate line are the previous-year and
//! current-year column values.
//!
//! Statement rows come in several shapes: two columns (previous / current),
//! three or more columns with an ignorable middle adjustment column
//! ("Módosítások"), and pathological rows where the text converter glued two
//! column values into one unbroken chain of 3-digit groups.

use crate::numeric::{digit_groups, extract_tokens, normalize_token};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Anything below this magnitude on a grouped row is assumed to be a row code
/// or section marker, not a financial figure (statements are in thousands).
const MIN_FIGURE_MAGNITUDE: i64 = 1000;

static LINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[0-9]+[.)]?\s*").expect("valid line code regex"));

static SECTION_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[IVX]+|[A-H])[.)]\s+").expect("valid section marker regex"));

/// Which column the statement prints first on a row.
///
/// Label-matched rows print the previous year on the left; some row-code
/// layouts print the current year first. One convention is applied uniformly
/// per call site; see [`ColumnOrder::PreviousFirst`], the canonical choice
/// everywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnOrder {
    /// Left column is the previous fiscal year (the layout used by
    /// label-matched rows, and the canonical convention in this crate).
    PreviousFirst,
    /// Left column is the current fiscal year.
    CurrentFirst,
}

/// The (previous, current) pair recovered from one line. Either side may be
/// missing; both missing means the line carried no usable number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPair {
    pub previous: Option<i64>,
    pub current: Option<i64>,
}

impl ColumnPair {
    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.current.is_none()
    }
}

/// Strips a leading row-code token ("101.", "98)") and an optional roman or
/// letter section marker ("B.", "III.") so the code digits are never mistaken
/// for a column value.
pub fn strip_line_code(line: &str) -> &str {
    let rest = match LINE_CODE_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    match SECTION_MARKER_RE.find(rest) {
        Some(m) => &rest[m.end()..],
        None => rest,
    }
}

/// Resolves the (previous, current) values of one candidate line.
///
/// Decision order, first applicable rule wins:
/// 1. the leading line-code token is stripped;
/// 2. exactly two clean grouped numbers (magnitude >= 1000) are the column
///    pair, ordered by `order`;
/// 3. three or more grouped tokens: previous = first, current = last, the
///    middle adjustment column is ignored regardless of how many there are;
/// 4. a single grouped token with 4+ internal 3-digit groups is split at the
///    rightmost point where both halves round-trip to magnitude >= 1000;
/// 5. fallback: the last two numeric tokens in order are (previous, current);
///    a single token is current-year only.
pub fn resolve_columns(line: &str, order: ColumnOrder) -> ColumnPair {
    let body = strip_line_code(line);
    let tokens = extract_tokens(body);
    let grouped: Vec<_> = tokens.iter().filter(|t| t.is_grouped()).collect();

    match grouped.len() {
        2 => {
            let clean: Vec<i64> = grouped
                .iter()
                .filter_map(|t| t.value)
                .filter(|v| v.abs() >= MIN_FIGURE_MAGNITUDE)
                .collect();
            if let [first, second] = clean[..] {
                return match order {
                    ColumnOrder::PreviousFirst => ColumnPair {
                        previous: Some(first),
                        current: Some(second),
                    },
                    ColumnOrder::CurrentFirst => ColumnPair {
                        previous: Some(second),
                        current: Some(first),
                    },
                };
            }
        }
        n if n >= 3 => {
            return ColumnPair {
                previous: grouped.first().and_then(|t| t.value),
                current: grouped.last().and_then(|t| t.value),
            };
        }
        1 => {
            let groups = digit_groups(&grouped[0].raw);
            if groups.len() >= 4 {
                if let Some(pair) = split_glued_chain(&groups) {
                    return pair;
                }
            }
        }
        _ => {}
    }

    // Last resort: take the trailing numeric tokens in left-to-right order.
    let values: Vec<i64> = tokens.iter().filter_map(|t| t.value).collect();
    match values[..] {
        [] => ColumnPair::default(),
        [only] => ColumnPair {
            previous: None,
            current: Some(only),
        },
        [.., previous, current] => ColumnPair {
            previous: Some(previous),
            current: Some(current),
        },
    }
}

/// Tries every split point of a glued digit-group chain from the end,
/// accepting the rightmost split whose halves are both plausible figures.
fn split_glued_chain(groups: &[&str]) -> Option<ColumnPair> {
    for cut in (2..=groups.len().saturating_sub(2)).rev() {
        let left = normalize_token(&groups[..cut].concat());
        let right = normalize_token(&groups[cut..].concat());
        if let (Some(left), Some(right)) = (left, right) {
            if left.abs() >= MIN_FIGURE_MAGNITUDE && right.abs() >= MIN_FIGURE_MAGNITUDE {
                return Some(ColumnPair {
                    previous: Some(left),
                    current: Some(right),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_code() {
        assert_eq!(strip_line_code("101. Szállítók 510 432"), "Szállítók 510 432");
        assert_eq!(strip_line_code("98) III. Rövid lejáratú"), "Rövid lejáratú");
        assert_eq!(strip_line_code("B. Forgóeszközök 12 345"), "Forgóeszközök 12 345");
        assert_eq!(strip_line_code("Készletek 1 200"), "Készletek 1 200");
    }

    #[test]
    fn test_two_clean_grouped_numbers_previous_first() {
        let pair = resolve_columns("Forgóeszközök   12 345   9 876", ColumnOrder::PreviousFirst);
        assert_eq!(pair.previous, Some(12345));
        assert_eq!(pair.current, Some(9876));
    }

    #[test]
    fn test_two_clean_grouped_numbers_current_first() {
        let pair = resolve_columns("Forgóeszközök   12 345   9 876", ColumnOrder::CurrentFirst);
        assert_eq!(pair.previous, Some(9876));
        assert_eq!(pair.current, Some(12345));
    }

    #[test]
    fn test_middle_adjustment_column_is_ignored() {
        let pair = resolve_columns(
            "Saját tőke 2 064 948   -84 928   1 980 020",
            ColumnOrder::PreviousFirst,
        );
        assert_eq!(pair.previous, Some(2064948));
        assert_eq!(pair.current, Some(1980020));
    }

    #[test]
    fn test_four_column_row_keeps_first_and_last() {
        let pair = resolve_columns(
            "Követelések 1 100 000   2 200   3 300   4 400 000",
            ColumnOrder::PreviousFirst,
        );
        assert_eq!(pair.previous, Some(1100000));
        assert_eq!(pair.current, Some(4400000));
    }

    #[test]
    fn test_glued_chain_split_after_code_strip() {
        let pair = resolve_columns("101. Szállítók 510 432 155 474", ColumnOrder::PreviousFirst);
        assert_eq!(pair.previous, Some(510432));
        assert_eq!(pair.current, Some(155474));
    }

    #[test]
    fn test_glued_chain_with_odd_group_count() {
        // "2 972 773 995 413": five groups, rightmost valid split is 3|2.
        let pair = resolve_columns("Készletek 2 972 773 995 413", ColumnOrder::PreviousFirst);
        assert_eq!(pair.previous, Some(2972773));
        assert_eq!(pair.current, Some(995413));
    }

    #[test]
    fn test_plain_token_fallback() {
        let pair = resolve_columns("Egyéb bevételek 4100 5200", ColumnOrder::PreviousFirst);
        assert_eq!(pair.previous, Some(4100));
        assert_eq!(pair.current, Some(5200));
    }

    #[test]
    fn test_single_value_is_current_only() {
        let pair = resolve_columns("Adózott eredmény 959 928", ColumnOrder::PreviousFirst);
        assert_eq!(pair.previous, None);
        assert_eq!(pair.current, Some(959928));
    }

    #[test]
    fn test_no_numbers_yields_empty_pair() {
        let pair = resolve_columns("Források összesen", ColumnOrder::PreviousFirst);
        assert!(pair.is_empty());
    }

    #[test]
    fn test_row_code_digits_never_become_values() {
        let pair = resolve_columns("66. IV. Pénzeszközök 8 400", ColumnOrder::PreviousFirst);
        assert_eq!(pair.previous, None);
        assert_eq!(pair.current, Some(8400));
    }

    #[test]
    fn test_returned_magnitudes_match_extracted_tokens() {
        let line = "Kötelezettségek 44 000   55 000";
        let pair = resolve_columns(line, ColumnOrder::PreviousFirst);
        for v in [pair.previous.unwrap(), pair.current.unwrap()] {
            assert!(
                crate::numeric::extract_values(line).contains(&v),
                "{} not among extracted tokens",
                v
            );
        }
    }
}
