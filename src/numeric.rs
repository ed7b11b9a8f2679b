//! Numeric token normalization and grouped-number extraction.
//!
//! Statement text arrives from a layout-to-text converter, so amounts show up
//! as space- or dot-grouped thousands ("510 432", "1.234.567"), with unicode
//! minus variants, parenthesized negatives, or two adjacent column values glued
//! into a single chain of 3-digit groups. Everything here is best-effort: a
//! token that cannot be read as a number yields `None`, never an error.

use regex::Regex;
use std::sync::LazyLock;

/// Dash characters that PDF extraction produces in place of ASCII minus.
const MINUS_VARIANTS: [char; 5] = ['-', '\u{2212}', '\u{2012}', '\u{2013}', '\u{2014}'];

/// Matches one numeric token: an optional sign, then either a thousands-grouped
/// chain (groups of exactly 3 digits after the first) or a plain digit run.
/// Requiring exactly 3 digits per continuation group is what keeps two adjacent
/// amounts like "12 345   9 876" from merging into one match.
static NUMBER_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+\u{2212}\u{2012}\u{2013}\u{2014}]?(?:[0-9]{1,3}(?:[ .][0-9]{3})+|[0-9]+)")
        .expect("valid number token regex")
});

/// A number candidate cut from a single line of text.
///
/// Ephemeral: lives only for the extraction of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericToken {
    /// The matched substring, with non-breaking spaces already folded to ASCII.
    pub raw: String,
    /// Parsed signed value, `None` on normalization failure.
    pub value: Option<i64>,
    /// Number of digit runs inside the token (1 for an ungrouped run).
    pub group_count: usize,
}

impl NumericToken {
    /// Whether the token was rendered with thousands separators.
    pub fn is_grouped(&self) -> bool {
        self.group_count >= 2
    }
}

/// Folds the non-breaking space family down to ASCII space so the token
/// pattern only needs to know about one separator character.
pub(crate) fn fold_spaces(line: &str) -> String {
    line.replace(['\u{00A0}', '\u{202F}'], " ")
}

/// Normalizes one raw numeric token into a signed integer.
///
/// Rules, in order: trim; parenthesized tokens flip the sign; a leading minus
/// (ASCII or any unicode dash variant) *toggles* the sign already established
/// by parentheses, so a double negative round-trips; interior whitespace and
/// `.` thousands separators are removed; what remains must be digits, else the
/// longest contiguous digit run is taken as a last-resort recovery.
///
/// Returns `None` for anything that is not a number. Never panics.
pub fn normalize_token(token: &str) -> Option<i64> {
    let mut s = token.trim();
    let mut negative = false;

    if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = s[1..s.len() - 1].trim();
    }

    if let Some(first) = s.chars().next() {
        if first == '+' {
            s = s[first.len_utf8()..].trim_start();
        } else if MINUS_VARIANTS.contains(&first) {
            negative = !negative;
            s = s[first.len_utf8()..].trim_start();
        }
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let digits = if cleaned.bytes().all(|b| b.is_ascii_digit()) {
        cleaned.as_str()
    } else {
        longest_digit_run(&cleaned)?
    };

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Longest contiguous ASCII digit run in `s`, or `None` if there are no digits.
fn longest_digit_run(s: &str) -> Option<&str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .max_by_key(|run| run.len())
}

/// The digit runs of a token, in order ("510 432 155 474" -> [510, 432, 155, 474]).
pub fn digit_groups(raw: &str) -> Vec<&str> {
    raw.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .collect()
}

/// Extracts every numeric token from a line, left to right.
pub fn extract_tokens(line: &str) -> Vec<NumericToken> {
    let folded = fold_spaces(line);
    NUMBER_TOKEN_RE
        .find_iter(&folded)
        .map(|m| {
            let raw = m.as_str().to_string();
            let value = normalize_token(&raw);
            let group_count = digit_groups(&raw).len();
            NumericToken {
                raw,
                value,
                group_count,
            }
        })
        .collect()
}

/// Extracts the ordered integer values of a line.
///
/// A single token carrying 4 or more 3-digit groups with an even group count
/// is read as two concatenated amounts (a previous/current column pair that
/// the text converter rendered with no visual separator): the group sequence
/// is split at its midpoint and each half normalized independently.
pub fn extract_values(line: &str) -> Vec<i64> {
    let mut values = Vec::new();
    for token in extract_tokens(line) {
        if token.group_count >= 4 && token.group_count % 2 == 0 {
            let groups = digit_groups(&token.raw);
            let half = groups.len() / 2;
            let left = normalize_token(&groups[..half].concat());
            let right = normalize_token(&groups[half..].concat());
            if let (Some(left), Some(right)) = (left, right) {
                values.push(left);
                values.push(right);
                continue;
            }
        }
        if let Some(value) = token.value {
            values.push(value);
        }
    }
    values
}
