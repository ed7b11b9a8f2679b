//! Splits full statement text into balance-sheet and income-statement regions.

use log::debug;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static BALANCE_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new("MÉRLEG")
        .case_insensitive(true)
        .build()
        .expect("valid balance anchor regex")
});

static INCOME_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new("EREDMÉNYKIMUTATÁS")
        .case_insensitive(true)
        .build()
        .expect("valid income anchor regex")
});

/// Locates the balance-sheet and income-statement heading anchors and returns
/// `(balance_slice, income_slice)`.
///
/// When both anchors are present and the balance-sheet heading comes first,
/// the balance slice runs from its anchor up to the income anchor, and the
/// income slice from its anchor to the end. If either anchor is missing (or
/// they appear out of order) the whole text is returned as both slices, which
/// degrades to searching the entire document for every label and tolerates
/// the occasional false positive from the wrong section.
pub fn segment_sections(text: &str) -> (&str, &str) {
    let balance_start = BALANCE_ANCHOR_RE.find(text).map(|m| m.start());
    let income_start = INCOME_ANCHOR_RE.find(text).map(|m| m.start());

    match (balance_start, income_start) {
        (Some(balance), Some(income)) if balance < income => {
            (&text[balance..income], &text[income..])
        }
        _ => {
            debug!("Section anchors not found in expected order; searching full text for every label");
            (text, text)
        }
    }
}
