//! Compiled regex patterns used by the extractors.
//!
//! All patterns are compiled once at startup using `LazyLock` for efficiency.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Last line of a reactor popup that lists only some names, e.g. `"and 12 more…"`.
pub static MORE_REACTORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^and ([0-9][0-9,.\u{a0}\u{202f}]*) more(?:…|\.\.\.)?$").expect("MORE_REACTORS regex")
});

/// Leading count of a localized label: `"12 Comments"`, `"1.2K Shares"`, `"3,405 Comments"`.
///
/// Captures the digits and an optional `K`/`M` multiplier; the label must
/// continue with a word after the number.
pub static COUNT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9][0-9,.\u{a0}\u{202f}]*)\s*([KkMm])?\s+\p{L}").expect("COUNT_LABEL regex")
});

/// Leading count of a short reaction summary: `"3"`, `"1.2K"`, `"3 reactions; see who…"`.
pub static LEADING_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9][0-9,.]*)\s*([KkMm])?\b").expect("LEADING_COUNT regex")
});

/// Post identifier inside a permalink.
pub static PERMALINK_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:/posts/|/permalink/|/videos/|[?&]story_fbid=|[?&]fbid=)([0-9A-Za-z]+)")
        .expect("PERMALINK_ID regex")
});

/// Everything from the first query separator on, for hrefs `url` cannot parse.
pub static QUERY_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&#].*$").expect("QUERY_TAIL regex"));
