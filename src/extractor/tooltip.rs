//! Hover popups and exact timestamps.
//!
//! The feed shows only relative times ("3 h", "Yesterday"). Hovering the
//! time indicator reveals a tooltip with the full date and time in a fixed
//! format, which is the only value trusted for a timestamp.

use chrono::NaiveDateTime;
use tracing::warn;

use super::Extracted;
use crate::driver::Page;
use crate::options::{pause, Options};
use crate::selector::{self, Region};
use crate::Result;

/// Format of the exact-time tooltip, e.g. `"Friday, June 6, 2025 at 03:15 PM"`.
pub const TOOLTIP_TIME_FORMAT: &str = "%A, %B %d, %Y at %I:%M %p";

/// Hovers `el` and polls for the tooltip it reveals.
///
/// Several tooltips may be present at once; the last one belongs to the most
/// recent hover. Returns `None` when no tooltip shows up within the
/// configured number of polls.
pub fn tooltip_text<P: Page>(page: &P, el: &P::Element, opts: &Options, settle: bool) -> Result<Option<String>> {
    page.hover(el)?;

    for attempt in 0..opts.tooltip_poll_attempts.max(1) {
        let tooltips = selector::find_common_all(page, None, Region::Tooltip)?;
        if let Some(tooltip) = tooltips.last() {
            if settle {
                pause(opts.pacing.reaction_settle());
            }
            return Ok(Some(page.inner_text(tooltip)?));
        }
        if attempt + 1 < opts.tooltip_poll_attempts {
            pause(opts.pacing.tooltip_poll_interval());
        }
    }
    Ok(None)
}

/// Parses the exact-time tooltip text.
#[must_use]
pub fn parse_tooltip_timestamp(text: &str) -> Option<NaiveDateTime> {
    let normalized = text
        .replace(['\u{202f}', '\u{a0}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    NaiveDateTime::parse_from_str(&normalized, TOOLTIP_TIME_FORMAT).ok()
}

/// Reads the exact timestamp behind a time indicator element.
///
/// `Absent` when no tooltip appeared; `Unparseable` (logged) when its text
/// does not match [`TOOLTIP_TIME_FORMAT`].
pub fn timestamp_from_el<P: Page>(
    page: &P,
    time_el: &P::Element,
    opts: &Options,
) -> Result<Extracted<NaiveDateTime>> {
    let Some(text) = tooltip_text(page, time_el, opts, false)? else {
        warn!(element = ?time_el, "timestamp tooltip did not appear");
        return Ok(Extracted::Absent);
    };

    match parse_tooltip_timestamp(&text) {
        Some(ts) => Ok(Extracted::Found(ts)),
        None => {
            warn!(tooltip = %text, "unparseable timestamp tooltip");
            Ok(Extracted::Unparseable(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::snapshot::SnapshotPage;
    use crate::options::Pacing;
    use chrono::NaiveDate;

    fn opts() -> Options {
        Options {
            pacing: Pacing::none(),
            ..Options::default()
        }
    }

    #[test]
    fn test_parse_tooltip_timestamp_exact() {
        let ts = parse_tooltip_timestamp("Friday, June 6, 2025 at 03:15 PM").expect("parses");
        let expected = NaiveDate::from_ymd_opt(2025, 6, 6)
            .and_then(|d| d.and_hms_opt(15, 15, 0))
            .expect("valid date");
        assert_eq!(ts, expected);
    }

    #[test]
    fn test_parse_tooltip_timestamp_narrow_spaces() {
        let ts = parse_tooltip_timestamp("Monday, January 13, 2025 at 9:05\u{202f}AM").expect("parses");
        assert_eq!(ts.to_string(), "2025-01-13 09:05:00");
    }

    #[test]
    fn test_parse_tooltip_timestamp_rejects_relative() {
        assert!(parse_tooltip_timestamp("3 h").is_none());
        assert!(parse_tooltip_timestamp("").is_none());
    }

    #[test]
    fn test_timestamp_from_el_polls_until_tooltip_renders() {
        let page = SnapshotPage::parse(
            r#"<a id="t" aria-describedby="tip">2 d</a>
               <div role="tooltip" id="tip" data-delay="3"><span>Friday, June 6, 2025 at 03:15 PM</span></div>"#,
        );
        let el = page.find_all(None, "#t").expect("lookup").remove(0);
        let ts = timestamp_from_el(&page, &el, &opts()).expect("no driver error");
        assert_eq!(ts.found().map(|t| t.to_string()).as_deref(), Some("2025-06-06 15:15:00"));
    }

    #[test]
    fn test_timestamp_from_el_gives_up_after_bounded_polls() {
        let page = SnapshotPage::parse(
            r#"<a id="t" aria-describedby="tip">2 d</a>
               <div role="tooltip" id="tip" data-delay="50">Friday, June 6, 2025 at 03:15 PM</div>"#,
        );
        let el = page.find_all(None, "#t").expect("lookup").remove(0);
        page.reset_stats();
        let ts = timestamp_from_el(&page, &el, &opts()).expect("no driver error");
        assert!(ts.is_absent());
        assert_eq!(page.stats().lookups, 10);
    }

    #[test]
    fn test_timestamp_from_el_unparseable() {
        let page = SnapshotPage::parse(
            r#"<a id="t" aria-describedby="tip">2 d</a><div role="tooltip" id="tip">Yesterday</div>"#,
        );
        let el = page.find_all(None, "#t").expect("lookup").remove(0);
        let ts = timestamp_from_el(&page, &el, &opts()).expect("no driver error");
        assert_eq!(ts, Extracted::Unparseable("Yesterday".to_string()));
    }
}
