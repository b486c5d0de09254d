//! Field extractors.
//!
//! One extractor per semantic field. Each takes the page, a post-scoped
//! element handle and whatever layout/options context it needs, and returns
//! either a value or an error from the page layer. The assembler decides how
//! errors degrade; extractors themselves never panic.
//!
//! # Module Structure
//!
//! - `metadata`: layout detection, user, page and timestamp
//! - `tooltip`: hover-and-poll for popups, timestamp parsing
//! - `content`: post text (with "See more"/"See original" expansion)
//! - `reactions`: per-kind reaction counts from the reaction bar
//! - `counts`: comment and share count labels
//! - `flags`: sponsored, recommended, like state, media
//! - `permalink`: post URL normalization and post identity

pub mod content;
pub mod counts;
pub mod flags;
pub mod metadata;
pub mod permalink;
pub mod reactions;
pub mod tooltip;

pub use content::text;
pub use counts::{comment_count, parse_count_label, share_count};
pub use flags::{is_liked, is_recommended, is_sponsored, like_button, media, Media};
pub use metadata::{detect_layout, page_name, timestamp, user, Layout};
pub use permalink::{normalize_url, post_id, url};
pub use reactions::{count_reactions, count_reactors, reactions};
pub use tooltip::{parse_tooltip_timestamp, timestamp_from_el, tooltip_text};

use crate::{Error, Result};

/// Outcome of an extractor that distinguishes "not there" from "unreadable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    /// The value was read.
    Found(T),
    /// The UI region does not exist for this post.
    Absent,
    /// The region exists but its text did not match the expected format.
    Unparseable(String),
}

impl<T> Extracted<T> {
    /// The value, if one was read.
    pub fn found(self) -> Option<T> {
        match self {
            Extracted::Found(v) => Some(v),
            Extracted::Absent | Extracted::Unparseable(_) => None,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Extracted::Absent)
    }

    /// `Some` when found, `None` when absent, `ParseFailure` when unreadable.
    pub fn into_result(self, what: &'static str) -> Result<Option<T>> {
        match self {
            Extracted::Found(v) => Ok(Some(v)),
            Extracted::Absent => Ok(None),
            Extracted::Unparseable(input) => Err(Error::ParseFailure { what, input }),
        }
    }
}

/// Parses a localized number with an optional `K`/`M` multiplier.
///
/// Without a multiplier both `,` and `.` are thousands separators
/// (`"3,405"`, `"3.405"`); with one, either may be the decimal mark
/// (`"1.2K"`, `"1,2K"`).
#[must_use]
pub fn parse_count(digits: &str, multiplier: Option<&str>) -> Option<u64> {
    let digits: String = digits
        .chars()
        .filter(|c| !matches!(c, '\u{a0}' | '\u{202f}' | ' '))
        .collect();

    let scale = match multiplier.map(str::to_ascii_uppercase).as_deref() {
        None => return digits.replace([',', '.'], "").parse().ok(),
        Some("K") => 1_000.0,
        Some("M") => 1_000_000.0,
        Some(_) => return None,
    };

    let value: f64 = digits.replace(',', ".").parse().ok()?;
    let scaled = (value * scale).round();
    if scaled.is_finite() && scaled >= 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(scaled as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_plain_and_separators() {
        assert_eq!(parse_count("12", None), Some(12));
        assert_eq!(parse_count("3,405", None), Some(3405));
        assert_eq!(parse_count("3.405", None), Some(3405));
        assert_eq!(parse_count("1\u{a0}204", None), Some(1204));
    }

    #[test]
    fn test_parse_count_multipliers() {
        assert_eq!(parse_count("1.2", Some("K")), Some(1200));
        assert_eq!(parse_count("1,2", Some("k")), Some(1200));
        assert_eq!(parse_count("3", Some("M")), Some(3_000_000));
        assert_eq!(parse_count("x", Some("K")), None);
    }

    #[test]
    fn test_extracted_found() {
        assert_eq!(Extracted::Found(3).found(), Some(3));
        assert_eq!(Extracted::<u8>::Absent.found(), None);
        assert!(Extracted::<u8>::Absent.is_absent());
        assert_eq!(Extracted::<u8>::Unparseable("?".into()).found(), None);
    }

    #[test]
    fn test_extracted_into_result() {
        assert_eq!(Extracted::Found(2).into_result("n").expect("ok"), Some(2));
        assert_eq!(Extracted::<u8>::Absent.into_result("n").expect("ok"), None);
        let err = Extracted::<u8>::Unparseable("abc".into()).into_result("count").unwrap_err();
        assert!(matches!(err, Error::ParseFailure { what: "count", ref input } if input == "abc"));
    }
}
