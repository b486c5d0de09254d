//! Configuration options for feed traversal and post extraction.
//!
//! The `Options` struct is passed explicitly into the traversal controller and
//! the post assembler. The requested `fields` decide which extractors run;
//! nothing is inferred per extractor call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::field::FieldSet;
use crate::Result;

/// Configuration options for browsing a feed.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use feed_scraper::{Field, FieldSet, Options};
///
/// let options = Options {
///     fields: FieldSet::from([Field::User, Field::Text]),
///     ..Options::default()
/// };
/// assert!(!options.fields.contains(Field::Reactions));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Fields to extract for every post.
    ///
    /// Default: all fields
    pub fields: FieldSet,

    /// Name of the group or page being browsed.
    ///
    /// When set, post headings are read with the group layout and this name
    /// is used as every post's page.
    ///
    /// Default: `None`
    pub group: Option<String>,

    /// Number of non-post children at the top of the feed container.
    ///
    /// Default: `1`
    pub feed_header_children: usize,

    /// Consecutive failed scroll attempts after which the feed is considered over.
    ///
    /// Default: `10`
    pub scroll_fail_limit: usize,

    /// Lookups of a missing post slot after each scroll before the slot is skipped.
    ///
    /// Default: `10`
    pub load_retry_limit: usize,

    /// Lookups of a hover tooltip before giving up on it.
    ///
    /// Default: `10`
    pub tooltip_poll_attempts: usize,

    /// Maximum "View more comments" clicks per comment list.
    ///
    /// Default: `50`
    pub comment_page_limit: usize,

    /// Log per-field timings at INFO instead of DEBUG.
    ///
    /// Default: `false`
    pub report_timings: bool,

    /// Blocking pauses between page actions.
    pub pacing: Pacing,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fields: FieldSet::all(),
            group: None,
            feed_header_children: 1,
            scroll_fail_limit: 10,
            load_retry_limit: 10,
            tooltip_poll_attempts: 10,
            comment_page_limit: 50,
            report_timings: false,
            pacing: Pacing::default(),
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default options restricted to `fields`.
    #[must_use]
    pub fn with_fields(fields: impl Into<FieldSet>) -> Self {
        Self {
            fields: fields.into(),
            ..Self::default()
        }
    }
}

/// Pause lengths in milliseconds.
///
/// Every wait in the engine is a blocking sleep of one of these lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// After scrolling to the bottom to load more posts.
    ///
    /// Default: `1200`
    pub scroll_pause_ms: u64,

    /// Between lookups of a post slot that has not rendered yet.
    ///
    /// Default: `500`
    pub load_retry_interval_ms: u64,

    /// Between lookups of a hover tooltip.
    ///
    /// Default: `100`
    pub tooltip_poll_interval_ms: u64,

    /// After a reaction popup appears, before reading its list.
    ///
    /// Default: `1000`
    pub reaction_settle_ms: u64,

    /// After toggling a like.
    ///
    /// Default: `400`
    pub like_settle_ms: u64,

    /// How long to wait for the like control to become interactable.
    ///
    /// Default: `5000`
    pub clickable_timeout_ms: u64,

    /// After clicking an expander ("See more", "View more comments").
    ///
    /// Default: `300`
    pub click_settle_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            scroll_pause_ms: 1200,
            load_retry_interval_ms: 500,
            tooltip_poll_interval_ms: 100,
            reaction_settle_ms: 1000,
            like_settle_ms: 400,
            clickable_timeout_ms: 5000,
            click_settle_ms: 300,
        }
    }
}

impl Pacing {
    /// No pauses at all; for snapshot replay and tests.
    #[must_use]
    pub fn none() -> Self {
        Self {
            scroll_pause_ms: 0,
            load_retry_interval_ms: 0,
            tooltip_poll_interval_ms: 0,
            reaction_settle_ms: 0,
            like_settle_ms: 0,
            clickable_timeout_ms: 0,
            click_settle_ms: 0,
        }
    }

    #[must_use]
    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    #[must_use]
    pub fn load_retry_interval(&self) -> Duration {
        Duration::from_millis(self.load_retry_interval_ms)
    }

    #[must_use]
    pub fn tooltip_poll_interval(&self) -> Duration {
        Duration::from_millis(self.tooltip_poll_interval_ms)
    }

    #[must_use]
    pub fn reaction_settle(&self) -> Duration {
        Duration::from_millis(self.reaction_settle_ms)
    }

    #[must_use]
    pub fn like_settle(&self) -> Duration {
        Duration::from_millis(self.like_settle_ms)
    }

    #[must_use]
    pub fn clickable_timeout(&self) -> Duration {
        Duration::from_millis(self.clickable_timeout_ms)
    }

    #[must_use]
    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }
}

/// Blocking pause; zero-length pauses return immediately.
pub(crate) fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
