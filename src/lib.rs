//! # feed-scraper
//!
//! Feed traversal and post extraction for social-network feeds driven
//! through a page-automation session.
//!
//! The crate scrolls an effectively infinite feed, discovers each post in
//! display order, and assembles a structured [`Post`] from it despite
//! shifting layouts, render lag and elements that go stale between reads.
//!
//! ## Quick Start
//!
//! ```rust
//! use feed_scraper::{Feed, Field, Options, Pacing, SnapshotPage};
//!
//! let page = SnapshotPage::parse(
//!     r#"<div role="feed"><h3>New activity</h3>
//!        <div><div data-ad-preview="message">Hello feed</div></div></div>"#,
//! );
//! let options = Options {
//!     fields: [Field::Text].into(),
//!     pacing: Pacing::none(),
//!     ..Options::default()
//! };
//!
//! let posts: Vec<_> = Feed::new(&page, options).browse()?.collect();
//! assert_eq!(posts[0].text.as_deref(), Some("Hello feed"));
//! # Ok::<(), feed_scraper::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Opt-in fields**: only the fields in [`Options::fields`] are extracted;
//!   hover-heavy fields (timestamps, reactions) cost nothing when not requested
//! - **Layout variants**: arrow, classic and group metadata headings, selected
//!   once per post from the selector catalog
//! - **Bulkheads**: a failing field degrades to `None` without affecting others
//! - **Comment trees**: complete, chronologically ranked, flattened depth-first
//! - **Interactions**: like/unlike with a forced-click fallback
//!
//! The browser itself is abstracted behind the [`Page`] trait.
//! [`SnapshotPage`] replays saved HTML snapshots offline.

mod error;
mod patterns;

/// Typed field identifiers and the requested-field set.
pub mod field;

/// Configuration passed to the traversal controller and the assembler.
pub mod options;

/// Post, comment and reaction records.
pub mod model;

/// Selector catalog and locator resolution.
pub mod selector;

/// Page-automation interface and the snapshot replay driver.
pub mod driver;

/// One extractor per post field.
pub mod extractor;

/// Per-post assembly with per-field isolation.
pub mod assemble;

/// Comment tree expansion and flattening.
pub mod comments;

/// Scroll-and-discover traversal of the feed.
pub mod feed;

/// Like/unlike interactions.
pub mod interact;

/// CSV and JSON-lines output.
pub mod export;

// Public API - re-exports
pub use assemble::{assemble_post, Assembly};
pub use comments::{CommentNode, Expansion};
pub use driver::snapshot::{PageStats, SnapshotElement, SnapshotPage};
pub use driver::Page;
pub use error::{Error, Result};
pub use feed::{Feed, Posts, SidebarAd};
pub use field::{Field, FieldSet, UnknownField};
pub use model::{Comment, Metadata, Post, PostId, Reaction, Reactions, NO_TEXT};
pub use options::{Options, Pacing};
