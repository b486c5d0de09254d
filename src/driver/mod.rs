//! Page automation interface.
//!
//! The engine never talks to a browser directly. It drives a [`Page`], which
//! exposes the handful of primitives scraping needs: query, read, hover,
//! click and scroll. A live WebDriver/CDP session implements this trait on
//! the outside; [`snapshot::SnapshotPage`] implements it over saved HTML.
//!
//! Element handles are only valid for the render they were obtained from.
//! Any primitive may fail with [`Error::ElementUnstable`](crate::Error) once
//! the page re-renders, and callers treat that as a normal condition.
//!
//! A `Page` is a single shared mutable session: methods take `&self` and
//! implementations are not expected to be `Sync`.

use std::fmt::Debug;

use crate::Result;

pub mod snapshot;

/// A browser page that can be queried and driven.
pub trait Page {
    /// Handle to one rendered element, scoped to the current render.
    type Element: Clone + Debug;

    /// Rendered descendants of `scope` (or of the document) matching `css`.
    fn find_all(&self, scope: Option<&Self::Element>, css: &str) -> Result<Vec<Self::Element>>;

    /// The 1-based `position`-th element child of `parent`.
    ///
    /// Fails with `ElementAbsent` if that child is not (yet) rendered.
    fn child_at(&self, parent: &Self::Element, position: usize) -> Result<Self::Element>;

    /// Rendered element children of `parent`.
    fn children(&self, parent: &Self::Element) -> Result<Vec<Self::Element>>;

    /// Rendered text, with a line break between block elements.
    fn inner_text(&self, el: &Self::Element) -> Result<String>;

    /// Full text content, including parts hidden by CSS truncation.
    fn text_content(&self, el: &Self::Element) -> Result<String>;

    fn attribute(&self, el: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Moves the pointer onto `el`.
    fn hover(&self, el: &Self::Element) -> Result<()>;

    /// A regular pointer click. Fails with `ElementBlocked` when covered or hidden.
    fn click(&self, el: &Self::Element) -> Result<()>;

    /// A script-level click that ignores overlapping elements.
    fn force_click(&self, el: &Self::Element) -> Result<()>;

    /// Whether a regular click would currently reach `el`.
    fn is_interactable(&self, el: &Self::Element) -> Result<bool>;

    fn scroll_to_top(&self) -> Result<()>;

    /// Scrolls to the current bottom, which makes the feed load more posts.
    fn scroll_to_bottom(&self) -> Result<()>;

    /// Vertical scroll offset in pixels.
    fn scroll_position(&self) -> Result<u64>;

    /// Structural identity of a handle; only stable within one render.
    fn handle_hash(&self, el: &Self::Element) -> u64;
}
