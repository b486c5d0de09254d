//! Snapshot replay driver.
//!
//! `SnapshotPage` implements [`Page`] over a saved HTML document using
//! `dom_query`. It replays the behaviour of a live feed through a few
//! attributes in the snapshot:
//!
//! | Attribute | Behaviour |
//! |-----------|-----------|
//! | `data-batch="N"` | rendered only after `N` scroll-to-bottom actions; `"never"` never renders |
//! | `role="tooltip"` | rendered only while an element whose `aria-describedby` names its `id` is hovered |
//! | `data-delay="N"` | (tooltips) stays hidden for the first `N` lookups after the hover |
//! | `data-expander="X"` | clicking it hides the control and renders every `data-expanded-by="X"` element |
//! | `data-blocked` | regular clicks fail with `ElementBlocked`; forced clicks work |
//! | `data-stale-once` | the first operation on the element fails with `ElementUnstable` |
//!
//! Clicking a like control toggles its `aria-label` between `Like` and
//! `Remove Like`. Every primitive is counted in [`PageStats`].

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use dom_query::{Document, NodeId, NodeRef, Selection};

use super::Page;
use crate::{Error, Result};

/// Simulated scroll distance per scroll-to-bottom, in pixels.
const SCROLL_STEP: u64 = 1000;

/// Tags rendered as their own line by `inner_text`.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Handle to an element of a [`SnapshotPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotElement(NodeId);

/// Number of calls made to each page primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    pub lookups: usize,
    pub text_reads: usize,
    pub hovers: usize,
    pub clicks: usize,
    pub forced_clicks: usize,
    pub scrolls: usize,
}

/// A [`Page`] backed by a parsed HTML snapshot.
pub struct SnapshotPage {
    doc: Document,
    scrolls: Cell<usize>,
    scroll_offset: Cell<u64>,
    hovered: Cell<Option<NodeId>>,
    polls_since_hover: Cell<usize>,
    expanded: RefCell<HashSet<String>>,
    stale_consumed: RefCell<HashSet<NodeId>>,
    stats: Cell<PageStats>,
}

impl SnapshotPage {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Document::from(html),
            scrolls: Cell::new(0),
            scroll_offset: Cell::new(0),
            hovered: Cell::new(None),
            polls_since_hover: Cell::new(0),
            expanded: RefCell::new(HashSet::new()),
            stale_consumed: RefCell::new(HashSet::new()),
            stats: Cell::new(PageStats::default()),
        }
    }

    /// Calls made so far.
    #[must_use]
    pub fn stats(&self) -> PageStats {
        self.stats.get()
    }

    pub fn reset_stats(&self) {
        self.stats.set(PageStats::default());
    }

    /// Current value of an attribute, read without touching the counters.
    #[must_use]
    pub fn peek_attribute(&self, el: &SnapshotElement, name: &str) -> Option<String> {
        self.doc.tree.get(&el.0).and_then(|node| attr(node, name))
    }

    fn count(&self, update: impl FnOnce(&mut PageStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Resolves a handle, failing once for `data-stale-once` elements.
    fn node(&self, el: &SnapshotElement) -> Result<NodeRef<'_>> {
        let node = self
            .doc
            .tree
            .get(&el.0)
            .ok_or_else(|| Error::ElementUnstable(format!("{el:?} is detached")))?;

        if attr(node, "data-stale-once").is_some() && self.stale_consumed.borrow_mut().insert(el.0) {
            return Err(Error::ElementUnstable(format!("{el:?} was re-rendered")));
        }
        Ok(node)
    }

    fn is_rendered(&self, node: NodeRef<'_>) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n.is_element() && !self.renders_itself(n) {
                return false;
            }
            current = n.parent();
        }
        true
    }

    fn renders_itself(&self, node: NodeRef<'_>) -> bool {
        if let Some(batch) = attr(node, "data-batch") {
            let visible = batch
                .trim()
                .parse::<usize>()
                .is_ok_and(|needed| needed <= self.scrolls.get());
            if !visible {
                return false;
            }
        }
        if let Some(expander) = attr(node, "data-expanded-by") {
            if !self.expanded.borrow().contains(expander.trim()) {
                return false;
            }
        }
        if attr(node, "role").as_deref() == Some("tooltip") {
            return self.tooltip_revealed(node);
        }
        true
    }

    fn tooltip_revealed(&self, tooltip: NodeRef<'_>) -> bool {
        let Some(id) = attr(tooltip, "id") else {
            return false;
        };
        let Some(hovered) = self.hovered.get().and_then(|h| self.doc.tree.get(&h)) else {
            return false;
        };

        let mut linked = false;
        let mut current = Some(hovered);
        while let Some(n) = current {
            if attr(n, "aria-describedby").is_some_and(|ids| ids.split_whitespace().any(|t| t == id)) {
                linked = true;
                break;
            }
            current = n.parent();
        }

        let delay = attr(tooltip, "data-delay")
            .and_then(|d| d.trim().parse::<usize>().ok())
            .unwrap_or(0);
        linked && self.polls_since_hover.get() > delay
    }

    fn element_children<'a>(node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
        let mut children = Vec::new();
        let mut child = node.first_child();
        while let Some(c) = child {
            if c.is_element() {
                children.push(c);
            }
            child = c.next_sibling();
        }
        children
    }

    fn render_text(&self, node: NodeRef<'_>, include_hidden: bool) -> String {
        let mut out = String::new();
        self.push_text(node, include_hidden, &mut out);
        normalize_lines(&out)
    }

    fn push_text(&self, node: NodeRef<'_>, include_hidden: bool, out: &mut String) {
        let mut child = node.first_child();
        while let Some(c) = child {
            if c.is_text() {
                out.push_str(&c.text());
            } else if c.is_element() && (include_hidden || self.renders_itself(c)) {
                let tag = c.node_name().map(|t| t.to_ascii_lowercase()).unwrap_or_default();
                let block = BLOCK_TAGS.contains(&tag.as_str());
                if block {
                    out.push('\n');
                }
                self.push_text(c, include_hidden, out);
                if block {
                    out.push('\n');
                }
            }
            child = c.next_sibling();
        }
    }

    fn activate(&self, node: NodeRef<'_>) {
        let sel = Selection::from(node);
        match attr(node, "aria-label").as_deref() {
            Some("Like") => sel.set_attr("aria-label", "Remove Like"),
            Some("Remove Like") => sel.set_attr("aria-label", "Like"),
            _ => {}
        }
        if let Some(target) = attr(node, "data-expander") {
            self.expanded.borrow_mut().insert(target.trim().to_string());
            sel.set_attr("data-batch", "never");
        }
    }
}

impl Page for SnapshotPage {
    type Element = SnapshotElement;

    fn find_all(&self, scope: Option<&SnapshotElement>, css: &str) -> Result<Vec<SnapshotElement>> {
        self.count(|s| s.lookups += 1);
        self.polls_since_hover.set(self.polls_since_hover.get() + 1);

        let root = match scope {
            Some(el) => Selection::from(self.node(el)?),
            None => self.doc.select("html"),
        };
        let Some(matched) = root.try_select(css) else {
            return Ok(Vec::new());
        };

        Ok(matched
            .nodes()
            .iter()
            .filter(|n| n.is_element() && self.is_rendered(**n))
            .map(|n| SnapshotElement(n.id))
            .collect())
    }

    fn child_at(&self, parent: &SnapshotElement, position: usize) -> Result<SnapshotElement> {
        self.count(|s| s.lookups += 1);
        let node = self.node(parent)?;
        position
            .checked_sub(1)
            .and_then(|i| Self::element_children(node).get(i).copied())
            .filter(|child| self.is_rendered(*child))
            .map(|child| SnapshotElement(child.id))
            .ok_or_else(|| Error::ElementAbsent(format!("child {position} of {parent:?}")))
    }

    fn children(&self, parent: &SnapshotElement) -> Result<Vec<SnapshotElement>> {
        self.count(|s| s.lookups += 1);
        let node = self.node(parent)?;
        Ok(Self::element_children(node)
            .into_iter()
            .filter(|c| self.is_rendered(*c))
            .map(|c| SnapshotElement(c.id))
            .collect())
    }

    fn inner_text(&self, el: &SnapshotElement) -> Result<String> {
        self.count(|s| s.text_reads += 1);
        let node = self.node(el)?;
        Ok(self.render_text(node, false))
    }

    fn text_content(&self, el: &SnapshotElement) -> Result<String> {
        self.count(|s| s.text_reads += 1);
        let node = self.node(el)?;
        Ok(self.render_text(node, true))
    }

    fn attribute(&self, el: &SnapshotElement, name: &str) -> Result<Option<String>> {
        let node = self.node(el)?;
        Ok(attr(node, name))
    }

    fn hover(&self, el: &SnapshotElement) -> Result<()> {
        self.count(|s| s.hovers += 1);
        let node = self.node(el)?;
        if !self.is_rendered(node) {
            return Err(Error::ElementBlocked(format!("{el:?} is not rendered")));
        }
        self.hovered.set(Some(el.0));
        self.polls_since_hover.set(0);
        Ok(())
    }

    fn click(&self, el: &SnapshotElement) -> Result<()> {
        self.count(|s| s.clicks += 1);
        let node = self.node(el)?;
        if attr(node, "data-blocked").is_some() || !self.is_rendered(node) {
            return Err(Error::ElementBlocked(format!("{el:?} is covered or hidden")));
        }
        self.activate(node);
        Ok(())
    }

    fn force_click(&self, el: &SnapshotElement) -> Result<()> {
        self.count(|s| s.forced_clicks += 1);
        let node = self.node(el)?;
        self.activate(node);
        Ok(())
    }

    fn is_interactable(&self, el: &SnapshotElement) -> Result<bool> {
        let node = self.node(el)?;
        Ok(attr(node, "data-blocked").is_none() && self.is_rendered(node))
    }

    fn scroll_to_top(&self) -> Result<()> {
        self.count(|s| s.scrolls += 1);
        self.scroll_offset.set(0);
        Ok(())
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        self.count(|s| s.scrolls += 1);
        self.scrolls.set(self.scrolls.get() + 1);
        self.scroll_offset.set(self.scrolls.get() as u64 * SCROLL_STEP);
        Ok(())
    }

    fn scroll_position(&self) -> Result<u64> {
        Ok(self.scroll_offset.get())
    }

    fn handle_hash(&self, el: &SnapshotElement) -> u64 {
        let mut hasher = DefaultHasher::new();
        el.0.hash(&mut hasher);
        hasher.finish()
    }
}

fn attr(node: NodeRef<'_>, name: &str) -> Option<String> {
    Selection::from(node).attr(name).map(|v| v.to_string())
}

/// Collapses runs of whitespace inside lines and drops empty lines.
fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
