//! Comment Tree Extractor
//!
//! Expands a post's comment section into a tree of [`CommentNode`]s.
//!
//! Before reading anything the ranking filter is switched to "All comments",
//! so the tree is complete and in chronological order rather than an
//! engagement-ranked subset. Every "View more comments" page is then loaded,
//! and each comment's replies are expanded recursively.
//!
//! Expansion re-queries the live page at every level. A comment whose handle
//! goes stale mid-read is located again once, by its text when that was
//! already read and by its position otherwise.

use tracing::{debug, warn};

use crate::driver::Page;
use crate::extractor::{parse_count, timestamp_from_el};
use crate::model::Comment;
use crate::options::{pause, Options};
use crate::patterns::LEADING_COUNT;
use crate::selector::{self, Region};
use crate::{Error, Result};

/// Expansion state of one comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The comment has replies that could not be expanded.
    Unexpanded,
    /// Expanded; no replies.
    Leaf,
    WithChildren(Vec<CommentNode>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    pub expansion: Expansion,
}

impl CommentNode {
    #[must_use]
    pub fn children(&self) -> &[CommentNode] {
        match &self.expansion {
            Expansion::WithChildren(children) => children,
            Expansion::Unexpanded | Expansion::Leaf => &[],
        }
    }
}

/// Flattens a comment tree depth-first: every comment is followed by all of
/// its replies before its next sibling.
#[must_use]
pub fn flatten(nodes: &[CommentNode]) -> Vec<Comment> {
    let mut flat = Vec::new();
    push_pre_order(nodes, &mut flat);
    flat
}

fn push_pre_order(nodes: &[CommentNode], out: &mut Vec<Comment>) {
    for node in nodes {
        out.push(node.comment.clone());
        push_pre_order(node.children(), out);
    }
}

struct Context<'a> {
    post_url: Option<&'a str>,
    opts: &'a Options,
}

/// Expands the comment section of `post` into its root comments.
///
/// A post without a comment list yields an empty tree.
pub fn expand<P: Page>(
    page: &P,
    post: &P::Element,
    post_url: Option<&str>,
    opts: &Options,
) -> Result<Vec<CommentNode>> {
    show_all_comments(page, post, opts);
    load_all_pages(page, post, opts);

    let list = match selector::find_common(page, Some(post), Region::CommentList) {
        Ok(list) => list,
        Err(e) if e.is_absent() => {
            debug!("post has no comment list");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let cx = Context { post_url, opts };
    expand_level(page, &list, true, &cx)
}

/// Switches the ranking filter to "All comments". Failures leave the
/// default ranking in place.
fn show_all_comments<P: Page>(page: &P, post: &P::Element, opts: &Options) {
    let filter = match selector::find_common(page, Some(post), Region::RankingFilter) {
        Ok(filter) => filter,
        Err(e) => {
            debug!(error = %e, "no comment ranking filter");
            return;
        }
    };
    if let Err(e) = page.click(&filter) {
        warn!(error = %e, "could not open the comment ranking menu");
        return;
    }
    pause(opts.pacing.click_settle());

    // The menu opens outside the post.
    let result = selector::find_common(page, None, Region::AllComments).and_then(|option| page.click(&option));
    match result {
        Ok(()) => pause(opts.pacing.click_settle()),
        Err(e) => warn!(error = %e, "could not select all comments"),
    }
}

fn load_all_pages<P: Page>(page: &P, post: &P::Element, opts: &Options) {
    for _ in 0..opts.comment_page_limit {
        let button = match selector::find_common(page, Some(post), Region::MoreComments) {
            Ok(button) => button,
            Err(e) if e.is_absent() => return,
            Err(e) => {
                warn!(error = %e, "could not look up more comments");
                return;
            }
        };
        if let Err(e) = page.click(&button) {
            warn!(error = %e, "could not load more comments");
            return;
        }
        pause(opts.pacing.click_settle());
    }
    warn!(limit = opts.comment_page_limit, "stopped loading comments at the page limit");
}

fn expand_level<P: Page>(
    page: &P,
    list: &P::Element,
    is_root: bool,
    cx: &Context<'_>,
) -> Result<Vec<CommentNode>> {
    let mut nodes = Vec::new();
    for (position, item) in page.children(list)?.into_iter().enumerate() {
        match expand_item(page, list, position, &item, is_root, cx) {
            Ok(Some(node)) => nodes.push(node),
            Ok(None) => {}
            Err(e) => warn!(position, is_root, error = %e, "skipping comment"),
        }
    }
    Ok(nodes)
}

/// Expands one list item, re-locating it once if it goes stale.
fn expand_item<P: Page>(
    page: &P,
    list: &P::Element,
    position: usize,
    item: &P::Element,
    is_root: bool,
    cx: &Context<'_>,
) -> Result<Option<CommentNode>> {
    let mut seen_text = None;
    match expand_node(page, item, is_root, cx, &mut seen_text) {
        Err(e) if e.is_stale() => {
            debug!(position, error = %e, "comment re-rendered, locating it again");
            let fresh = relocate(page, list, position, seen_text.as_deref())?;
            expand_node(page, &fresh, is_root, cx, &mut None)
        }
        outcome => outcome,
    }
}

/// Finds the list item a stale comment re-rendered as.
///
/// With its text known, the matching item closest to `position` wins, so a
/// sibling repeating the same short text is not read twice.
fn relocate<P: Page>(page: &P, list: &P::Element, position: usize, text: Option<&str>) -> Result<P::Element> {
    let items = page.children(list)?;
    let Some(text) = text else {
        return items
            .into_iter()
            .nth(position)
            .ok_or_else(|| Error::ElementAbsent(format!("comment {position}")));
    };

    items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| {
            selector::find_common(page, Some(item), Region::CommentBody)
                .and_then(|body| comment_text(page, &body))
                .is_ok_and(|t| t == text)
        })
        .min_by_key(|(i, _)| i.abs_diff(position))
        .map(|(_, item)| item)
        .ok_or_else(|| Error::ElementAbsent(format!("comment reading {text:?}")))
}

/// Reads one comment and expands its replies.
///
/// List items without a comment body (loaders, reply prompts) yield `None`.
fn expand_node<P: Page>(
    page: &P,
    item: &P::Element,
    is_root: bool,
    cx: &Context<'_>,
    seen_text: &mut Option<String>,
) -> Result<Option<CommentNode>> {
    let body = match selector::find_common(page, Some(item), Region::CommentBody) {
        Ok(body) => body,
        Err(e) if e.is_absent() => return Ok(None),
        Err(e) => return Err(e),
    };

    let text = comment_text(page, &body)?;
    *seen_text = Some(text.clone());

    let author = optional_text(page, &body, Region::CommentAuthor)?;
    let timestamp = match selector::find_common(page, Some(&body), Region::CommentTime) {
        Ok(time) => timestamp_from_el(page, &time, cx.opts)?.found(),
        Err(e) if e.is_absent() => None,
        Err(e) => return Err(e),
    };
    let reaction_count = reaction_count(page, &body)?;

    let expansion = expand_replies(page, item, cx)?;
    let has_children = !matches!(expansion, Expansion::Leaf);

    Ok(Some(CommentNode {
        comment: Comment {
            post_url: cx.post_url.map(str::to_string),
            author,
            timestamp,
            text,
            reaction_count,
            has_children,
            is_root,
        },
        expansion,
    }))
}

fn expand_replies<P: Page>(page: &P, item: &P::Element, cx: &Context<'_>) -> Result<Expansion> {
    let mut blocked = false;
    match selector::find_common(page, Some(item), Region::ViewReplies) {
        Ok(button) => match page.click(&button) {
            Ok(()) => pause(cx.opts.pacing.click_settle()),
            Err(e) if e.is_stale() => return Err(e),
            Err(e) => {
                warn!(error = %e, "could not expand replies");
                blocked = true;
            }
        },
        Err(e) if e.is_absent() => {}
        Err(e) => return Err(e),
    }

    let replies = match selector::find_common(page, Some(item), Region::CommentReplies) {
        Ok(list) => expand_level(page, &list, false, cx)?,
        Err(e) if e.is_absent() => Vec::new(),
        Err(e) => return Err(e),
    };

    Ok(match (replies.is_empty(), blocked) {
        (false, _) => Expansion::WithChildren(replies),
        (true, true) => Expansion::Unexpanded,
        (true, false) => Expansion::Leaf,
    })
}

fn comment_text<P: Page>(page: &P, body: &P::Element) -> Result<String> {
    Ok(optional_text(page, body, Region::CommentText)?.unwrap_or_default())
}

fn optional_text<P: Page>(page: &P, scope: &P::Element, region: Region) -> Result<Option<String>> {
    match selector::find_common(page, Some(scope), region) {
        Ok(el) => Ok(Some(page.inner_text(&el)?.trim().to_string()).filter(|t| !t.is_empty())),
        Err(e) if e.is_absent() => Ok(None),
        Err(e) => Err(e),
    }
}

/// A comment without a reaction summary has no reactions.
fn reaction_count<P: Page>(page: &P, body: &P::Element) -> Result<Option<u64>> {
    let summary = match selector::find_common(page, Some(body), Region::CommentReactions) {
        Ok(summary) => summary,
        Err(e) if e.is_absent() => return Ok(Some(0)),
        Err(e) => return Err(e),
    };

    let label = match page.attribute(&summary, "aria-label")? {
        Some(label) => label,
        None => page.inner_text(&summary)?,
    };
    let count = LEADING_COUNT
        .captures(&label)
        .and_then(|caps| parse_count(&caps[1], caps.get(2).map(|m| m.as_str())));
    if count.is_none() {
        warn!(%label, "unparseable comment reaction summary");
    }
    Ok(count)
}
