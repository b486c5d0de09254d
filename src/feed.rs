//! Feed Traversal / Scroll Controller
//!
//! [`Feed::browse`] locates the feed container and returns [`Posts`], a lazy
//! iterator that assembles one post per pull, in feed order.
//!
//! Posts are addressed by slot: the post at index `i` is child
//! `i + 1 + feed_header_children` of the feed container. When a slot is not
//! rendered yet the controller scrolls to the bottom and polls the same slot
//! a bounded number of times. A slot that never renders is skipped for good.
//! After `scroll_fail_limit` consecutive slots fail this way the feed is
//! considered exhausted.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::assemble::assemble_post;
use crate::driver::Page;
use crate::field::Field;
use crate::interact;
use crate::model::Post;
use crate::options::{pause, Options};
use crate::selector::{self, Region};
use crate::{Error, Result};

/// An advertisement shown in the right-hand column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarAd {
    /// Advertiser name.
    pub text: String,
    /// Displayed link, usually a bare domain.
    pub link: Option<String>,
}

/// A feed page driven through `page`.
pub struct Feed<'p, P: Page> {
    page: &'p P,
    options: Options,
}

impl<'p, P: Page> Feed<'p, P> {
    pub fn new(page: &'p P, options: Options) -> Self {
        Self { page, options }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Scrolls to the top and locates the feed container.
    ///
    /// # Errors
    ///
    /// Returns `FatalSetup` when the feed container cannot be found. This is
    /// the only error that should end a run.
    pub fn browse(&self) -> Result<Posts<'p, P>> {
        self.page.scroll_to_top()?;

        let feed = selector::find_common(self.page, None, Region::Feed).map_err(|e| {
            error!(error = %e, "could not find the feed container");
            Error::FatalSetup(format!("feed container not found: {e}"))
        })?;

        Ok(Posts {
            page: self.page,
            feed,
            options: self.options.clone(),
            next_index: 0,
            scroll_fail_count: 0,
            load_fail_count: 0,
            finished: false,
            last_timings: Vec::new(),
        })
    }

    /// Name of the group or page at `url`, read from the link to it in the
    /// page header. Trailing slashes are ignored when comparing URLs.
    pub fn group_name(&self, url: &str) -> Result<Option<String>> {
        let target = url.trim_end_matches('/');
        for link in selector::find_common_all(self.page, None, Region::GroupLink)? {
            let Some(href) = self.page.attribute(&link, "href")? else {
                continue;
            };
            if href.trim_end_matches('/') != target {
                continue;
            }
            let name = self.page.inner_text(&link)?;
            let name = name.trim();
            if !name.is_empty() {
                return Ok(Some(name.to_string()));
            }
        }
        Ok(None)
    }

    /// Browses `url` as a group feed, taking the group name from the page.
    ///
    /// Returns the name found. When no link names the group, the options are
    /// left unchanged and `None` is returned.
    pub fn detect_group(&mut self, url: &str) -> Result<Option<String>> {
        let name = self.group_name(url)?;
        match &name {
            Some(found) => {
                debug!(group = %found, "read group name from the page");
                self.options.group = Some(found.clone());
            }
            None => warn!(url, "no link names the group"),
        }
        Ok(name)
    }

    /// Ads currently shown in the sidebar.
    pub fn sidebar_ads(&self) -> Result<Vec<SidebarAd>> {
        let mut ads = Vec::new();
        for el in selector::find_common_all(self.page, None, Region::SidebarAd)? {
            let text = self.page.inner_text(&el)?;
            let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
            if let Some(name) = lines.next() {
                ads.push(SidebarAd {
                    text: name.to_string(),
                    link: lines.next().map(str::to_string),
                });
            }
        }
        Ok(ads)
    }
}

/// Lazy sequence of posts in feed order.
///
/// Each call to `next` may block while scrolling and waiting for the page to
/// render. Dropping the iterator is the only way to stop early.
pub struct Posts<'p, P: Page> {
    page: &'p P,
    feed: P::Element,
    options: Options,
    next_index: usize,
    scroll_fail_count: usize,
    load_fail_count: usize,
    finished: bool,
    last_timings: Vec<(Field, Duration)>,
}

impl<P: Page> Posts<'_, P> {
    /// Index of the next slot to be located.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Per-field timings of the most recently assembled post.
    #[must_use]
    pub fn last_timings(&self) -> &[(Field, Duration)] {
        &self.last_timings
    }

    /// Likes `post` on the live page unless its cached `liked` is already set.
    ///
    /// `post.liked` is not updated.
    pub fn like(&self, post: &Post) -> Result<bool> {
        let el = self.slot(post.index)?;
        interact::like(self.page, &el, post.liked, &self.options.pacing)
    }

    /// Removes the like from `post` if its cached `liked` is set.
    ///
    /// `post.liked` is not updated.
    pub fn unlike(&self, post: &Post) -> Result<bool> {
        let el = self.slot(post.index)?;
        interact::unlike(self.page, &el, post.liked, &self.options.pacing)
    }

    fn slot(&self, index: usize) -> Result<P::Element> {
        let position = index + 1 + self.options.feed_header_children;
        self.page.child_at(&self.feed, position)
    }

    /// Locates the slot at `index`, re-finding the feed container if it
    /// went stale. Any failure counts as "not rendered yet".
    fn try_locate(&mut self, index: usize) -> Option<P::Element> {
        match self.slot(index) {
            Ok(el) => Some(el),
            Err(e) if e.is_absent() => None,
            Err(e) => {
                warn!(index, error = %e, "post slot lookup failed");
                if e.is_stale() {
                    match selector::find_common(self.page, None, Region::Feed) {
                        Ok(feed) => self.feed = feed,
                        Err(e) => warn!(error = %e, "could not re-locate the feed container"),
                    }
                }
                None
            }
        }
    }

    fn found(&mut self, index: usize, el: &P::Element) -> Post {
        self.next_index = index + 1;
        self.scroll_fail_count = 0;
        self.load_fail_count = 0;

        let assembly = assemble_post(self.page, el, index, &self.options);
        self.last_timings = assembly.timings;
        assembly.post
    }

    fn scroll_for_more(&self, index: usize) {
        debug!(index, scroll_fail_count = self.scroll_fail_count, "post not rendered, scrolling");
        if let Err(e) = self.page.scroll_to_bottom() {
            warn!(error = %e, "scroll failed");
        }
        pause(self.options.pacing.scroll_pause());
        if let Ok(position) = self.page.scroll_position() {
            debug!(position, "scrolled");
        }
    }
}

impl<P: Page> Iterator for Posts<'_, P> {
    type Item = Post;

    fn next(&mut self) -> Option<Post> {
        while !self.finished {
            if self.scroll_fail_count >= self.options.scroll_fail_limit {
                info!(index = self.next_index, "End of feed");
                self.finished = true;
                break;
            }

            let index = self.next_index;
            if let Some(el) = self.try_locate(index) {
                return Some(self.found(index, &el));
            }

            self.scroll_fail_count += 1;
            self.scroll_for_more(index);

            self.load_fail_count = 0;
            while self.load_fail_count < self.options.load_retry_limit {
                if let Some(el) = self.try_locate(index) {
                    return Some(self.found(index, &el));
                }
                pause(self.options.pacing.load_retry_interval());
                self.load_fail_count += 1;
                debug!(index, load_fail_count = self.load_fail_count, "waiting for post to load");
            }

            debug!(index, "post slot never rendered, skipping it");
            self.next_index = index + 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::snapshot::SnapshotPage;
    use crate::options::Pacing;

    fn opts() -> Options {
        Options {
            fields: [Field::Text].into(),
            pacing: Pacing::none(),
            ..Options::default()
        }
    }

    #[test]
    fn test_missing_feed_is_fatal() {
        let page = SnapshotPage::parse("<main><p>Log in to continue</p></main>");
        let feed = Feed::new(&page, opts());
        assert!(matches!(feed.browse(), Err(Error::FatalSetup(_))));
    }

    #[test]
    fn test_sidebar_ads() {
        let page = SnapshotPage::parse(
            r#"<aside>
                 <a aria-label="Advertiser" rel="nofollow noopener" href="https://ad.example">
                   <div><div><div><span><div>Acme Boots</div><div>acme.example</div></span></div></div></div>
                 </a>
               </aside>"#,
        );
        let ads = Feed::new(&page, opts()).sidebar_ads().expect("ads");
        assert_eq!(
            ads,
            vec![SidebarAd {
                text: "Acme Boots".to_string(),
                link: Some("acme.example".to_string())
            }]
        );
    }

    #[test]
    fn test_group_name_read_from_header_link() {
        let page = SnapshotPage::parse(
            r#"<h1><a href="https://www.facebook.com/groups/rustaceans/">Rustaceans</a></h1>
               <a href="https://www.facebook.com/groups/other/">Other</a>
               <div role="feed"><h3>New activity</h3></div>"#,
        );
        let mut feed = Feed::new(&page, opts());
        assert_eq!(
            feed.group_name("https://www.facebook.com/groups/other").expect("lookup").as_deref(),
            Some("Other")
        );

        let name = feed.detect_group("https://www.facebook.com/groups/rustaceans").expect("lookup");
        assert_eq!(name.as_deref(), Some("Rustaceans"));
        assert_eq!(feed.options().group.as_deref(), Some("Rustaceans"));

        assert_eq!(feed.detect_group("https://www.facebook.com/groups/none/").expect("lookup"), None);
        assert_eq!(feed.options().group.as_deref(), Some("Rustaceans"));
    }

    #[test]
    fn test_empty_feed_terminates() {
        let page = SnapshotPage::parse(r#"<div role="feed"><h3>New activity</h3></div>"#);
        let posts: Vec<Post> = Feed::new(&page, opts()).browse().expect("feed").collect();
        assert!(posts.is_empty());
        // one scroll to top, then one scroll per failed slot
        assert_eq!(page.stats().scrolls, 11);
    }
}
