//! Interaction Layer
//!
//! Toggles the like state of a post. The like control is often covered by
//! hover cards or still animating when it is reached, so a direct click that
//! is blocked falls back to a script-level click.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::driver::Page;
use crate::extractor::like_button;
use crate::options::{pause, Pacing};
use crate::{Error, Result};

const INTERACTABLE_POLL: Duration = Duration::from_millis(100);

/// Clicks a like control, then waits for the UI to settle.
pub fn toggle_like<P: Page>(page: &P, button: &P::Element, pacing: &Pacing) -> Result<()> {
    if !wait_interactable(page, button, pacing.clickable_timeout())? {
        debug!("like control still not interactable, clicking anyway");
    }

    let clicked = match page.hover(button).and_then(|()| page.click(button)) {
        Err(Error::ElementBlocked(reason)) => {
            warn!(%reason, "like click intercepted, forcing it");
            page.force_click(button)
        }
        other => other,
    };

    pause(pacing.like_settle());
    clicked
}

/// Likes the post unless `cached` already says it is liked.
///
/// Returns whether the control was clicked. `cached` is the state captured
/// at assembly and may be stale; the live page is not consulted.
pub fn like<P: Page>(page: &P, post: &P::Element, cached: Option<bool>, pacing: &Pacing) -> Result<bool> {
    if cached == Some(true) {
        return Ok(false);
    }
    toggle_like(page, &like_button(page, post)?, pacing)?;
    Ok(true)
}

/// Removes the like unless `cached` says the post is not liked.
pub fn unlike<P: Page>(page: &P, post: &P::Element, cached: Option<bool>, pacing: &Pacing) -> Result<bool> {
    if cached != Some(true) {
        return Ok(false);
    }
    toggle_like(page, &like_button(page, post)?, pacing)?;
    Ok(true)
}

fn wait_interactable<P: Page>(page: &P, el: &P::Element, timeout: Duration) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if page.is_interactable(el)? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        pause(INTERACTABLE_POLL.min(timeout));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::snapshot::SnapshotPage;

    fn post(page: &SnapshotPage) -> crate::driver::snapshot::SnapshotElement {
        page.find_all(None, "#post").expect("lookup").remove(0)
    }

    #[test]
    fn test_blocked_control_is_force_clicked() {
        let page = SnapshotPage::parse(
            r#"<div id="post"><div role="button" aria-label="Like" data-blocked><span>Like</span></div></div>"#,
        );
        let post = post(&page);
        assert!(like(&page, &post, Some(false), &Pacing::none()).expect("like"));
        let button = like_button(&page, &post).expect("button");
        assert_eq!(page.peek_attribute(&button, "aria-label").as_deref(), Some("Remove Like"));
        assert_eq!(page.stats().forced_clicks, 1);
    }

    #[test]
    fn test_like_is_noop_when_cached_liked() {
        let page = SnapshotPage::parse(
            r#"<div id="post"><div role="button" aria-label="Like"><span>Like</span></div></div>"#,
        );
        assert!(!like(&page, &post(&page), Some(true), &Pacing::none()).expect("like"));
        assert_eq!(page.stats().clicks, 0);
    }

    #[test]
    fn test_unlike_toggles_liked_post() {
        let page = SnapshotPage::parse(
            r#"<div id="post"><div role="button" aria-label="Remove Like"><span>Like</span></div></div>"#,
        );
        let post = post(&page);
        assert!(unlike(&page, &post, Some(true), &Pacing::none()).expect("unlike"));
        assert_eq!(page.stats().clicks, 1);
        assert!(!unlike(&page, &post, Some(false), &Pacing::none()).expect("unlike"));
    }
}
