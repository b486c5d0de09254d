//! Post permalinks and identity.

use url::Url;

use super::Extracted;
use crate::driver::Page;
use crate::extractor::metadata::Layout;
use crate::model::PostId;
use crate::patterns::{PERMALINK_ID, QUERY_TAIL};
use crate::selector::{self, Region};
use crate::Result;

/// Base for resolving relative hrefs.
const SITE_ROOT: &str = "https://www.facebook.com/";

/// Query parameters that identify content; everything else is tracking.
const KEPT_PARAMS: &[&str] = &["story_fbid", "id", "fbid", "v", "set", "multi_permalinks"];

/// The post's permalink, normalized.
pub fn url<P: Page>(page: &P, layout: &Layout<P::Element>) -> Result<Extracted<String>> {
    let link = match selector::find_region(page, Some(&layout.metadata), Region::Permalink, layout.variant) {
        Ok(link) => link,
        Err(e) if e.is_absent() => return Ok(Extracted::Absent),
        Err(e) => return Err(e),
    };

    match page.attribute(&link, "href")? {
        Some(href) if !href.trim().is_empty() => Ok(Extracted::Found(normalize_url(href.trim()))),
        _ => Ok(Extracted::Absent),
    }
}

/// Resolves `href` against the site root and strips tracking parameters and
/// the fragment.
///
/// Hrefs that cannot be parsed lose everything from the first `?`, `&` or `#`.
#[must_use]
pub fn normalize_url(href: &str) -> String {
    let Ok(mut url) = Url::parse(SITE_ROOT).and_then(|root| root.join(href)) else {
        return QUERY_TAIL.replace(href, "").into_owned();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| KEPT_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.set_fragment(None);
    url.into()
}

/// Identity of a post: its story id when the permalink carries one, the
/// normalized permalink otherwise, and a structural hash of the element when
/// no permalink was read.
#[must_use]
pub fn post_id(url: Option<&str>, handle_hash: u64) -> PostId {
    match url {
        Some(url) => PERMALINK_ID
            .captures(url)
            .map_or_else(|| PostId::Permalink(url.to_string()), |caps| PostId::Permalink(caps[1].to_string())),
        None => PostId::Structural(handle_hash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::snapshot::SnapshotPage;
    use crate::extractor::detect_layout;

    #[test]
    fn test_normalize_url_strips_tracking() {
        assert_eq!(
            normalize_url("/groups/12/posts/345/?__cft__[0]=AZX&__tn__=%2CO%2CP-R#top"),
            "https://www.facebook.com/groups/12/posts/345/"
        );
        assert_eq!(
            normalize_url("https://www.facebook.com/permalink.php?story_fbid=99&id=4&__cft__=x"),
            "https://www.facebook.com/permalink.php?story_fbid=99&id=4"
        );
    }

    #[test]
    fn test_normalize_url_unparseable_href() {
        assert_eq!(normalize_url("http://[bad/posts/1?x=1"), "http://[bad/posts/1");
    }

    #[test]
    fn test_post_id() {
        assert_eq!(
            post_id(Some("https://www.facebook.com/groups/12/posts/345/"), 7),
            PostId::Permalink("345".to_string())
        );
        assert_eq!(
            post_id(Some("https://www.facebook.com/watch/live"), 7),
            PostId::Permalink("https://www.facebook.com/watch/live".to_string())
        );
        assert_eq!(post_id(None, 7), PostId::Structural(7));
    }

    #[test]
    fn test_url_from_arrow_post() {
        let page = SnapshotPage::parse(
            r#"<div id="post"><div class="buofh1pr"><div>
                 <h4><div><div><span>Alice</span><span>▸</span><span>Group</span></div></div></h4>
                 <div><span id="jsc_c9"><a href="/groups/1/posts/22/?__cft__=abc">1 h</a></span></div>
               </div></div></div>"#,
        );
        let post = page.find_all(None, "#post").expect("lookup").remove(0);
        let layout = detect_layout(&page, &post, false).expect("layout");
        assert_eq!(
            url(&page, &layout).expect("url").found().as_deref(),
            Some("https://www.facebook.com/groups/1/posts/22/")
        );
    }
}
