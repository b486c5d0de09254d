//! Post metadata: who posted, where, and when.
//!
//! The layout of the metadata block is detected once per post and carried in
//! a [`Layout`]; every metadata extractor then reads the catalog entries for
//! that variant only.

use chrono::NaiveDateTime;
use tracing::debug;

use super::{timestamp_from_el, Extracted};
use crate::driver::Page;
use crate::options::Options;
use crate::selector::{self, Region, Variant};
use crate::Result;

/// Number of parts on the classic lower line when a user posted inside a
/// group or page (`user · ▸ · time · · audience`).
const GROUP_POST_PARTS: usize = 5;

/// The metadata block of one post and the layout it uses.
#[derive(Debug, Clone)]
pub struct Layout<E> {
    pub variant: Variant,
    pub metadata: E,
}

/// Locates the metadata block and decides its layout.
///
/// Posts browsed inside a group feed always use the group layout; otherwise
/// the arrow marker on the heading line distinguishes arrow from classic.
pub fn detect_layout<P: Page>(page: &P, post: &P::Element, in_group: bool) -> Result<Layout<P::Element>> {
    let metadata = selector::find_region(page, Some(post), Region::Metadata, Variant::Classic)?;

    let variant = if in_group {
        Variant::Group
    } else if selector::region_exists(page, Some(&metadata), Region::ArrowMarker, Variant::Arrow)? {
        Variant::Arrow
    } else {
        Variant::Classic
    };

    debug!(?variant, "detected metadata layout");
    Ok(Layout { variant, metadata })
}

/// Name of the posting account.
pub fn user<P: Page>(page: &P, layout: &Layout<P::Element>) -> Result<Extracted<String>> {
    let region = match layout.variant {
        Variant::Classic if !is_group_post(page, layout)? => Region::Page,
        _ => Region::User,
    };
    read_region(page, layout, region)
}

/// Name of the page or group the post was made in.
///
/// In the group layout the name comes from `opts.group`; in the classic
/// layout a post on the author's own timeline has no page.
pub fn page_name<P: Page>(page: &P, layout: &Layout<P::Element>, opts: &Options) -> Result<Extracted<String>> {
    match layout.variant {
        Variant::Group => Ok(opts
            .group
            .clone()
            .map_or(Extracted::Absent, Extracted::Found)),
        Variant::Classic if !is_group_post(page, layout)? => Ok(Extracted::Absent),
        Variant::Arrow | Variant::Classic => read_region(page, layout, Region::Page),
    }
}

/// Exact posting time, read from the tooltip of the time indicator.
pub fn timestamp<P: Page>(
    page: &P,
    layout: &Layout<P::Element>,
    opts: &Options,
) -> Result<Extracted<NaiveDateTime>> {
    match selector::find_region(page, Some(&layout.metadata), Region::Time, layout.variant) {
        Ok(time_el) => timestamp_from_el(page, &time_el, opts),
        Err(e) if e.is_absent() => Ok(Extracted::Absent),
        Err(e) => Err(e),
    }
}

fn is_group_post<P: Page>(page: &P, layout: &Layout<P::Element>) -> Result<bool> {
    match selector::find_region(page, Some(&layout.metadata), Region::LowerMetadata, layout.variant) {
        Ok(lower) => Ok(page.children(&lower)?.len() == GROUP_POST_PARTS),
        Err(e) if e.is_absent() => Ok(false),
        Err(e) => Err(e),
    }
}

fn read_region<P: Page>(page: &P, layout: &Layout<P::Element>, region: Region) -> Result<Extracted<String>> {
    let el = match selector::find_region(page, Some(&layout.metadata), region, layout.variant) {
        Ok(el) => el,
        Err(e) if e.is_absent() => return Ok(Extracted::Absent),
        Err(e) => return Err(e),
    };

    let text = page.inner_text(&el)?;
    let text = text.trim();
    if text.is_empty() {
        Ok(Extracted::Absent)
    } else {
        Ok(Extracted::Found(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::snapshot::SnapshotPage;

    const ARROW: &str = r#"
        <div id="post">
          <div class="buofh1pr"><div>
            <h4><div><div><span>Alice</span><span>▸</span><span>Rust Lovers</span></div></div></h4>
            <div><span id="jsc_c1"><a href="/groups/1/posts/2/">3 h</a></span></div>
          </div></div>
        </div>"#;

    const CLASSIC_OWN: &str = r#"
        <div id="post">
          <div class="buofh1pr"><div>
            <h4><a>Bob</a></h4>
            <div><span id="jsc_c2"><a href="/bob/posts/9">2 d</a></span><span>·</span><span>Public</span></div>
          </div></div>
        </div>"#;

    const CLASSIC_GROUP: &str = r#"
        <div id="post">
          <div class="buofh1pr"><div>
            <h4><a>Hiking Club</a></h4>
            <div><span>Carol</span><span>·</span><span id="jsc_c3"><a href="/x">1 h</a></span><span>·</span><span>Members</span></div>
          </div></div>
        </div>"#;

    fn post(page: &SnapshotPage) -> crate::driver::snapshot::SnapshotElement {
        page.find_all(None, "#post").expect("lookup").remove(0)
    }

    #[test]
    fn test_arrow_layout() {
        let page = SnapshotPage::parse(ARROW);
        let layout = detect_layout(&page, &post(&page), false).expect("layout");
        assert_eq!(layout.variant, Variant::Arrow);
        assert_eq!(user(&page, &layout).expect("user").found().as_deref(), Some("Alice"));
        assert_eq!(
            page_name(&page, &layout, &Options::default()).expect("page").found().as_deref(),
            Some("Rust Lovers")
        );
    }

    #[test]
    fn test_classic_own_timeline_has_no_page() {
        let page = SnapshotPage::parse(CLASSIC_OWN);
        let layout = detect_layout(&page, &post(&page), false).expect("layout");
        assert_eq!(layout.variant, Variant::Classic);
        assert_eq!(user(&page, &layout).expect("user").found().as_deref(), Some("Bob"));
        assert!(page_name(&page, &layout, &Options::default()).expect("page").is_absent());
    }

    #[test]
    fn test_classic_group_post_reads_lower_line() {
        let page = SnapshotPage::parse(CLASSIC_GROUP);
        let layout = detect_layout(&page, &post(&page), false).expect("layout");
        assert_eq!(user(&page, &layout).expect("user").found().as_deref(), Some("Carol"));
        assert_eq!(
            page_name(&page, &layout, &Options::default()).expect("page").found().as_deref(),
            Some("Hiking Club")
        );
    }

    #[test]
    fn test_group_layout_uses_configured_name() {
        let page = SnapshotPage::parse(CLASSIC_OWN);
        let layout = detect_layout(&page, &post(&page), true).expect("layout");
        assert_eq!(layout.variant, Variant::Group);
        let opts = Options {
            group: Some("Rustaceans".to_string()),
            ..Options::default()
        };
        assert_eq!(page_name(&page, &layout, &opts).expect("page").found().as_deref(), Some("Rustaceans"));
        assert_eq!(user(&page, &layout).expect("user").found().as_deref(), Some("Bob"));
    }

    #[test]
    fn test_missing_time_indicator_is_absent() {
        let page = SnapshotPage::parse(r#"<div id="post"><div class="buofh1pr"><div><h4>Dan</h4></div></div></div>"#);
        let layout = detect_layout(&page, &post(&page), false).expect("layout");
        assert!(timestamp(&page, &layout, &Options::default()).expect("no error").is_absent());
    }
}
