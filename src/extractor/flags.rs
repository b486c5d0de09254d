//! Boolean post flags and media detection.

use crate::driver::Page;
use crate::selector::{self, Region};
use crate::Result;

const LIKED_LABEL: &str = "Remove Like";

pub fn is_sponsored<P: Page>(page: &P, post: &P::Element) -> Result<bool> {
    selector::common_exists(page, Some(post), Region::Sponsored)
}

pub fn is_recommended<P: Page>(page: &P, post: &P::Element) -> Result<bool> {
    selector::common_exists(page, Some(post), Region::Recommended)
}

/// The like control of a post, in either state.
pub fn like_button<P: Page>(page: &P, post: &P::Element) -> Result<P::Element> {
    selector::find_common(page, Some(post), Region::LikeButton)
}

/// Whether the like control currently reads as liked.
pub fn is_liked<P: Page>(page: &P, button: &P::Element) -> Result<bool> {
    Ok(page.attribute(button, "aria-label")?.as_deref() == Some(LIKED_LABEL))
}

/// Media attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    pub contains: bool,
    /// Source of the first photo. Videos carry no URL.
    pub url: Option<String>,
}

/// Looks for a photo first, then a video.
pub fn media<P: Page>(page: &P, post: &P::Element) -> Result<Media> {
    match selector::find_common(page, Some(post), Region::MediaImage) {
        Ok(img) => {
            return Ok(Media {
                contains: true,
                url: page.attribute(&img, "src")?,
            })
        }
        Err(e) if e.is_absent() => {}
        Err(e) => return Err(e),
    }

    Ok(Media {
        contains: selector::common_exists(page, Some(post), Region::MediaVideo)?,
        url: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::snapshot::SnapshotPage;

    fn post(page: &SnapshotPage) -> crate::driver::snapshot::SnapshotElement {
        page.find_all(None, "#post").expect("lookup").remove(0)
    }

    #[test]
    fn test_sponsored_and_recommended() {
        let page = SnapshotPage::parse(
            r#"<div id="post">
                 <a aria-label="Sponsored" role="link" href="/ads">Sponsored</a>
                 <span>Recommended post</span>
               </div>"#,
        );
        let post = post(&page);
        assert!(is_sponsored(&page, &post).expect("sponsored"));
        assert!(!is_recommended(&page, &post).expect("recommended"));
    }

    #[test]
    fn test_recommended_inside_article() {
        let page = SnapshotPage::parse(
            r#"<div id="post"><div role="article"><span>Recommended post</span></div></div>"#,
        );
        let post = post(&page);
        assert!(is_recommended(&page, &post).expect("recommended"));
        assert!(!is_sponsored(&page, &post).expect("sponsored"));
    }

    #[test]
    fn test_like_state() {
        let page = SnapshotPage::parse(
            r#"<div id="post"><div role="button" aria-label="Remove Like">Like</div></div>"#,
        );
        let button = like_button(&page, &post(&page)).expect("button");
        assert!(is_liked(&page, &button).expect("state"));
    }

    #[test]
    fn test_media_photo_then_video() {
        let photo = SnapshotPage::parse(
            r#"<div id="post"><a href="/photo/?fbid=1"><img src="https://cdn.example/p.jpg"></a></div>"#,
        );
        assert_eq!(
            media(&photo, &post(&photo)).expect("media"),
            Media {
                contains: true,
                url: Some("https://cdn.example/p.jpg".to_string())
            }
        );

        let video = SnapshotPage::parse(r#"<div id="post"><video src="v.mp4"></video></div>"#);
        assert_eq!(
            media(&video, &post(&video)).expect("media"),
            Media {
                contains: true,
                url: None
            }
        );

        let none = SnapshotPage::parse(r#"<div id="post"><p>text only</p></div>"#);
        assert!(!media(&none, &post(&none)).expect("media").contains);
    }
}
