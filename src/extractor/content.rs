//! Post text.

use tracing::warn;

use super::Extracted;
use crate::driver::Page;
use crate::options::{pause, Options};
use crate::selector::{self, Region};
use crate::Result;

/// Reads the full text of a post.
///
/// "See more" and "See original" are clicked first when present. Neither is
/// required: a missing control is ignored and one that cannot be clicked is
/// logged. The text is read with `text_content`, since long posts are
/// truncated with CSS rather than removed from the DOM.
///
/// `Absent` means the post definitively has no caption.
pub fn text<P: Page>(page: &P, post: &P::Element, opts: &Options) -> Result<Extracted<String>> {
    expand(page, post, Region::SeeMore, opts);
    expand(page, post, Region::ShowOriginal, opts);

    let el = match selector::find_common(page, Some(post), Region::ContentText) {
        Ok(el) => el,
        Err(e) if e.is_absent() => return Ok(Extracted::Absent),
        Err(e) => return Err(e),
    };

    let text = page.text_content(&el)?;
    if text.trim().is_empty() {
        warn!("empty content element");
        return Ok(Extracted::Absent);
    }
    Ok(Extracted::Found(text))
}

fn expand<P: Page>(page: &P, post: &P::Element, control: Region, opts: &Options) {
    let button = match selector::find_common(page, Some(post), control) {
        Ok(button) => button,
        Err(e) if e.is_absent() => return,
        Err(e) => {
            warn!(control = control.name(), error = %e, "could not look up text control");
            return;
        }
    };

    match page.click(&button) {
        Ok(()) => pause(opts.pacing.click_settle()),
        Err(e) => warn!(control = control.name(), error = %e, "text control found but could not be clicked"),
    }
}
