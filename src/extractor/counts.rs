//! Comment and share counts.
//!
//! Both are read from localized labels under the post ("12 Comments",
//! "1.2K Shares"). A missing label means zero; a label that does not start
//! with a number is `Unparseable`.

use tracing::warn;

use super::{parse_count, Extracted};
use crate::driver::Page;
use crate::patterns::COUNT_LABEL;
use crate::selector::{self, Region};
use crate::Result;

/// Parses a `"<N> <word>"` count label.
#[must_use]
pub fn parse_count_label(label: &str) -> Option<u64> {
    let caps = COUNT_LABEL.captures(label)?;
    parse_count(&caps[1], caps.get(2).map(|m| m.as_str()))
}

pub fn comment_count<P: Page>(page: &P, post: &P::Element) -> Result<Extracted<u64>> {
    count_label(page, post, Region::CommentCount)
}

pub fn share_count<P: Page>(page: &P, post: &P::Element) -> Result<Extracted<u64>> {
    count_label(page, post, Region::ShareCount)
}

fn count_label<P: Page>(page: &P, post: &P::Element, region: Region) -> Result<Extracted<u64>> {
    let el = match selector::find_common(page, Some(post), region) {
        Ok(el) => el,
        Err(e) if e.is_absent() => return Ok(Extracted::Found(0)),
        Err(e) => return Err(e),
    };

    let label = page.inner_text(&el)?;
    match parse_count_label(&label) {
        Some(n) => Ok(Extracted::Found(n)),
        None => {
            warn!(what = region.name(), %label, "count label does not match the expected format");
            Ok(Extracted::Unparseable(label))
        }
    }
}
