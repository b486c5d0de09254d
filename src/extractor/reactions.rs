//! Reaction counts.
//!
//! The reaction bar holds one marker per reaction kind present on the post.
//! Hovering a marker opens a popup whose first line names the kind, followed
//! by one reactor per line and, for long lists, a final `"and N more…"` line.

use std::time::Instant;

use tracing::{debug, warn};

use super::{parse_count, tooltip_text};
use crate::driver::Page;
use crate::model::{Reaction, Reactions};
use crate::options::Options;
use crate::patterns::MORE_REACTORS;
use crate::selector::{self, Region};
use crate::Result;

/// Counts every reaction kind of a post.
///
/// Kinds without a marker count as zero. A kind whose popup never appears,
/// or whose marker breaks mid-hover, is `None`. Only a failure to look up
/// the reaction bar itself is returned as an error.
pub fn reactions<P: Page>(page: &P, post: &P::Element, opts: &Options) -> Result<Reactions> {
    let bar = match selector::find_common(page, Some(post), Region::ReactionBar) {
        Ok(bar) => bar,
        Err(e) if e.is_absent() => return Ok(Reactions::zero()),
        Err(e) => return Err(e),
    };

    let mut counts = Reactions::zero();
    for marker in selector::find_common_all(page, Some(&bar), Region::ReactionMarker)? {
        let label = match page.attribute(&marker, "aria-label") {
            Ok(label) => label.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "reaction marker went away before it was read");
                continue;
            }
        };
        let Some(kind) = Reaction::from_label(&label) else {
            debug!(%label, "skipping unknown reaction marker");
            continue;
        };

        let start = Instant::now();
        let count = match tooltip_text(page, &marker, opts, true) {
            Ok(Some(popup)) => Some(count_reactions(&popup)),
            Ok(None) => {
                warn!(reaction = ?kind, "reactor popup did not appear");
                None
            }
            Err(e) => {
                warn!(reaction = ?kind, error = %e, "failed to count reactions");
                None
            }
        };
        debug!(reaction = ?kind, elapsed = ?start.elapsed(), "counted reactions");
        counts.set(kind, count);
    }
    debug!(total = counts.total(), "measured reactions");
    Ok(counts)
}

/// Counts the reactors listed in a popup, skipping its header line.
#[must_use]
pub fn count_reactions(popup: &str) -> u64 {
    let lines: Vec<&str> = popup.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    count_reactors(lines.get(1..).unwrap_or_default())
}

/// Counts reactor lines, expanding a final `"and N more…"` line to `N`.
#[must_use]
pub fn count_reactors(lines: &[&str]) -> u64 {
    let Some((last, named)) = lines.split_last() else {
        return 0;
    };

    let more = MORE_REACTORS
        .captures(last.trim())
        .and_then(|caps| parse_count(&caps[1], None));

    match more {
        Some(n) => (named.len() as u64).saturating_add(n),
        None => lines.len() as u64,
    }
}
