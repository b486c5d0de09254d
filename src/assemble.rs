//! Post Assembler
//!
//! Builds one [`Post`] from a post element. Only the fields in
//! [`Options::fields`] are extracted; an unrequested field costs nothing.
//! Every field runs in its own bulkhead: a page error degrades that field to
//! `None`, is logged with the field and feed index, and extraction moves on.
//!
//! Fields are extracted cheapest first. Flags and links need a few lookups;
//! text may click expanders; timestamps and reactions hover and wait for
//! popups; the comment tree clicks through every page of comments.

use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, warn};

use crate::comments;
use crate::driver::Page;
use crate::extractor::{self, Layout};
use crate::field::Field;
use crate::model::{Metadata, Post, NO_TEXT};
use crate::options::Options;
use crate::{Error, Result};

/// An assembled post and the time spent on each requested field.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub post: Post,
    pub timings: Vec<(Field, Duration)>,
}

/// Fields read from the metadata block, which needs layout detection first.
const LAYOUT_FIELDS: &[Field] = &[Field::User, Field::Page, Field::Timestamp, Field::Url];

struct Bulkhead<'a, P: Page> {
    page: &'a P,
    post: &'a P::Element,
    index: usize,
    opts: &'a Options,
    timings: Vec<(Field, Duration)>,
}

impl<P: Page> Bulkhead<'_, P> {
    /// Runs `extract` if `field` was requested, containing its failure.
    fn run<T>(&mut self, field: Field, extract: impl FnOnce(&P, &P::Element) -> Result<T>) -> Option<T> {
        if !self.opts.fields.contains(field) {
            return None;
        }

        let _field = info_span!("field", field = field.name()).entered();
        let start = Instant::now();
        let outcome = extract(self.page, self.post);
        self.timings.push((field, start.elapsed()));

        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(field = field.name(), index = self.index, error = %e, "field extraction failed");
                None
            }
        }
    }
}

fn detected<E>(layout: Option<&Layout<E>>) -> Result<&Layout<E>> {
    layout.ok_or_else(|| Error::ElementAbsent("metadata".to_string()))
}

/// Assembles the post at feed slot `index`.
///
/// Runs inside a `post` span carrying `index`, and each field inside a
/// nested `field` span, so every log line names the post and field it
/// concerns.
pub fn assemble_post<P: Page>(page: &P, post: &P::Element, index: usize, opts: &Options) -> Assembly {
    let _post = info_span!("post", index).entered();
    let fields = opts.fields;
    let mut bulkhead = Bulkhead {
        page,
        post,
        index,
        opts,
        timings: Vec::new(),
    };

    let sponsored = bulkhead.run(Field::Sponsored, extractor::is_sponsored);
    let recommended = bulkhead.run(Field::Recommended, extractor::is_recommended);
    let liked = bulkhead.run(Field::Liked, |page, post| {
        let button = extractor::like_button(page, post)?;
        extractor::is_liked(page, &button)
    });

    let layout: Option<Layout<P::Element>> = if fields.contains_any(LAYOUT_FIELDS) {
        match extractor::detect_layout(page, post, opts.group.is_some()) {
            Ok(layout) => Some(layout),
            Err(e) => {
                warn!(index, error = %e, "metadata block not found");
                None
            }
        }
    } else {
        None
    };

    let url = bulkhead
        .run(Field::Url, |page, _| {
            extractor::url(page, detected(layout.as_ref())?)?.into_result("permalink")
        })
        .flatten();
    let user = bulkhead
        .run(Field::User, |page, _| {
            extractor::user(page, detected(layout.as_ref())?)?.into_result("user")
        })
        .flatten();
    let page_name = bulkhead
        .run(Field::Page, |page, _| {
            extractor::page_name(page, detected(layout.as_ref())?, opts)?.into_result("page")
        })
        .flatten();

    let text = bulkhead.run(Field::Text, |page, post| {
        Ok(extractor::text(page, post, opts)?
            .found()
            .unwrap_or_else(|| NO_TEXT.to_string()))
    });

    let comments_count = bulkhead
        .run(Field::CommentCount, |page, post| {
            extractor::comment_count(page, post)?.into_result("comment count")
        })
        .flatten();
    let shares_count = bulkhead
        .run(Field::ShareCount, |page, post| {
            extractor::share_count(page, post)?.into_result("share count")
        })
        .flatten();
    let media = bulkhead.run(Field::Image, extractor::media);

    let timestamp = bulkhead
        .run(Field::Timestamp, |page, _| {
            extractor::timestamp(page, detected(layout.as_ref())?, opts)?.into_result("timestamp")
        })
        .flatten();
    let reactions = bulkhead
        .run(Field::Reactions, |page, post| extractor::reactions(page, post, opts))
        .unwrap_or_default();

    let comments = bulkhead.run(Field::Comments, |page, post| {
        // Measured here even when the count itself was not requested, so a
        // post known to have no comments skips the tree entirely.
        let known = match comments_count {
            Some(n) => Some(n),
            None => extractor::comment_count(page, post)?.found(),
        };
        if known == Some(0) {
            return Ok(Vec::new());
        }

        let tree = comments::expand(page, post, url.as_deref(), opts)?;
        let flat = comments::flatten(&tree);
        if let Some(expected) = known {
            if (flat.len() as u64) < expected {
                warn!(index, expected, found = flat.len(), "comment tree is incomplete");
            }
        }
        Ok(flat)
    });

    let id = extractor::post_id(url.as_deref(), page.handle_hash(post));

    let timings = bulkhead.timings;
    for (field, elapsed) in &timings {
        if opts.report_timings {
            info!(index, field = field.name(), ?elapsed, "field timing");
        } else {
            debug!(index, field = field.name(), ?elapsed, "field timing");
        }
    }

    let post = Post {
        id,
        index,
        metadata: Metadata {
            user,
            page: page_name,
            timestamp,
        },
        text,
        liked,
        reactions,
        sponsored,
        recommended,
        comments_count,
        shares_count,
        contains_media: media.as_ref().map(|m| m.contains),
        media_url: media.and_then(|m| m.url),
        comments,
        url,
    };

    Assembly { post, timings }
}
