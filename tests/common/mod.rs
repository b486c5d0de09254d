//! Snapshot fixtures shared by the integration suites.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use feed_scraper::{Field, FieldSet, Options, Pacing};

/// A post in the arrow layout with every field present.
///
/// `attrs` is spliced into the post's root element (`data-batch="2"` etc).
pub fn arrow_post(i: usize, attrs: &str) -> String {
    format!(
        r#"<div class="post" id="post-{i}" {attrs}>
  <div class="buofh1pr"><div>
    <h4><div><div><span>User {i}</span><span>▸</span><span>Rust Group</span></div></div></h4>
    <div><span id="jsc_c{i}" aria-describedby="time-tip-{i}"><a href="/groups/7/posts/{i}0/?__cft__[0]=AZ&__tn__=R">{i} h</a></span></div>
  </div></div>
  <div role="tooltip" id="time-tip-{i}">Friday, June 6, 2025 at 03:15 PM</div>
  <div data-ad-preview="message">Post {i} first line
second line<span data-expanded-by="more-{i}"> and the rest</span></div>
  <div role="button" data-expander="more-{i}">See more</div>
  <a href="/photo/?fbid={i}"><img src="https://cdn.example/{i}.jpg"></a>
  <span aria-label="See who reacted to this" role="toolbar">
    <div aria-label="Like: 14 people" aria-describedby="like-tip-{i}"></div>
    <div aria-label="Wow: 1 person" aria-describedby="wow-tip-{i}"></div>
  </span>
  <div role="tooltip" id="like-tip-{i}"><div>Like</div><div>Ann</div><div>Ben</div><div>and 12 more…</div></div>
  <div role="tooltip" id="wow-tip-{i}"><div>Wow</div><div>Cat</div></div>
  <div role="button"><span>2 Comments</span></div>
  <div role="button"><span>1.1K Shares</span></div>
  <div role="button" aria-label="Like"><span>Like</span></div>
</div>"#
    )
}

/// A bare post holding only text, for traversal tests.
pub fn text_post(i: usize, attrs: &str) -> String {
    format!(
        r#"<div class="post" id="post-{i}" {attrs}>
  <div data-ad-preview="message">Post {i}</div>
  <div role="button" aria-label="Like"><span>Like</span></div>
</div>"#
    )
}

/// Wraps posts in a feed container preceded by one header child.
pub fn feed(posts: &[String]) -> String {
    format!(
        r#"<html><body><div role="feed"><h3>New activity</h3>{}</div></body></html>"#,
        posts.concat()
    )
}

pub fn options(fields: impl Into<FieldSet>) -> Options {
    Options {
        fields: fields.into(),
        pacing: Pacing::none(),
        ..Options::default()
    }
}

pub fn text_only() -> Options {
    options([Field::Text])
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a plain-text subscriber and returns its result and log output.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().expect("log buffer")).into_owned();
    (out, logs)
}
