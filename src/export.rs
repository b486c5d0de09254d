//! CSV and JSON-lines output.
//!
//! Post rows use a fixed column order with dates as `DD/MM/YYYY` and times
//! as 24-hour `HH:MM`. Line breaks inside text are written as the two
//! characters `\n`, so every record stays on one line. Missing values are
//! empty cells.

use std::io::Write;

use chrono::NaiveDateTime;

use crate::model::{Comment, Post};
use crate::Result;

pub const POST_COLUMNS: [&str; 16] = [
    "ID",
    "Author",
    "Page",
    "Date",
    "Time",
    "Content",
    "URL",
    "CommentCount",
    "ShareCount",
    "ContainsMedia",
    "AngryCount",
    "CareCount",
    "HahaCount",
    "LikeCount",
    "SadCount",
    "WowCount",
];

pub const COMMENT_COLUMNS: [&str; 7] = [
    "post_url",
    "is_root",
    "has_children",
    "author",
    "timestamp",
    "text",
    "reaction_count",
];

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Replaces line breaks with a literal `\n`.
#[must_use]
pub fn escape_newlines(text: &str) -> String {
    text.replace("\r\n", "\\n").replace(['\n', '\r'], "\\n")
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn text_cell(value: Option<&str>) -> String {
    value.map(escape_newlines).unwrap_or_default()
}

fn format_ts(ts: Option<NaiveDateTime>, format: &str) -> String {
    ts.map(|t| t.format(format).to_string()).unwrap_or_default()
}

/// The CSV cells of a post, in [`POST_COLUMNS`] order.
#[must_use]
pub fn post_record(post: &Post) -> Vec<String> {
    let r = &post.reactions;
    vec![
        post.id.to_string(),
        text_cell(post.metadata.user.as_deref()),
        text_cell(post.metadata.page.as_deref()),
        format_ts(post.metadata.timestamp, DATE_FORMAT),
        format_ts(post.metadata.timestamp, TIME_FORMAT),
        text_cell(post.text.as_deref()),
        cell(post.url.as_deref()),
        cell(post.comments_count),
        cell(post.shares_count),
        cell(post.contains_media),
        cell(r.angry),
        cell(r.care),
        cell(r.haha),
        cell(r.like),
        cell(r.sad),
        cell(r.wow),
    ]
}

/// The CSV cells of a comment, in [`COMMENT_COLUMNS`] order.
#[must_use]
pub fn comment_record(comment: &Comment) -> Vec<String> {
    vec![
        cell(comment.post_url.as_deref()),
        comment.is_root.to_string(),
        comment.has_children.to_string(),
        text_cell(comment.author.as_deref()),
        format_ts(comment.timestamp, "%d/%m/%Y %H:%M"),
        escape_newlines(&comment.text),
        cell(comment.reaction_count),
    ]
}

/// Streams posts as CSV rows.
pub struct PostCsv<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PostCsv<W> {
    /// Writes the header row.
    pub fn new(out: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(POST_COLUMNS)?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, post: &Post) -> Result<()> {
        self.writer.write_record(post_record(post))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

/// Streams comments as CSV rows.
pub struct CommentCsv<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CommentCsv<W> {
    pub fn new(out: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(COMMENT_COLUMNS)?;
        Ok(Self { writer })
    }

    pub fn write_all<'c>(&mut self, comments: impl IntoIterator<Item = &'c Comment>) -> Result<()> {
        for comment in comments {
            self.writer.write_record(comment_record(comment))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one post as a JSON object on its own line.
pub fn write_jsonl<W: Write>(out: &mut W, post: &Post) -> Result<()> {
    serde_json::to_writer(&mut *out, post)?;
    out.write_all(b"\n")?;
    Ok(())
}
