//! Replays a saved feed snapshot and writes the posts it contains.
//!
//! Reads HTML from a file (or stdin), browses it with the snapshot driver and
//! writes one CSV row or JSON line per post to stdout.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use feed_scraper::export::{write_jsonl, CommentCsv, PostCsv};
use feed_scraper::{Error, Feed, Field, FieldSet, Options, Pacing, SnapshotPage};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

/// Extract posts from a saved feed snapshot.
#[derive(Parser)]
#[command(name = "scrape_snapshot")]
#[command(version)]
struct Cli {
    /// HTML snapshot to read; stdin when omitted
    snapshot: Option<PathBuf>,

    /// JSON options file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated fields to extract (overrides the config)
    #[arg(short, long)]
    fields: Option<String>,

    /// Group or page name, for snapshots of a group feed
    #[arg(short, long)]
    group: Option<String>,

    /// URL of the group being browsed; its name is read from the snapshot
    #[arg(long, conflicts_with = "group")]
    group_url: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: Format,

    /// Also write every post's comments to this CSV file (requests the comments field)
    #[arg(long)]
    comments: Option<PathBuf>,

    /// Keep the configured pauses instead of replaying instantly
    #[arg(long)]
    paced: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&Cli::parse()) {
        Ok(count) => {
            info!(posts = count, "done");
            ExitCode::SUCCESS
        }
        Err(e @ Error::FatalSetup(_)) => {
            error!("{e}");
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> feed_scraper::Result<usize> {
    let mut options = match &cli.config {
        Some(path) => Options::from_json(&fs::read_to_string(path)?)?,
        None => Options::default(),
    };
    if let Some(list) = &cli.fields {
        options.fields = FieldSet::parse_list(list).map_err(|e| Error::ParseFailure {
            what: "field list",
            input: e.0,
        })?;
    }
    if cli.group.is_some() {
        options.group.clone_from(&cli.group);
    }
    if cli.comments.is_some() {
        options.fields = options.fields.with(Field::Comments);
    }
    if !cli.paced {
        options.pacing = Pacing::none();
    }

    let html = match &cli.snapshot {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            html
        }
    };

    let page = SnapshotPage::parse(&html);
    let mut feed = Feed::new(&page, options);
    if let Some(url) = &cli.group_url {
        feed.detect_group(url)?;
    }
    let posts = feed.browse()?;

    let mut comments = match &cli.comments {
        Some(path) => Some(CommentCsv::new(BufWriter::new(File::create(path)?))?),
        None => None,
    };

    let stdout = io::stdout().lock();
    let mut count = 0;
    match cli.format {
        Format::Csv => {
            let mut csv = PostCsv::new(stdout)?;
            for post in posts {
                csv.write(&post)?;
                if let (Some(sink), Some(list)) = (comments.as_mut(), post.comments.as_ref()) {
                    sink.write_all(list)?;
                }
                count += 1;
            }
            csv.flush()?;
        }
        Format::Jsonl => {
            let mut out = BufWriter::new(stdout);
            for post in posts {
                write_jsonl(&mut out, &post)?;
                if let (Some(sink), Some(list)) = (comments.as_mut(), post.comments.as_ref()) {
                    sink.write_all(list)?;
                }
                count += 1;
            }
            out.flush()?;
        }
    }

    if let Some(sink) = comments.as_mut() {
        sink.flush()?;
    }
    Ok(count)
}
