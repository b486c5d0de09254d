//! Performance benchmarks for post assembly and traversal.
//!
//! Run with: `cargo bench`
//!
//! Pacing is disabled, so these measure extraction work against the snapshot
//! driver rather than the pauses a live session needs.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use feed_scraper::{assemble_post, Feed, Field, FieldSet, Options, Pacing, Page, SnapshotPage};

fn post(i: usize) -> String {
    format!(
        r#"<div class="post">
  <div class="buofh1pr"><div>
    <h4><div><div><span>User {i}</span><span>▸</span><span>Bench Group</span></div></div></h4>
    <div><span id="jsc_c{i}" aria-describedby="tip-{i}"><a href="/groups/1/posts/{i}/?__cft__=x">{i} h</a></span></div>
  </div></div>
  <div role="tooltip" id="tip-{i}">Friday, June 6, 2025 at 03:15 PM</div>
  <div data-ad-preview="message">Post number {i}<span data-expanded-by="more-{i}"> with a long tail</span></div>
  <div role="button" data-expander="more-{i}">See more</div>
  <span aria-label="See who reacted to this" role="toolbar">
    <div aria-label="Like: 3 people" aria-describedby="like-{i}"></div>
  </span>
  <div role="tooltip" id="like-{i}"><div>Like</div><div>Ann</div><div>Ben</div><div>Cat</div></div>
  <div role="button"><span>{i} Comments</span></div>
  <div role="button" aria-label="Like"><span>Like</span></div>
</div>"#
    )
}

fn feed(posts: usize) -> String {
    let body: String = (0..posts).map(post).collect();
    format!(r#"<html><body><div role="feed"><h3>New activity</h3>{body}</div></body></html>"#)
}

fn options(fields: FieldSet) -> Options {
    Options {
        fields,
        pacing: Pacing::none(),
        ..Options::default()
    }
}

fn bench_assemble(c: &mut Criterion) {
    let html = feed(1);
    let cheap = options(FieldSet::from([Field::Sponsored, Field::Liked, Field::Url, Field::Text]));
    let all = options(FieldSet::all().with(Field::Comments));

    c.bench_function("assemble_cheap_fields", |b| {
        b.iter_batched(
            || SnapshotPage::parse(&html),
            |page| {
                let el = page.find_all(None, "div.post").unwrap_or_default().remove(0);
                black_box(assemble_post(&page, &el, 0, &cheap))
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("assemble_all_fields", |b| {
        b.iter_batched(
            || SnapshotPage::parse(&html),
            |page| {
                let el = page.find_all(None, "div.post").unwrap_or_default().remove(0);
                black_box(assemble_post(&page, &el, 0, &all))
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_traverse(c: &mut Criterion) {
    let html = feed(20);
    let opts = options(FieldSet::from([Field::User, Field::Text, Field::Url]));

    c.bench_function("traverse_20_posts", |b| {
        b.iter_batched(
            || SnapshotPage::parse(&html),
            |page| {
                let count = Feed::new(&page, opts.clone())
                    .browse()
                    .map(Iterator::count)
                    .unwrap_or_default();
                black_box(count)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_assemble, bench_traverse);
criterion_main!(benches);
