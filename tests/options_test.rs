mod common;

use feed_scraper::{Error, Feed, Field, Options, Pacing, SnapshotPage};

#[test]
fn options_default_values_are_sensible() {
    let options = Options::default();
    assert_eq!(options.fields.len(), Field::ALL.len());
    assert!(options.group.is_none());
    assert_eq!(options.feed_header_children, 1);
    assert_eq!(options.scroll_fail_limit, 10);
    assert_eq!(options.load_retry_limit, 10);
    assert!(!options.report_timings);
    assert_eq!(options.pacing.scroll_pause_ms, 1200);
}

#[test]
fn options_struct_update_syntax_overrides_selected_fields_only() {
    let options = Options {
        group: Some("Rustaceans".to_string()),
        ..Options::with_fields([Field::User])
    };

    assert_eq!(options.group.as_deref(), Some("Rustaceans"));
    assert!(options.fields.contains(Field::User));
    assert!(!options.fields.contains(Field::Text));
    assert_eq!(options.scroll_fail_limit, 10);
}

#[test]
fn json_config_keeps_defaults_for_missing_keys() {
    let options = Options::from_json(
        r#"{"fields": ["user", "text"], "scroll_fail_limit": 3, "pacing": {"like_settle_ms": 0}}"#,
    )
    .expect("valid config");

    assert_eq!(options.fields.len(), 2);
    assert_eq!(options.scroll_fail_limit, 3);
    assert_eq!(options.load_retry_limit, 10);
    assert_eq!(options.pacing.like_settle_ms, 0);
    assert_eq!(options.pacing.scroll_pause_ms, Pacing::default().scroll_pause_ms);
}

#[test]
fn json_config_rejects_unknown_field_names() {
    let err = Options::from_json(r#"{"fields": ["user", "mood"]}"#).err();
    assert!(matches!(err, Some(Error::Config(_))));
}

#[test]
fn feed_header_children_shifts_the_first_slot() {
    let html = format!(
        r#"<html><body><div role="feed"><h3>New activity</h3><div>Stories</div>{}</div></body></html>"#,
        common::text_post(0, "")
    );
    let page = SnapshotPage::parse(&html);
    let options = Options {
        feed_header_children: 2,
        ..common::text_only()
    };

    let texts: Vec<Option<String>> = Feed::new(&page, options).browse().expect("feed").map(|p| p.text).collect();
    assert_eq!(texts, [Some("Post 0".to_string())]);
}
