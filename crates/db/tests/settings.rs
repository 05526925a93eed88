mod support;

use cohort_db::{DEFAULT_CAMPAIGN_FILTER, DEFAULT_LOOKBACK_DAYS, IngestCursor};
use support::setup_db;

#[test]
fn settings_fall_back_to_defaults() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert_eq!(
        db.get_campaign_filter().expect("filter").as_deref(),
        Some(DEFAULT_CAMPAIGN_FILTER)
    );
    assert_eq!(db.get_lookback_days().expect("lookback"), DEFAULT_LOOKBACK_DAYS);
}

#[test]
fn empty_campaign_filter_disables_filtering() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.set_campaign_filter("  ").expect("set filter");
    assert_eq!(db.get_campaign_filter().expect("filter"), None);
    db.set_campaign_filter(" Scale ").expect("set filter");
    assert_eq!(db.get_campaign_filter().expect("filter").as_deref(), Some("Scale"));
}

#[test]
fn lookback_ignores_unreadable_values() {
    let test_db = setup_db();
    let db = &test_db.db;
    db.set_lookback_days(90).expect("set lookback");
    assert_eq!(db.get_lookback_days().expect("lookback"), 90);
    db.set_setting("lookback_days", "soon").expect("set raw");
    assert_eq!(db.get_lookback_days().expect("lookback"), DEFAULT_LOOKBACK_DAYS);
}

#[test]
fn cursor_round_trips_and_matches_fingerprint() {
    let test_db = setup_db();
    let db = &test_db.db;
    assert_eq!(db.get_cursor("a.json").expect("missing"), None);

    let cursor = IngestCursor {
        file_path: "a.json".to_string(),
        byte_len: 512,
        mtime: Some("1730246400".to_string()),
        rows_seen: 7,
        updated_at: "2024-10-30T00:00:00Z".to_string(),
    };
    db.upsert_cursor(&cursor).expect("store");
    let stored = db.get_cursor("a.json").expect("load").expect("cursor");
    assert_eq!(stored, cursor);
    assert!(stored.matches(512, Some("1730246400")));
    assert!(!stored.matches(513, Some("1730246400")));
    assert!(!stored.matches(512, None));
}
