use std::fs;

use chrono::NaiveDate;
use cohort_core::DateRange;
use cohort_db::Db;
use ingest::ingest_directory;
use tempfile::tempdir;

fn open_db(dir: &std::path::Path) -> Db {
    let mut db = Db::open(dir.join("ingest.sqlite")).expect("open db");
    db.migrate().expect("migrate db");
    db
}

fn full_range() -> DateRange {
    DateRange {
        since: NaiveDate::from_ymd_opt(2000, 1, 1).expect("since"),
        until: NaiveDate::from_ymd_opt(2100, 1, 1).expect("until"),
    }
}

#[test]
fn ingest_reads_pages_and_lines_and_skips_bad_rows() {
    let dir = tempdir().expect("temp dir");
    let mut db = open_db(dir.path());
    let import_dir = dir.path().join("imports");
    fs::create_dir_all(import_dir.join("2024/10")).expect("create import dir");

    let page = r#"{"data": [
        {"ad_id": "101", "ad_name": "Hook A", "campaign_name": "Testing Q4",
         "date_start": "2024-10-30", "spend": "20.00", "impressions": "900",
         "actions": [{"action_type": "offsite_conversion.fb_pixel_purchase", "value": "12"}],
         "action_values": [{"action_type": "offsite_conversion.fb_pixel_purchase", "value": "40.5"}]},
        {"ad_name": "orphan", "date_start": "2024-10-30"}
    ], "paging": {"cursors": {}}}"#;
    fs::write(import_dir.join("2024/10/page-1.json"), page).expect("write page");

    let lines = concat!(
        "{\"ad_id\":\"102\",\"campaign_name\":\"Scale\",\"date_start\":\"2024-10-31\",\"spend\":5,\"purchases\":1,\"revenue\":3}\n",
        "{\"ad_id\":\"102\",\"date_start\":\"yesterday\"}\n",
        "\n",
    );
    fs::write(import_dir.join("daily.ndjson"), lines).expect("write lines");
    fs::write(import_dir.join("notes.txt"), "ignored").expect("write notes");

    let stats = ingest_directory(&mut db, &import_dir).expect("ingest");
    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.files_skipped, 0);
    assert_eq!(stats.rows_upserted, 2);
    assert_eq!(stats.rows_skipped, 2);
    assert!(stats.issues.is_empty());
    assert!(stats.bytes_read > 0);

    let rows = db.load_daily_records(&full_range(), None).expect("load");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].ad_id, "101");
    assert_eq!(rows[0].purchases, 12);
    assert_eq!(rows[0].revenue, 40.5);
    assert_eq!(rows[0].spend, 20.0);
    assert_eq!(rows[1].ad_id, "102");

    let testing = db
        .load_daily_records(&full_range(), Some("testing"))
        .expect("load testing");
    assert_eq!(testing.len(), 1);
}

#[test]
fn unchanged_files_are_skipped_on_rerun() {
    let dir = tempdir().expect("temp dir");
    let mut db = open_db(dir.path());
    let import_dir = dir.path().join("imports");
    fs::create_dir_all(&import_dir).expect("create import dir");
    let path = import_dir.join("rows.json");
    fs::write(&path, r#"[{"ad_id":"a","date_start":"2024-10-30","spend":1}]"#)
        .expect("write rows");

    let first = ingest_directory(&mut db, &import_dir).expect("ingest");
    assert_eq!(first.rows_upserted, 1);

    let second = ingest_directory(&mut db, &import_dir).expect("ingest again");
    assert_eq!(second.files_scanned, 1);
    assert_eq!(second.files_skipped, 1);
    assert_eq!(second.rows_upserted, 0);

    fs::write(
        &path,
        r#"[{"ad_id":"a","date_start":"2024-10-30","spend":3},{"ad_id":"a","date_start":"2024-10-31","spend":2}]"#,
    )
    .expect("rewrite rows");
    let third = ingest_directory(&mut db, &import_dir).expect("ingest changed");
    assert_eq!(third.files_skipped, 0);
    assert_eq!(third.rows_upserted, 2);
    assert_eq!(db.count_daily_records().expect("count"), 2);
    let rows = db.load_daily_records(&full_range(), None).expect("load");
    assert_eq!(rows[0].spend, 3.0);
}

#[test]
fn malformed_documents_become_issues() {
    let dir = tempdir().expect("temp dir");
    let mut db = open_db(dir.path());
    let import_dir = dir.path().join("imports");
    fs::create_dir_all(&import_dir).expect("create import dir");
    fs::write(import_dir.join("broken.json"), "{\"data\": [").expect("write broken");
    fs::write(import_dir.join("binary.jsonl"), [0xff, 0xfe, 0x00]).expect("write binary");

    let stats = ingest_directory(&mut db, &import_dir).expect("ingest");
    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.files_skipped, 2);
    assert_eq!(stats.issues.len(), 2);
    assert_eq!(db.count_daily_records().expect("count"), 0);
    let cursor = db
        .get_cursor(&import_dir.join("broken.json").to_string_lossy())
        .expect("cursor lookup");
    assert!(cursor.is_none());
}

#[test]
fn missing_directory_is_empty() {
    let dir = tempdir().expect("temp dir");
    let mut db = open_db(dir.path());
    let stats = ingest_directory(&mut db, &dir.path().join("nope")).expect("ingest");
    assert_eq!(stats.files_scanned, 0);
    assert!(stats.issues.is_empty());
}
