#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use cohort_core::{AdWeekFact, DailyRecord};
use cohort_db::Db;
use tempfile::TempDir;

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
}

pub fn make_record(ad_id: &str, day: &str, campaign: &str, spend: f64) -> DailyRecord {
    DailyRecord {
        ad_id: ad_id.to_string(),
        ad_name: Some(format!("{ad_id} creative")),
        adset_id: Some("set-1".to_string()),
        adset_name: Some("Broad".to_string()),
        campaign_id: Some("camp-1".to_string()),
        campaign_name: Some(campaign.to_string()),
        date: date(day),
        impressions: 1200,
        spend,
        purchases: 3,
        revenue: spend * 2.0,
    }
}

pub fn make_fact(cohort: &str, week_offset: u32, ad_id: &str, hit_cum: bool) -> AdWeekFact {
    AdWeekFact {
        cohort_week: date(cohort),
        week_offset,
        ad_id: ad_id.to_string(),
        ad_name_at_launch: Some(format!("{ad_id} creative")),
        adset_id: None,
        adset_name_at_launch: None,
        campaign_id: Some("camp-1".to_string()),
        campaign_name_at_launch: Some("Testing".to_string()),
        spend: 10.0,
        purchases: 12,
        revenue: 20.0,
        roas: 2.0,
        hit_bucket: hit_cum,
        hit_cum,
    }
}
