use aggregate::{CohortError, build_ad_weeks, build_ad_weeks_from_raw};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use cohort_core::{AdWeekFact, CohortPolicy, DailyRecord, RawDailyRecord};
use serde_json::json;

fn day(offset: i64) -> NaiveDate {
    // 2024-10-30 is a Wednesday.
    NaiveDate::from_ymd_opt(2024, 10, 30).unwrap() + Duration::days(offset)
}

fn record(
    ad_id: &str,
    date: NaiveDate,
    spend: f64,
    purchases: u64,
    revenue: f64,
) -> DailyRecord {
    DailyRecord {
        ad_id: ad_id.to_string(),
        ad_name: Some(format!("{ad_id} name")),
        adset_id: Some("set-1".to_string()),
        adset_name: Some("Prospecting".to_string()),
        campaign_id: Some("camp-1".to_string()),
        campaign_name: Some("Testing - Hooks".to_string()),
        date,
        impressions: 1000,
        spend,
        purchases,
        revenue,
    }
}

fn facts_for<'a>(facts: &'a [AdWeekFact], ad_id: &str) -> Vec<&'a AdWeekFact> {
    facts.iter().filter(|fact| fact.ad_id == ad_id).collect()
}

fn mixed_records() -> Vec<DailyRecord> {
    let mut records = Vec::new();
    for offset in 0..35 {
        let spend = if offset % 3 == 0 { 0.0 } else { 7.5 };
        records.push(record("alpha", day(offset), spend, 2, 12.25));
    }
    for offset in 2..20 {
        records.push(record("beta", day(offset), 20.0, 1, 15.0));
    }
    records.push(record("gamma", day(1), 0.0, 4, 0.0));
    records.push(record("delta", day(-3), 0.0, 0, 0.0));
    records.push(record("delta", day(9), 3.0, 11, 9.0));
    records
}

#[test]
fn sticky_hit_carries_into_zero_activity_week() {
    let records = vec![
        record("ad-1", day(0), 50.0, 12, 100.0),
        record("ad-1", day(10), 0.0, 0, 0.0),
    ];
    let build = build_ad_weeks(&records, &CohortPolicy::default()).expect("build");
    assert_eq!(build.facts.len(), 2);

    let week1 = &build.facts[0];
    assert_eq!(week1.week_offset, 1);
    assert_eq!(week1.spend, 50.0);
    assert_eq!(week1.revenue, 100.0);
    assert_eq!(week1.purchases, 12);
    assert_eq!(week1.roas, 2.0);
    assert!(week1.hit_bucket);
    assert!(week1.hit_cum);

    let week2 = &build.facts[1];
    assert_eq!(week2.week_offset, 2);
    assert_eq!(week2.spend, 0.0);
    assert_eq!(week2.revenue, 0.0);
    assert_eq!(week2.purchases, 0);
    assert_eq!(week2.roas, 0.0);
    assert!(!week2.hit_bucket);
    assert!(week2.hit_cum);
}

#[test]
fn ad_without_spend_produces_no_rows() {
    let records = vec![
        record("idle", day(0), 0.0, 3, 10.0),
        record("idle", day(1), 0.0, 0, 0.0),
        record("live", day(0), 5.0, 0, 0.0),
    ];
    let build = build_ad_weeks(&records, &CohortPolicy::default()).expect("build");
    assert!(facts_for(&build.facts, "idle").is_empty());
    assert_eq!(build.stats.ads_seen, 2);
    assert_eq!(build.stats.ads_without_launch, 1);
    assert_eq!(build.dimensions.len(), 1);
}

#[test]
fn ads_launched_in_same_week_share_cohort() {
    // Tuesday and Sunday of the week starting Monday 2024-10-28.
    let tuesday = NaiveDate::from_ymd_opt(2024, 10, 29).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
    let records = vec![
        record("tue", tuesday, 1.0, 0, 0.0),
        record("sun", sunday, 1.0, 0, 0.0),
    ];
    let build = build_ad_weeks(&records, &CohortPolicy::default()).expect("build");
    let monday = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
    assert_eq!(build.facts.len(), 2);
    assert!(build.facts.iter().all(|fact| fact.cohort_week == monday));
}

#[test]
fn empty_input_is_no_data() {
    let err = build_ad_weeks(&[], &CohortPolicy::default()).unwrap_err();
    assert!(matches!(err, CohortError::NoData));
    let err = build_ad_weeks_from_raw(&[], &CohortPolicy::default()).unwrap_err();
    assert!(matches!(err, CohortError::NoData));
}

#[test]
fn launch_date_is_minimum_positive_spend_date() {
    let records = vec![
        record("ad", day(-2), 0.0, 0, 0.0),
        record("ad", day(5), 1.0, 0, 0.0),
        record("ad", day(3), 2.0, 0, 0.0),
    ];
    let build = build_ad_weeks(&records, &CohortPolicy::default()).expect("build");
    // Launch on day 3 (Saturday 2024-11-02): day 3 and day 5 land in week 1.
    assert_eq!(build.facts.len(), 1);
    assert_eq!(build.facts[0].spend, 3.0);
    assert_eq!(
        build.facts[0].cohort_week,
        NaiveDate::from_ymd_opt(2024, 10, 28).unwrap()
    );
}

#[test]
fn properties_hold_for_mixed_input() {
    let policy = CohortPolicy::default();
    let build = build_ad_weeks(&mixed_records(), &policy).expect("build");
    assert!(!build.facts.is_empty());

    for fact in &build.facts {
        assert!((1..=4).contains(&fact.week_offset));
        assert_eq!(fact.cohort_week.weekday(), Weekday::Mon);
        if fact.spend == 0.0 {
            assert_eq!(fact.roas, 0.0);
        } else {
            assert_eq!(fact.roas, fact.revenue / fact.spend);
        }
        assert_eq!(
            fact.hit_bucket,
            fact.purchases >= policy.hit_min_purchases && fact.roas >= policy.hit_min_roas
        );
    }

    for ad_id in ["alpha", "beta", "delta"] {
        let rows = facts_for(&build.facts, ad_id);
        let mut running = false;
        let mut last_week = 0;
        for fact in rows {
            assert!(fact.week_offset > last_week);
            last_week = fact.week_offset;
            running = running || fact.hit_bucket;
            assert_eq!(fact.hit_cum, running);
        }
    }
    assert!(facts_for(&build.facts, "gamma").is_empty());
}

#[test]
fn alpha_window_stops_at_day_27() {
    let build = build_ad_weeks(&mixed_records(), &CohortPolicy::default()).expect("build");
    // alpha launches on day 1 (day 0 has zero spend), so day 1..=28 are kept.
    let alpha = facts_for(&build.facts, "alpha");
    assert_eq!(alpha.len(), 4);
    let purchases: u64 = alpha.iter().map(|fact| fact.purchases).sum();
    assert_eq!(purchases, 28 * 2);
}

#[test]
fn output_is_identical_for_reordered_input() {
    let policy = CohortPolicy::default();
    let forward = mixed_records();
    let mut backward = forward.clone();
    backward.reverse();
    let mut shuffled = forward.clone();
    shuffled.rotate_left(17);

    let a = build_ad_weeks(&forward, &policy).expect("forward");
    let b = build_ad_weeks(&backward, &policy).expect("backward");
    let c = build_ad_weeks(&shuffled, &policy).expect("shuffled");
    let again = build_ad_weeks(&forward, &policy).expect("again");

    let json_a = serde_json::to_string(&a.facts).expect("json");
    assert_eq!(json_a, serde_json::to_string(&b.facts).expect("json"));
    assert_eq!(json_a, serde_json::to_string(&c.facts).expect("json"));
    assert_eq!(json_a, serde_json::to_string(&again.facts).expect("json"));
    assert_eq!(a.dimensions, b.dimensions);
}

#[test]
fn hit_thresholds_are_inclusive_and_configurable() {
    let records = vec![
        record("edge", day(0), 10.0, 10, 14.0),
        record("short", day(0), 10.0, 9, 14.0),
        record("weak", day(0), 10.0, 10, 13.99),
    ];
    let build = build_ad_weeks(&records, &CohortPolicy::default()).expect("build");
    let hit = |ad_id: &str| facts_for(&build.facts, ad_id)[0].hit_bucket;
    assert!(hit("edge"));
    assert!(!hit("short"));
    assert!(!hit("weak"));

    let strict = CohortPolicy {
        hit_min_purchases: 11,
        ..CohortPolicy::default()
    };
    let build = build_ad_weeks(&records, &strict).expect("build");
    assert!(build.facts.iter().all(|fact| !fact.hit_bucket));
}

#[test]
fn facts_carry_launch_names() {
    let mut renamed = record("ad", day(8), 4.0, 0, 0.0);
    renamed.ad_name = Some("renamed later".to_string());
    let records = vec![record("ad", day(0), 4.0, 0, 0.0), renamed];
    let build = build_ad_weeks(&records, &CohortPolicy::default()).expect("build");
    assert_eq!(build.facts.len(), 2);
    for fact in &build.facts {
        assert_eq!(fact.ad_name_at_launch.as_deref(), Some("ad name"));
        assert_eq!(fact.campaign_name_at_launch.as_deref(), Some("Testing - Hooks"));
        assert_eq!(fact.adset_id.as_deref(), Some("set-1"));
    }
}

#[test]
fn invalid_policy_is_rejected() {
    let records = vec![record("ad", day(0), 1.0, 0, 0.0)];
    let policy = CohortPolicy {
        week_count: 0,
        ..CohortPolicy::default()
    };
    let err = build_ad_weeks(&records, &policy).unwrap_err();
    assert!(matches!(err, CohortError::InvalidPolicy(_)));
}

#[test]
fn raw_rows_are_coerced_before_building() {
    let rows = vec![
        RawDailyRecord {
            ad_id: "raw".to_string(),
            date_start: "2024-10-30".to_string(),
            spend: Some(json!("25.00")),
            purchases: Some(json!("12")),
            revenue: Some(json!(50)),
            impressions: Some(json!("lots")),
            ..Default::default()
        },
        RawDailyRecord {
            ad_id: "raw".to_string(),
            date_start: "not a date".to_string(),
            spend: Some(json!(100)),
            ..Default::default()
        },
        RawDailyRecord {
            ad_id: "raw".to_string(),
            date_start: "2024-11-01".to_string(),
            spend: Some(json!(null)),
            purchases: Some(json!("abc")),
            revenue: Some(json!({"value": 3})),
            ..Default::default()
        },
    ];
    let build = build_ad_weeks_from_raw(&rows, &CohortPolicy::default()).expect("build");
    assert_eq!(build.facts.len(), 1);
    let fact = &build.facts[0];
    assert_eq!(fact.spend, 25.0);
    assert_eq!(fact.purchases, 12);
    assert_eq!(fact.revenue, 50.0);
    assert_eq!(fact.roas, 2.0);
    assert!(fact.hit_cum);
    assert_eq!(build.stats.input_records, 2);
}
