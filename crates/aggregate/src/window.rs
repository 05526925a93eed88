use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use cohort_core::{CohortPolicy, DAYS_PER_WEEK, DailyRecord};

use crate::types::{CohortError, Result};

/// A daily row aligned to its ad's launch date.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedRecord<'a> {
    pub record: &'a DailyRecord,
    pub launch_date: NaiveDate,
    pub cohort_week: NaiveDate,
    pub days_since_launch: i64,
    pub week_offset: u32,
}

/// First date with positive spend, per ad. Ads that never spent are absent.
pub fn launch_dates(records: &[DailyRecord]) -> BTreeMap<&str, NaiveDate> {
    let mut launches: BTreeMap<&str, NaiveDate> = BTreeMap::new();
    for record in records.iter().filter(|record| record.spend > 0.0) {
        launches
            .entry(record.ad_id.as_str())
            .and_modify(|date| {
                if record.date < *date {
                    *date = record.date;
                }
            })
            .or_insert(record.date);
    }
    launches
}

/// Monday on or before the launch date.
pub fn cohort_key(launch_date: NaiveDate) -> Result<NaiveDate> {
    let offset = launch_date.weekday().num_days_from_monday();
    let key = launch_date - Duration::days(i64::from(offset));
    if key.weekday() != Weekday::Mon {
        return Err(CohortError::Invariant(format!(
            "cohort key {} for launch {} is a {:?}, not a Monday",
            key,
            launch_date,
            key.weekday()
        )));
    }
    Ok(key)
}

pub fn week_offset(days_since_launch: i64, policy: &CohortPolicy) -> Result<u32> {
    let offset = 1 + days_since_launch.div_euclid(DAYS_PER_WEEK);
    if offset < 1 || offset > i64::from(policy.week_count) {
        return Err(CohortError::Invariant(format!(
            "week offset {} out of 1..={} (days since launch {})",
            offset, policy.week_count, days_since_launch
        )));
    }
    Ok(offset as u32)
}

/// Joins rows to their launch date and keeps the ones inside the launch window.
///
/// Rows for ads without a launch date are dropped; rows before launch or at or
/// after `window_days` are dropped. Every kept row gets a week offset and a
/// cohort key, and a bad value for either aborts the run.
pub fn window_records<'a>(
    records: &'a [DailyRecord],
    launches: &BTreeMap<&str, NaiveDate>,
    policy: &CohortPolicy,
) -> Result<Vec<WindowedRecord<'a>>> {
    let window_days = i64::from(policy.window_days);
    let mut cohort_keys: BTreeMap<NaiveDate, NaiveDate> = BTreeMap::new();
    let mut windowed = Vec::new();
    for record in records {
        let Some(&launch_date) = launches.get(record.ad_id.as_str()) else {
            continue;
        };
        let days_since_launch = record.date.signed_duration_since(launch_date).num_days();
        if !(0..window_days).contains(&days_since_launch) {
            continue;
        }
        let week_offset = week_offset(days_since_launch, policy)?;
        let cohort_week = match cohort_keys.get(&launch_date) {
            Some(key) => *key,
            None => {
                let key = cohort_key(launch_date)?;
                cohort_keys.insert(launch_date, key);
                key
            }
        };
        windowed.push(WindowedRecord {
            record,
            launch_date,
            cohort_week,
            days_since_launch,
            week_offset,
        });
    }
    Ok(windowed)
}
