use std::collections::{BTreeMap, BTreeSet};

use cohort_core::{AdWeekFact, CohortPolicy, DailyRecord, LaunchDimension, RawDailyRecord};
use tracing::{info, warn};

use crate::dims::launch_dimensions;
use crate::score::{AdWeekBucket, aggregate_buckets};
use crate::timer::StageTimer;
use crate::types::{BuildStats, CohortBuild, CohortError, Result};
use crate::window::{launch_dates, window_records};

fn validate_policy(policy: &CohortPolicy) -> Result<()> {
    if policy.week_count == 0 {
        return Err(CohortError::InvalidPolicy(
            "week_count must be at least 1".to_string(),
        ));
    }
    if policy.window_days == 0 {
        return Err(CohortError::InvalidPolicy(
            "window_days must be at least 1".to_string(),
        ));
    }
    if !policy.hit_min_roas.is_finite() || policy.hit_min_roas < 0.0 {
        return Err(CohortError::InvalidPolicy(format!(
            "hit_min_roas must be a finite, non-negative number (got {})",
            policy.hit_min_roas
        )));
    }
    Ok(())
}

fn assemble_facts(
    buckets: Vec<AdWeekBucket>,
    dimensions: &BTreeMap<String, LaunchDimension>,
) -> Vec<AdWeekFact> {
    buckets
        .into_iter()
        .map(|bucket| {
            let dimension = dimensions.get(&bucket.ad_id);
            AdWeekFact {
                cohort_week: bucket.cohort_week,
                week_offset: bucket.week_offset,
                ad_name_at_launch: dimension.and_then(|dim| dim.ad_name_at_launch.clone()),
                adset_id: dimension.and_then(|dim| dim.adset_id.clone()),
                adset_name_at_launch: dimension.and_then(|dim| dim.adset_name_at_launch.clone()),
                campaign_id: dimension.and_then(|dim| dim.campaign_id.clone()),
                campaign_name_at_launch: dimension
                    .and_then(|dim| dim.campaign_name_at_launch.clone()),
                ad_id: bucket.ad_id,
                spend: bucket.spend,
                purchases: bucket.purchases,
                revenue: bucket.revenue,
                roas: bucket.roas,
                hit_bucket: bucket.hit_bucket,
                hit_cum: bucket.hit_cum,
            }
        })
        .collect()
}

/// Builds the ad-week fact table and the launch dimension snapshot.
///
/// Fails with [`CohortError::NoData`] on an empty input and with
/// [`CohortError::Invariant`] if a bucket or cohort key comes out malformed;
/// either way nothing is returned.
pub fn build_ad_weeks(records: &[DailyRecord], policy: &CohortPolicy) -> Result<CohortBuild> {
    if records.is_empty() {
        return Err(CohortError::NoData);
    }
    validate_policy(policy)?;
    let mut timer = StageTimer::new("cohorts");

    let launches = launch_dates(records);
    let windowed = window_records(records, &launches, policy)?;
    timer.tick("window & offsets");

    let buckets = aggregate_buckets(&windowed, policy);
    timer.tick("aggregate & hit scoring");

    let dimensions = launch_dimensions(records, &launches);
    let ads_seen = records
        .iter()
        .map(|record| record.ad_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let stats = BuildStats {
        input_records: records.len(),
        ads_seen,
        ads_launched: launches.len(),
        ads_without_launch: ads_seen - launches.len(),
        records_in_window: windowed.len(),
        buckets: buckets.len(),
    };
    let facts = assemble_facts(buckets, &dimensions);
    timer.tick("assemble facts");

    if facts.iter().any(|fact| !dimensions.contains_key(&fact.ad_id)) {
        warn!("launch dimension missing for some ads; names left empty");
    }
    info!(
        records = stats.input_records,
        ads = stats.ads_launched,
        facts = facts.len(),
        elapsed_ms = timer.total_ms() as u64,
        "cohort build complete"
    );

    Ok(CohortBuild {
        facts,
        dimensions: dimensions.into_values().collect(),
        stats,
    })
}

/// Coerces raw rows and builds facts. Rows with an unreadable date are skipped;
/// an input with no readable rows is treated as empty.
pub fn build_ad_weeks_from_raw(
    records: &[RawDailyRecord],
    policy: &CohortPolicy,
) -> Result<CohortBuild> {
    if records.is_empty() {
        return Err(CohortError::NoData);
    }
    let normalized: Vec<DailyRecord> = records
        .iter()
        .filter_map(RawDailyRecord::normalize)
        .collect();
    let skipped = records.len() - normalized.len();
    if skipped > 0 {
        warn!(skipped, "skipped rows with unreadable dates");
    }
    build_ad_weeks(&normalized, policy)
}
