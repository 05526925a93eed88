use std::collections::BTreeMap;

use chrono::NaiveDate;
use cohort_core::{DailyRecord, LaunchDimension};

fn dimension_from(record: &DailyRecord) -> LaunchDimension {
    LaunchDimension {
        ad_id: record.ad_id.clone(),
        ad_name_at_launch: record.ad_name.clone(),
        adset_id: record.adset_id.clone(),
        adset_name_at_launch: record.adset_name.clone(),
        campaign_id: record.campaign_id.clone(),
        campaign_name_at_launch: record.campaign_name.clone(),
    }
}

type SortKey<'a> = (
    &'a Option<String>,
    &'a Option<String>,
    &'a Option<String>,
    &'a Option<String>,
    &'a Option<String>,
);

fn sort_key(dimension: &LaunchDimension) -> SortKey<'_> {
    (
        &dimension.ad_name_at_launch,
        &dimension.adset_id,
        &dimension.adset_name_at_launch,
        &dimension.campaign_id,
        &dimension.campaign_name_at_launch,
    )
}

/// One row per launched ad, taken from the rows dated on its launch day.
///
/// Duplicate launch-day rows keep the smallest names/ids so the snapshot does
/// not depend on row order.
pub fn launch_dimensions(
    records: &[DailyRecord],
    launches: &BTreeMap<&str, NaiveDate>,
) -> BTreeMap<String, LaunchDimension> {
    let mut dimensions: BTreeMap<String, LaunchDimension> = BTreeMap::new();
    for record in records {
        if launches.get(record.ad_id.as_str()) != Some(&record.date) {
            continue;
        }
        let candidate = dimension_from(record);
        match dimensions.get_mut(&record.ad_id) {
            Some(existing) if sort_key(&candidate) < sort_key(existing) => *existing = candidate,
            Some(_) => {}
            None => {
                dimensions.insert(record.ad_id.clone(), candidate);
            }
        }
    }
    dimensions
}
