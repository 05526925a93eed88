use std::collections::BTreeMap;

use chrono::NaiveDate;
use cohort_core::CohortPolicy;
use serde::Serialize;

use crate::window::WindowedRecord;

/// Per (cohort, week offset, ad) totals with hit scoring applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdWeekBucket {
    pub cohort_week: NaiveDate,
    pub week_offset: u32,
    pub ad_id: String,
    pub spend: f64,
    pub purchases: u64,
    pub revenue: f64,
    pub roas: f64,
    pub hit_bucket: bool,
    pub hit_cum: bool,
}

#[derive(Default)]
struct Totals {
    spend: f64,
    purchases: u64,
    revenue: f64,
}

/// Revenue over spend; exactly 0.0 when nothing was spent.
pub fn efficiency_ratio(revenue: f64, spend: f64) -> f64 {
    if spend > 0.0 {
        let ratio = revenue / spend;
        if ratio.is_finite() { ratio } else { 0.0 }
    } else {
        0.0
    }
}

/// Sums windowed rows per bucket and scores each bucket.
///
/// Rows are summed in (ad, date) order so float totals do not depend on the
/// order the rows arrived in. The result is ordered by cohort, ad, week offset.
pub fn aggregate_buckets(
    windowed: &[WindowedRecord<'_>],
    policy: &CohortPolicy,
) -> Vec<AdWeekBucket> {
    let mut ordered: Vec<&WindowedRecord<'_>> = windowed.iter().collect();
    ordered.sort_by(|a, b| {
        a.record
            .ad_id
            .cmp(&b.record.ad_id)
            .then(a.record.date.cmp(&b.record.date))
            .then(a.record.spend.total_cmp(&b.record.spend))
            .then(a.record.revenue.total_cmp(&b.record.revenue))
            .then(a.record.purchases.cmp(&b.record.purchases))
    });

    let mut groups: BTreeMap<(NaiveDate, &str, u32), Totals> = BTreeMap::new();
    for row in ordered {
        let totals = groups
            .entry((row.cohort_week, row.record.ad_id.as_str(), row.week_offset))
            .or_default();
        totals.spend += row.record.spend;
        totals.purchases = totals.purchases.saturating_add(row.record.purchases);
        totals.revenue += row.record.revenue;
    }

    let mut buckets: Vec<AdWeekBucket> = groups
        .into_iter()
        .map(|((cohort_week, ad_id, week_offset), totals)| {
            let roas = efficiency_ratio(totals.revenue, totals.spend);
            AdWeekBucket {
                cohort_week,
                week_offset,
                ad_id: ad_id.to_string(),
                spend: totals.spend,
                purchases: totals.purchases,
                revenue: totals.revenue,
                roas,
                hit_bucket: policy.is_hit(totals.purchases, roas),
                hit_cum: false,
            }
        })
        .collect();
    apply_sticky_hits(&mut buckets);
    buckets
}

/// Running OR of `hit_bucket` over each (cohort, ad) group, by week offset.
///
/// Groups must be contiguous; each group is sorted by week offset in place.
/// Weeks without a bucket are not filled in.
pub fn apply_sticky_hits(buckets: &mut [AdWeekBucket]) {
    for group in buckets.chunk_by_mut(|a, b| a.cohort_week == b.cohort_week && a.ad_id == b.ad_id)
    {
        group.sort_by_key(|bucket| bucket.week_offset);
        let mut carried = false;
        for bucket in group.iter_mut() {
            carried = carried || bucket.hit_bucket;
            bucket.hit_cum = carried;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_core::DailyRecord;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
    }

    fn bucket(ad_id: &str, week_offset: u32, hit_bucket: bool) -> AdWeekBucket {
        AdWeekBucket {
            cohort_week: date("2024-10-28"),
            week_offset,
            ad_id: ad_id.to_string(),
            spend: 0.0,
            purchases: 0,
            revenue: 0.0,
            roas: 0.0,
            hit_bucket,
            hit_cum: false,
        }
    }

    #[test]
    fn efficiency_ratio_is_zero_without_spend() {
        assert_eq!(efficiency_ratio(100.0, 0.0), 0.0);
        assert_eq!(efficiency_ratio(0.0, 0.0), 0.0);
        assert_eq!(efficiency_ratio(100.0, 50.0), 2.0);
        assert_eq!(efficiency_ratio(f64::MAX, f64::MIN_POSITIVE), 0.0);
    }

    #[test]
    fn sticky_hits_carry_forward_within_ad() {
        let mut buckets = vec![
            bucket("a", 1, false),
            bucket("a", 2, true),
            bucket("a", 3, false),
            bucket("a", 4, false),
            bucket("b", 1, false),
            bucket("b", 3, false),
        ];
        apply_sticky_hits(&mut buckets);
        let cum: Vec<bool> = buckets.iter().map(|bucket| bucket.hit_cum).collect();
        assert_eq!(cum, vec![false, true, true, true, false, false]);
    }

    #[test]
    fn sticky_hits_sort_weeks_inside_group() {
        let mut buckets = vec![bucket("a", 3, false), bucket("a", 1, true)];
        apply_sticky_hits(&mut buckets);
        assert_eq!(buckets[0].week_offset, 1);
        assert!(buckets[1].hit_cum);
    }

    #[test]
    fn aggregate_sums_rows_per_week() {
        let rows: Vec<DailyRecord> = [("2024-10-28", 10.0, 4, 20.0), ("2024-10-30", 10.0, 6, 10.0)]
            .iter()
            .map(|(day, spend, purchases, revenue)| DailyRecord {
                ad_id: "a".to_string(),
                ad_name: None,
                adset_id: None,
                adset_name: None,
                campaign_id: None,
                campaign_name: None,
                date: date(day),
                impressions: 0,
                spend: *spend,
                purchases: *purchases,
                revenue: *revenue,
            })
            .collect();
        let windowed: Vec<WindowedRecord<'_>> = rows
            .iter()
            .map(|record| WindowedRecord {
                record,
                launch_date: date("2024-10-28"),
                cohort_week: date("2024-10-28"),
                days_since_launch: record
                    .date
                    .signed_duration_since(date("2024-10-28"))
                    .num_days(),
                week_offset: 1,
            })
            .collect();
        let buckets = aggregate_buckets(&windowed, &CohortPolicy::default());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].spend, 20.0);
        assert_eq!(buckets[0].purchases, 10);
        assert_eq!(buckets[0].revenue, 30.0);
        assert_eq!(buckets[0].roas, 1.5);
        assert!(buckets[0].hit_bucket);
        assert!(buckets[0].hit_cum);
    }
}
