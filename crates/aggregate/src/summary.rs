use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use cohort_core::{AdWeekFact, CohortGridCell, CohortGridRow, CohortWeekSummary};

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn hit_pct(hits: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(hits as f64 / total as f64 * 100.0)
}

/// Hit rate and totals for one cohort at one week offset.
///
/// The denominator is every ad launched in the cohort; ads with no row at
/// `week_offset` count as not hit.
pub fn summarize_cohort_week(
    facts: &[AdWeekFact],
    cohort_week: NaiveDate,
    week_offset: u32,
) -> CohortWeekSummary {
    let cohort_ads: BTreeSet<&str> = facts
        .iter()
        .filter(|fact| fact.cohort_week == cohort_week)
        .map(|fact| fact.ad_id.as_str())
        .collect();

    let mut week_hits: BTreeMap<&str, bool> = BTreeMap::new();
    let mut spend_sum = 0.0;
    let mut purchases_sum = 0u64;
    let mut revenue_sum = 0.0;
    for fact in facts
        .iter()
        .filter(|fact| fact.cohort_week == cohort_week && fact.week_offset == week_offset)
    {
        week_hits.entry(fact.ad_id.as_str()).or_insert(fact.hit_cum);
        spend_sum += fact.spend;
        purchases_sum = purchases_sum.saturating_add(fact.purchases);
        revenue_sum += fact.revenue;
    }

    let hits = cohort_ads
        .iter()
        .filter(|ad_id| week_hits.get(*ad_id).copied().unwrap_or(false))
        .count() as u64;
    let total_ads = cohort_ads.len() as u64;
    CohortWeekSummary {
        cohort_week,
        week_offset,
        total_ads,
        week_hit_pct: hit_pct(hits, total_ads),
        spend_sum,
        purchases_sum,
        revenue_sum,
    }
}

/// Per-cohort hit percentages for weeks `1..=week_count`, newest cohort first.
///
/// Each ad is reindexed onto the dense week grid; a missing week inherits the
/// ad's latest earlier cumulative flag, so percentages never decrease.
pub fn cohort_grid(facts: &[AdWeekFact], week_count: u32) -> Vec<CohortGridRow> {
    let mut cohorts: BTreeMap<NaiveDate, BTreeMap<&str, BTreeMap<u32, bool>>> = BTreeMap::new();
    for fact in facts {
        cohorts
            .entry(fact.cohort_week)
            .or_default()
            .entry(fact.ad_id.as_str())
            .or_default()
            .insert(fact.week_offset, fact.hit_cum);
    }

    cohorts
        .into_iter()
        .rev()
        .map(|(cohort_week, ads)| {
            let total_ads = ads.len() as u64;
            let mut hits = vec![0u64; week_count as usize];
            for weeks in ads.values() {
                let mut carried = false;
                for (index, week) in (1..=week_count).enumerate() {
                    if let Some(flag) = weeks.get(&week) {
                        carried = carried || *flag;
                    }
                    if carried {
                        hits[index] += 1;
                    }
                }
            }
            CohortGridRow {
                cohort_week,
                total_ads,
                weeks: (1..=week_count)
                    .zip(hits)
                    .map(|(week_offset, hits)| CohortGridCell {
                        week_offset,
                        hits,
                        hit_pct: hit_pct(hits, total_ads),
                    })
                    .collect(),
            }
        })
        .collect()
}
