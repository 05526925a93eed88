use cohort_core::{AdWeekFact, DailyRecord};
use rusqlite::Row;

pub(crate) const DAILY_COLUMNS: &str = "ad_id, ad_name, adset_id, adset_name, campaign_id, \
     campaign_name, date_start, impressions, spend, purchases, revenue";

pub(crate) const FACT_COLUMNS: &str = "cohort_week, week_offset, ad_id, ad_name_at_launch, \
     adset_id, adset_name_at_launch, campaign_id, campaign_name_at_launch, spend, purchases, \
     revenue, roas, hit_bucket, hit_cum";

/// Counts are stored as sqlite integers; values past `i64::MAX` saturate.
pub(crate) fn count_to_sql(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn row_to_daily_record(
    row: &Row<'_>,
) -> std::result::Result<DailyRecord, rusqlite::Error> {
    Ok(DailyRecord {
        ad_id: row.get(0)?,
        ad_name: row.get(1)?,
        adset_id: row.get(2)?,
        adset_name: row.get(3)?,
        campaign_id: row.get(4)?,
        campaign_name: row.get(5)?,
        date: row.get(6)?,
        impressions: row.get::<_, i64>(7)?.max(0) as u64,
        spend: row.get(8)?,
        purchases: row.get::<_, i64>(9)?.max(0) as u64,
        revenue: row.get(10)?,
    })
}

pub(crate) fn row_to_fact(row: &Row<'_>) -> std::result::Result<AdWeekFact, rusqlite::Error> {
    Ok(AdWeekFact {
        cohort_week: row.get(0)?,
        week_offset: row.get::<_, i64>(1)? as u32,
        ad_id: row.get(2)?,
        ad_name_at_launch: row.get(3)?,
        adset_id: row.get(4)?,
        adset_name_at_launch: row.get(5)?,
        campaign_id: row.get(6)?,
        campaign_name_at_launch: row.get(7)?,
        spend: row.get(8)?,
        purchases: row.get::<_, i64>(9)?.max(0) as u64,
        revenue: row.get(10)?,
        roas: row.get(11)?,
        hit_bucket: row.get::<_, i64>(12)? != 0,
        hit_cum: row.get::<_, i64>(13)? != 0,
    })
}
