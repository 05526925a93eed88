use chrono::Utc;
use cohort_core::{DailyRecord, DateRange};
use rusqlite::params;

use crate::Db;
use crate::error::Result;
use crate::helpers::{DAILY_COLUMNS, count_to_sql, row_to_daily_record};

impl Db {
    /// Inserts or overwrites daily rows keyed by (ad_id, date_start).
    pub fn upsert_daily_records(
        &mut self,
        records: &[DailyRecord],
        source: Option<&str>,
    ) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let updated_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO ad_daily (
                  ad_id, ad_name, adset_id, adset_name, campaign_id, campaign_name,
                  date_start, impressions, spend, purchases, revenue, source, updated_at
                ) VALUES (
                  ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
                )
                ON CONFLICT(ad_id, date_start) DO UPDATE SET
                  ad_name = excluded.ad_name,
                  adset_id = excluded.adset_id,
                  adset_name = excluded.adset_name,
                  campaign_id = excluded.campaign_id,
                  campaign_name = excluded.campaign_name,
                  impressions = excluded.impressions,
                  spend = excluded.spend,
                  purchases = excluded.purchases,
                  revenue = excluded.revenue,
                  source = excluded.source,
                  updated_at = excluded.updated_at
                "#,
            )?;
            for record in records {
                written += stmt.execute(params![
                    record.ad_id,
                    record.ad_name,
                    record.adset_id,
                    record.adset_name,
                    record.campaign_id,
                    record.campaign_name,
                    record.date,
                    count_to_sql(record.impressions),
                    record.spend,
                    count_to_sql(record.purchases),
                    record.revenue,
                    source,
                    updated_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Daily rows inside `range` (inclusive). `campaign_filter` is a
    /// case-insensitive substring match on the campaign name.
    pub fn load_daily_records(
        &self,
        range: &DateRange,
        campaign_filter: Option<&str>,
    ) -> Result<Vec<DailyRecord>> {
        let sql = format!(
            r#"
            SELECT {DAILY_COLUMNS}
            FROM ad_daily
            WHERE date_start >= ?1
              AND date_start <= ?2
              AND (?3 IS NULL OR instr(lower(coalesce(campaign_name, '')), lower(?3)) > 0)
            ORDER BY ad_id ASC, date_start ASC
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![range.since, range.until, campaign_filter],
            row_to_daily_record,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn count_daily_records(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ad_daily", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
