use chrono::{NaiveDate, Utc};
use cohort_core::AdWeekFact;
use rusqlite::params;

use crate::Db;
use crate::error::Result;
use crate::helpers::{FACT_COLUMNS, count_to_sql, row_to_fact};

impl Db {
    /// Writes facts keyed by (cohort_week, week_offset, ad_id); rows already
    /// stored under the same key are overwritten, so re-running a build is a no-op.
    pub fn upsert_ad_week_facts(&mut self, facts: &[AdWeekFact]) -> Result<usize> {
        if facts.is_empty() {
            return Ok(0);
        }
        let built_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut written = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO ad_week_fact (
                  cohort_week, week_offset, ad_id, ad_name_at_launch, adset_id,
                  adset_name_at_launch, campaign_id, campaign_name_at_launch, spend,
                  purchases, revenue, roas, hit_bucket, hit_cum, built_at
                ) VALUES (
                  ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
                )
                ON CONFLICT(cohort_week, week_offset, ad_id) DO UPDATE SET
                  ad_name_at_launch = excluded.ad_name_at_launch,
                  adset_id = excluded.adset_id,
                  adset_name_at_launch = excluded.adset_name_at_launch,
                  campaign_id = excluded.campaign_id,
                  campaign_name_at_launch = excluded.campaign_name_at_launch,
                  spend = excluded.spend,
                  purchases = excluded.purchases,
                  revenue = excluded.revenue,
                  roas = excluded.roas,
                  hit_bucket = excluded.hit_bucket,
                  hit_cum = excluded.hit_cum,
                  built_at = excluded.built_at
                "#,
            )?;
            for fact in facts {
                written += stmt.execute(params![
                    fact.cohort_week,
                    fact.week_offset as i64,
                    fact.ad_id,
                    fact.ad_name_at_launch,
                    fact.adset_id,
                    fact.adset_name_at_launch,
                    fact.campaign_id,
                    fact.campaign_name_at_launch,
                    fact.spend,
                    count_to_sql(fact.purchases),
                    fact.revenue,
                    fact.roas,
                    i64::from(fact.hit_bucket),
                    i64::from(fact.hit_cum),
                    built_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    pub fn list_ad_week_facts(&self, cohort_week: Option<NaiveDate>) -> Result<Vec<AdWeekFact>> {
        let sql = format!(
            r#"
            SELECT {FACT_COLUMNS}
            FROM ad_week_fact
            WHERE (?1 IS NULL OR cohort_week = ?1)
            ORDER BY cohort_week ASC, ad_id ASC, week_offset ASC
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![cohort_week], row_to_fact)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn list_cohort_weeks(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT cohort_week FROM ad_week_fact ORDER BY cohort_week DESC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn count_ad_week_facts(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ad_week_fact", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
