use aggregate::{CohortBuild, build_ad_weeks, cohort_grid, summarize_cohort_week};
use chrono::NaiveDate;
use cohort_core::{AdWeekFact, CohortGridRow, CohortWeekSummary, DateRange};
use cohort_db::Db;
use tracing::info;

use crate::config::RangeParams;
use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};
use crate::util::time::resolve_date_range;

#[derive(Clone)]
pub struct CohortService {
    config: SharedConfig,
}

impl CohortService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Resolves `params` using the stored lookback setting as the default.
    pub fn resolve_range(&self, params: &RangeParams) -> Result<DateRange> {
        let db = self.db()?;
        resolve_date_range(params, db.get_lookback_days()?)
    }

    /// Rebuilds facts from the daily rows in `range` (campaign filter applied)
    /// and writes them to the fact table.
    pub fn build(&self, range: &DateRange) -> Result<CohortBuild> {
        let mut db = self.db()?;
        let filter = db.get_campaign_filter()?;
        let records = db.load_daily_records(range, filter.as_deref())?;
        let build = build_ad_weeks(&records, &self.config.policy)?;
        let written = db.upsert_ad_week_facts(&build.facts)?;
        info!(
            since = %range.since,
            until = %range.until,
            campaign_filter = filter.as_deref().unwrap_or(""),
            facts = written,
            "stored cohort facts"
        );
        Ok(build)
    }

    pub fn facts(&self, cohort_week: Option<NaiveDate>) -> Result<Vec<AdWeekFact>> {
        Ok(self.db()?.list_ad_week_facts(cohort_week)?)
    }

    pub fn summary(&self, cohort_week: NaiveDate, week_offset: u32) -> Result<CohortWeekSummary> {
        let week_count = self.config.policy.week_count;
        if week_offset == 0 || week_offset > week_count {
            return Err(AppError::InvalidInput(format!(
                "week_offset must be between 1 and {}",
                week_count
            )));
        }
        let facts = self.facts(Some(cohort_week))?;
        if facts.is_empty() {
            return Err(AppError::NotFound(format!(
                "cohort {} not found",
                cohort_week
            )));
        }
        Ok(summarize_cohort_week(&facts, cohort_week, week_offset))
    }

    pub fn grid(&self) -> Result<Vec<CohortGridRow>> {
        let facts = self.facts(None)?;
        Ok(cohort_grid(&facts, self.config.policy.week_count))
    }
}
