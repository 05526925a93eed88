use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};
use crate::util::time::MAX_LOOKBACK_DAYS;
use cohort_core::CohortPolicy;
use cohort_db::Db;

/// Snapshot of user-configurable settings stored in the DB.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSnapshot {
    pub campaign_filter: Option<String>,
    pub lookback_days: u32,
    pub import_dir: String,
    pub policy: CohortPolicy,
}

/// Partial update; `campaign_filter: Some("")` clears the filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub campaign_filter: Option<String>,
    pub lookback_days: Option<u32>,
}

#[derive(Clone)]
pub struct SettingsService {
    config: SharedConfig,
}

impl SettingsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn get(&self) -> Result<SettingsSnapshot> {
        let db = self.db()?;
        Ok(SettingsSnapshot {
            campaign_filter: db.get_campaign_filter()?,
            lookback_days: db.get_lookback_days()?,
            import_dir: self.config.import_dir.to_string_lossy().to_string(),
            policy: self.config.policy,
        })
    }

    pub fn update(&self, update: &SettingsUpdate) -> Result<SettingsSnapshot> {
        if let Some(days) = update.lookback_days
            && !(1..=MAX_LOOKBACK_DAYS).contains(&days)
        {
            return Err(AppError::InvalidInput(format!(
                "lookback_days must be between 1 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        let db = self.db()?;
        if let Some(filter) = update.campaign_filter.as_deref() {
            db.set_campaign_filter(filter)?;
        }
        if let Some(days) = update.lookback_days {
            db.set_lookback_days(days)?;
        }
        self.get()
    }
}
