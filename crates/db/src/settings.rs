use rusqlite::params;

use crate::Db;
use crate::error::Result;

pub const DEFAULT_CAMPAIGN_FILTER: &str = "Testing";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

impl Db {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// `None` means every campaign is included. An unset value falls back to
    /// [`DEFAULT_CAMPAIGN_FILTER`]; an empty stored value disables filtering.
    pub fn get_campaign_filter(&self) -> Result<Option<String>> {
        let value = self
            .get_setting("campaign_filter")?
            .unwrap_or_else(|| DEFAULT_CAMPAIGN_FILTER.to_string());
        let trimmed = value.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    pub fn set_campaign_filter(&self, filter: &str) -> Result<()> {
        self.set_setting("campaign_filter", filter.trim())
    }

    pub fn get_lookback_days(&self) -> Result<u32> {
        let days = self
            .get_setting("lookback_days")?
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_LOOKBACK_DAYS);
        Ok(days)
    }

    pub fn set_lookback_days(&self, days: u32) -> Result<()> {
        self.set_setting("lookback_days", &days.to_string())
    }
}
