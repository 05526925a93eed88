use cohort_app::RangeParams;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize, Default)]
pub struct RangeRequest {
    pub since: Option<String>,
    pub until: Option<String>,
    pub lookback_days: Option<u32>,
}

impl RangeRequest {
    pub fn params(&self) -> RangeParams {
        RangeParams {
            since: self.since.clone(),
            until: self.until.clone(),
            lookback_days: self.lookback_days,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AdWeeksRequest {
    #[serde(flatten)]
    pub range: RangeRequest,
    /// Defaults to true; `false` reads the stored facts without rebuilding.
    pub rebuild: Option<bool>,
    pub cohort_week: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CohortSummaryRequest {
    pub cohort_week: String,
    pub week_offset: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct SettingsPutRequest {
    pub campaign_filter: Option<String>,
    pub lookback_days: Option<u32>,
}
