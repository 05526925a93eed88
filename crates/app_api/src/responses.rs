use aggregate::BuildStats;
use cohort_core::{AdWeekFact, CohortPolicy, DateRange};
use serde::Serialize;

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct AdWeeksResponse {
    pub generated_at: String,
    pub count: usize,
    pub rows: Vec<AdWeekFact>,
}

#[derive(Serialize)]
pub struct BuildResponse {
    pub range: DateRange,
    pub facts: usize,
    pub dimensions: usize,
    pub ads_dropped: usize,
    pub stats: BuildStats,
}

#[derive(Serialize)]
pub struct SettingsResponse {
    pub campaign_filter: Option<String>,
    pub lookback_days: u32,
    pub policy: CohortPolicy,
    pub import_dir: String,
    pub db_path: String,
    pub app_data_dir: String,
}
