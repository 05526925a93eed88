use cohort_core::{AdWeekFact, LaunchDimension};
use serde::Serialize;

/// Errors emitted by a cohort build. Any of these aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum CohortError {
    #[error("no data: the input record set is empty")]
    NoData,
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, CohortError>;

/// Counters describing one build, mostly useful for logs and API responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub input_records: usize,
    pub ads_seen: usize,
    pub ads_launched: usize,
    pub ads_without_launch: usize,
    pub records_in_window: usize,
    pub buckets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortBuild {
    pub facts: Vec<AdWeekFact>,
    pub dimensions: Vec<LaunchDimension>,
    pub stats: BuildStats,
}
