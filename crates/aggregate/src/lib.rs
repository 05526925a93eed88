//! Launch-relative cohort aggregation for daily ad performance rows.
//!
//! Rows flow through two stages: windowing (launch date, cohort key and week
//! offset per row) and scoring (per ad-week sums, efficiency ratio, hit flags).
//! Everything here is pure and deterministic for a given set of rows.

mod dims;
mod pipeline;
mod score;
mod summary;
mod timer;
mod types;
mod window;

pub use dims::launch_dimensions;
pub use pipeline::{build_ad_weeks, build_ad_weeks_from_raw};
pub use score::{AdWeekBucket, aggregate_buckets, apply_sticky_hits, efficiency_ratio};
pub use summary::{cohort_grid, summarize_cohort_week};
pub use timer::StageTimer;
pub use types::{BuildStats, CohortBuild, CohortError, Result};
pub use window::{WindowedRecord, cohort_key, launch_dates, week_offset, window_records};
