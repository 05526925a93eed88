use chrono::{Duration, Local, NaiveDate};
use cohort_core::{DateRange, parse_record_date};

use crate::config::RangeParams;
use crate::error::{AppError, Result};

/// Upper bound for a stored lookback (about a century).
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    parse_record_date(value)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid date: {}", value)))
}

/// Resolves `params` against the local calendar date.
pub fn resolve_date_range(params: &RangeParams, default_lookback_days: u32) -> Result<DateRange> {
    resolve_date_range_at(params, default_lookback_days, Local::now().date_naive())
}

/// Inclusive window ending at `until` (default `today`). Without `since`, the
/// window starts `lookback_days` before its end.
pub fn resolve_date_range_at(
    params: &RangeParams,
    default_lookback_days: u32,
    today: NaiveDate,
) -> Result<DateRange> {
    let until = match params.until.as_deref() {
        Some(value) => parse_iso_date(value)?,
        None => today,
    };
    let since = match params.since.as_deref() {
        Some(value) => parse_iso_date(value)?,
        None => {
            let days = params.lookback_days.unwrap_or(default_lookback_days);
            if days == 0 {
                return Err(AppError::InvalidInput(
                    "lookback_days must be at least 1".to_string(),
                ));
            }
            until
                .checked_sub_signed(Duration::days(i64::from(days)))
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "lookback_days {} reaches past the earliest supported date",
                        days
                    ))
                })?
        }
    };
    if since > until {
        return Err(AppError::InvalidInput(format!(
            "since {} is after until {}",
            since, until
        )));
    }
    Ok(DateRange { since, until })
}
