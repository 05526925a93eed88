use chrono::{NaiveDate, SecondsFormat, Utc};
use cohort_app::{AppError, Result, SettingsUpdate, parse_iso_date};
use cohort_core::{CohortGridRow, CohortWeekSummary, DateRange};
use ingest::IngestStats;

use crate::{
    AdWeeksRequest, AdWeeksResponse, AppContext, BuildResponse, CohortSummaryRequest, OkResponse,
    RangeRequest, SettingsPutRequest, SettingsResponse,
};

fn resolve_range(ctx: &AppContext, req: &RangeRequest) -> Result<DateRange> {
    ctx.app_state.services.cohorts.resolve_range(&req.params())
}

fn parse_cohort_week(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value.map(parse_iso_date).transpose()
}

pub fn ad_weeks(ctx: &AppContext, req: AdWeeksRequest) -> Result<AdWeeksResponse> {
    let cohort_week = parse_cohort_week(req.cohort_week.as_deref())?;
    let rows = if req.rebuild.unwrap_or(true) {
        let range = resolve_range(ctx, &req.range)?;
        let build = ctx.app_state.services.cohorts.build(&range)?;
        build
            .facts
            .into_iter()
            .filter(|fact| cohort_week.is_none_or(|week| fact.cohort_week == week))
            .collect()
    } else {
        ctx.app_state.services.cohorts.facts(cohort_week)?
    };
    Ok(AdWeeksResponse {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        count: rows.len(),
        rows,
    })
}

pub fn build(ctx: &AppContext, req: RangeRequest) -> Result<BuildResponse> {
    let range = resolve_range(ctx, &req)?;
    let build = ctx.app_state.services.cohorts.build(&range)?;
    Ok(BuildResponse {
        range,
        facts: build.facts.len(),
        dimensions: build.dimensions.len(),
        ads_dropped: build.stats.ads_without_launch,
        stats: build.stats,
    })
}

pub fn cohort_summary(ctx: &AppContext, req: CohortSummaryRequest) -> Result<CohortWeekSummary> {
    let cohort_week = parse_iso_date(&req.cohort_week)?;
    ctx.app_state
        .services
        .cohorts
        .summary(cohort_week, req.week_offset)
}

pub fn cohort_grid(ctx: &AppContext) -> Result<Vec<CohortGridRow>> {
    ctx.app_state.services.cohorts.grid()
}

pub fn settings_get(ctx: &AppContext) -> Result<SettingsResponse> {
    let snapshot = ctx.app_state.services.settings.get()?;
    Ok(SettingsResponse {
        campaign_filter: snapshot.campaign_filter,
        lookback_days: snapshot.lookback_days,
        policy: snapshot.policy,
        import_dir: snapshot.import_dir,
        db_path: ctx.app_state.config.db_path.to_string_lossy().to_string(),
        app_data_dir: ctx.app_data_dir.to_string_lossy().to_string(),
    })
}

pub fn settings_put(ctx: &AppContext, req: SettingsPutRequest) -> Result<SettingsResponse> {
    if req.campaign_filter.is_none() && req.lookback_days.is_none() {
        return Err(AppError::InvalidInput("nothing to update".to_string()));
    }
    ctx.app_state.services.settings.update(&SettingsUpdate {
        campaign_filter: req.campaign_filter,
        lookback_days: req.lookback_days,
    })?;
    settings_get(ctx)
}

pub fn ingest(ctx: &AppContext) -> Result<IngestStats> {
    ctx.app_state.services.ingest.run()
}

pub fn ok() -> OkResponse {
    OkResponse { ok: true }
}
