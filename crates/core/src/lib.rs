use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_HIT_MIN_PURCHASES: u64 = 10;
pub const DEFAULT_HIT_MIN_ROAS: f64 = 1.4;
pub const DEFAULT_WINDOW_DAYS: u32 = 28;
pub const DEFAULT_WEEK_COUNT: u32 = 4;
pub const DAYS_PER_WEEK: i64 = 7;

/// Thresholds and window sizes used when scoring cohorts.
///
/// The aggregator never reads these from the environment; callers pass them in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortPolicy {
    pub hit_min_purchases: u64,
    pub hit_min_roas: f64,
    pub window_days: u32,
    pub week_count: u32,
}

impl Default for CohortPolicy {
    fn default() -> Self {
        Self {
            hit_min_purchases: DEFAULT_HIT_MIN_PURCHASES,
            hit_min_roas: DEFAULT_HIT_MIN_ROAS,
            window_days: DEFAULT_WINDOW_DAYS,
            week_count: DEFAULT_WEEK_COUNT,
        }
    }
}

impl CohortPolicy {
    pub fn is_hit(&self, purchases: u64, roas: f64) -> bool {
        purchases >= self.hit_min_purchases && roas >= self.hit_min_roas
    }
}

/// A daily row as received from a producer, before numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDailyRecord {
    pub ad_id: String,
    #[serde(default)]
    pub ad_name: Option<String>,
    #[serde(default)]
    pub adset_id: Option<String>,
    #[serde(default)]
    pub adset_name: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub campaign_name: Option<String>,
    pub date_start: String,
    #[serde(default)]
    pub impressions: Option<Value>,
    #[serde(default)]
    pub spend: Option<Value>,
    #[serde(default)]
    pub purchases: Option<Value>,
    #[serde(default)]
    pub revenue: Option<Value>,
}

impl RawDailyRecord {
    /// Coerces numeric fields to their zero value when missing or unparseable.
    /// Returns `None` only when the date itself cannot be read.
    pub fn normalize(&self) -> Option<DailyRecord> {
        let date = parse_record_date(&self.date_start)?;
        Some(DailyRecord {
            ad_id: self.ad_id.clone(),
            ad_name: self.ad_name.clone(),
            adset_id: self.adset_id.clone(),
            adset_name: self.adset_name.clone(),
            campaign_id: self.campaign_id.clone(),
            campaign_name: self.campaign_name.clone(),
            date,
            impressions: coerce_count(self.impressions.as_ref()),
            spend: coerce_amount(self.spend.as_ref()),
            purchases: coerce_count(self.purchases.as_ref()),
            revenue: coerce_amount(self.revenue.as_ref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub ad_id: String,
    pub ad_name: Option<String>,
    pub adset_id: Option<String>,
    pub adset_name: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
    pub date: NaiveDate,
    pub impressions: u64,
    pub spend: f64,
    pub purchases: u64,
    pub revenue: f64,
}

/// Names and identifiers frozen on an ad's launch date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDimension {
    pub ad_id: String,
    pub ad_name_at_launch: Option<String>,
    pub adset_id: Option<String>,
    pub adset_name_at_launch: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name_at_launch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdWeekFact {
    pub cohort_week: NaiveDate,
    pub week_offset: u32,
    pub ad_id: String,
    pub ad_name_at_launch: Option<String>,
    pub adset_id: Option<String>,
    pub adset_name_at_launch: Option<String>,
    pub campaign_id: Option<String>,
    pub campaign_name_at_launch: Option<String>,
    pub spend: f64,
    pub purchases: u64,
    pub revenue: f64,
    pub roas: f64,
    #[serde(with = "flag")]
    pub hit_bucket: bool,
    #[serde(with = "flag")]
    pub hit_cum: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortWeekSummary {
    pub cohort_week: NaiveDate,
    pub week_offset: u32,
    pub total_ads: u64,
    pub week_hit_pct: f64,
    pub spend_sum: f64,
    pub purchases_sum: u64,
    pub revenue_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortGridCell {
    pub week_offset: u32,
    pub hits: u64,
    pub hit_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortGridRow {
    pub cohort_week: NaiveDate,
    pub total_ads: u64,
    pub weeks: Vec<CohortGridCell>,
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

/// Serializes hit flags as 0/1 and accepts either 0/1 or booleans back.
pub mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Int(u64),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bool(value) => value,
            Repr::Int(value) => value != 0,
        })
    }
}

fn numeric_value(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Counts degrade to 0 when missing, unparseable, non-finite or negative.
/// Fractional values are truncated and huge ones capped at `i64::MAX`.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match numeric_value(value) {
        Some(parsed) if parsed >= 0.0 => (parsed.trunc() as u64).min(i64::MAX as u64),
        _ => 0,
    }
}

/// Currency amounts degrade to 0.0 when missing, unparseable, non-finite or negative.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    match numeric_value(value) {
        Some(parsed) if parsed >= 0.0 => parsed,
        _ => 0.0,
    }
}

/// Accepts `YYYY-MM-DD` and timestamps that start with one.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    let prefix = trimmed.get(..10)?;
    let rest = &trimmed[10..];
    if !(rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
