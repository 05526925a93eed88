use cohort_core::{DailyRecord, coerce_amount, coerce_count, parse_record_date};
use serde_json::Value;

use crate::types::ParsedRows;

const PURCHASE_MARKER: &str = "purchase";

fn is_purchase_action(entry: &Value) -> bool {
    entry
        .get("action_type")
        .and_then(|value| value.as_str())
        .is_some_and(|kind| kind.to_ascii_lowercase().contains(PURCHASE_MARKER))
}

fn purchase_entries(actions: Option<&Value>) -> impl Iterator<Item = &Value> {
    actions
        .and_then(|value| value.as_array())
        .into_iter()
        .flatten()
        .filter(|entry| is_purchase_action(entry))
}

/// Sum of `value` over purchase-like entries of an ads-API `actions` array.
/// Each value is truncated before summing; unreadable values count as zero.
pub fn purchase_count_from_actions(actions: Option<&Value>) -> u64 {
    purchase_entries(actions)
        .map(|entry| coerce_count(entry.get("value")))
        .fold(0u64, u64::saturating_add)
}

/// Sum of `value` over purchase-like entries of an `action_values` array.
pub fn purchase_value_from_actions(action_values: Option<&Value>) -> f64 {
    purchase_entries(action_values)
        .map(|entry| coerce_amount(entry.get("value")))
        .sum()
}

fn text_field(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn present<'a>(row: &'a Value, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|value| !value.is_null())
}

/// Reads one insight row. Accepts normalized rows (`purchases`, `revenue`)
/// and raw ads-API rows (`actions`, `action_values`); an explicit field wins.
/// Returns `None` when the ad id or the date is unusable.
pub fn daily_record_from_value(row: &Value) -> Option<DailyRecord> {
    let ad_id = text_field(row, "ad_id")?;
    let date = parse_record_date(row.get("date_start")?.as_str()?)?;
    let purchases = match present(row, "purchases") {
        Some(value) => coerce_count(Some(value)),
        None => purchase_count_from_actions(row.get("actions")),
    };
    let revenue = match present(row, "revenue") {
        Some(value) => coerce_amount(Some(value)),
        None => purchase_value_from_actions(row.get("action_values")),
    };
    Some(DailyRecord {
        ad_id,
        ad_name: text_field(row, "ad_name"),
        adset_id: text_field(row, "adset_id"),
        adset_name: text_field(row, "adset_name"),
        campaign_id: text_field(row, "campaign_id"),
        campaign_name: text_field(row, "campaign_name"),
        date,
        impressions: coerce_count(row.get("impressions")),
        spend: coerce_amount(row.get("spend")),
        purchases,
        revenue,
    })
}

fn collect_rows<'a>(rows: impl Iterator<Item = &'a Value>) -> ParsedRows {
    let mut parsed = ParsedRows::default();
    for row in rows {
        match daily_record_from_value(row) {
            Some(record) => parsed.records.push(record),
            None => parsed.skipped += 1,
        }
    }
    parsed
}

/// Parses a `.json` document: an array of rows, an ads-API page
/// (`{"data": [...]}`), or a single row object.
pub fn records_from_json(text: &str) -> Result<ParsedRows, serde_json::Error> {
    let document: Value = serde_json::from_str(text)?;
    let parsed = match &document {
        Value::Array(rows) => collect_rows(rows.iter()),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(rows)) => collect_rows(rows.iter()),
            _ => collect_rows(std::iter::once(&document)),
        },
        _ => ParsedRows {
            records: Vec::new(),
            skipped: 1,
        },
    };
    Ok(parsed)
}

/// Parses newline-delimited rows. Blank lines are ignored; lines that are not
/// JSON objects count as skipped rows.
pub fn records_from_lines(text: &str) -> ParsedRows {
    let mut parsed = ParsedRows::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str::<Value>(line)
            .ok()
            .filter(|value| value.is_object())
            .and_then(|value| daily_record_from_value(&value));
        match record {
            Some(record) => parsed.records.push(record),
            None => parsed.skipped += 1,
        }
    }
    parsed
}
