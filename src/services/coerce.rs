//! Lenient coercion of raw write-path fields.
//!
//! Numbers may arrive as JSON numbers or numeric strings. Anything that does
//! not parse becomes `None`; plausibility is not checked here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde_json::Value;

use super::day::DayBoundary;
use crate::models::progress_log::{NewProgressLog, ProgressInput};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn decimal(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Whole-number field; fractional input is truncated toward zero.
pub fn integer(value: Option<&Value>) -> Option<i32> {
    let parsed = match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    parsed.and_then(|v| i32::try_from(v).ok())
}

/// Checkbox-style flag. Form values such as `"false"`, `"off"` and `"0"`
/// count as unchecked.
pub fn flag(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => {
            let s = s.trim().to_ascii_lowercase();
            !matches!(s.as_str(), "" | "false" | "0" | "off" | "no")
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Accepts RFC 3339, naive date-times and bare dates. Naive values are read
/// in the configured day boundary. The result is truncated to whole seconds.
pub fn log_timestamp(value: Option<&Value>, boundary: &DayBoundary) -> Option<DateTime<Utc>> {
    let raw = match value? {
        Value::String(s) => s.trim(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .and_then(|naive| boundary.localize(naive))
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|day| boundary.start_of(day))
        })?;

    parsed.with_nanosecond(0)
}

fn text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn new_progress_log(
    input: &ProgressInput,
    boundary: &DayBoundary,
    now: DateTime<Utc>,
) -> NewProgressLog {
    let created_at = log_timestamp(input.log_date.as_ref(), boundary)
        .or_else(|| now.with_nanosecond(0))
        .unwrap_or(now);

    NewProgressLog {
        weight: decimal(input.weight.as_ref()),
        body_fat: decimal(input.body_fat.as_ref()),
        calories_intake: integer(input.calories_intake.as_ref()),
        protein_intake: integer(input.protein_intake.as_ref()),
        workout_completed: flag(input.workout_completed.as_ref()),
        workout_type: text(input.workout_type.as_ref()),
        strength_bench: decimal(input.strength_bench.as_ref()),
        strength_squat: decimal(input.strength_squat.as_ref()),
        strength_deadlift: decimal(input.strength_deadlift.as_ref()),
        sleep_hours: decimal(input.sleep_hours.as_ref()),
        water_intake: decimal(input.water_intake.as_ref()),
        created_at,
    }
}
