use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::day::DayBoundary;
use crate::models::progress_log::ProgressLog;

/// Collapses logs into one flag per calendar day: `true` when any log on
/// that day has a completed workout.
pub fn day_buckets(logs: &[ProgressLog], boundary: &DayBoundary) -> BTreeMap<NaiveDate, bool> {
    let mut buckets = BTreeMap::new();
    for log in logs {
        let done = buckets.entry(boundary.day_of(log.created_at)).or_insert(false);
        *done |= log.workout_completed;
    }
    buckets
}

/// Consecutive completed-workout days ending today or yesterday.
///
/// A run that ended two or more days ago is not live and counts as 0. Logged
/// days with no completed workout break the chain just like missing days.
pub fn current_streak(logs: &[ProgressLog], boundary: &DayBoundary, now: DateTime<Utc>) -> i32 {
    let buckets = day_buckets(logs, boundary);
    let today = boundary.day_of(now);

    let mut streak = 0;
    let mut previous = today;
    for (day, completed) in buckets.iter().rev() {
        if !completed {
            break;
        }
        // The first gap is measured from today, later ones from the day before.
        if (previous - *day).num_days() > 1 {
            break;
        }
        previous = *day;
        streak += 1;
    }
    streak
}
