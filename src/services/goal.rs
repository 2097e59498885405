use uuid::Uuid;

use super::round1;
use crate::db::store::ProgressLogStore;
use crate::error::AppResult;
use crate::models::goal::{GoalDefaults, UserGoal};
use crate::models::progress_log::ProgressLog;

/// A start weight this close to the target counts as already reached.
const TARGET_EPSILON: f64 = 0.01;

/// Earliest and latest recorded weights in an ascending log series.
pub fn weight_endpoints(logs_asc: &[ProgressLog]) -> (Option<f64>, Option<f64>) {
    let mut weights = logs_asc.iter().filter_map(|l| l.weight);
    let start = weights.next();
    let current = weights.last().or(start);
    (start, current)
}

/// Progress from the first recorded weight toward the goal's target weight,
/// clamped to 0..=100 and rounded to one decimal.
pub fn goal_completion_percent(
    goal: Option<&UserGoal>,
    start_weight: Option<f64>,
    current_weight: Option<f64>,
) -> Option<f64> {
    let target = goal?.target_weight?;
    let start = start_weight?;
    let current = current_weight?;

    let denom = start - target;
    if denom.abs() < TARGET_EPSILON {
        return Some(100.0);
    }
    let pct = (start - current) / denom * 100.0;
    Some(round1(pct.clamp(0.0, 100.0)))
}

/// Returns the user's most recent goal, creating one from `defaults` when
/// none exists yet.
pub async fn get_or_create_goals(
    store: &dyn ProgressLogStore,
    user_id: Uuid,
    defaults: &GoalDefaults,
) -> AppResult<UserGoal> {
    if let Some(goal) = store.latest_goal(user_id).await? {
        return Ok(goal);
    }
    tracing::info!(user_id = %user_id, "Creating initial goal snapshot");
    store.insert_goal(user_id, defaults).await
}
