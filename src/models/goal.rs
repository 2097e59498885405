use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A target snapshot. Only the most recently created row per user counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct UserGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_weight: Option<f64>,
    pub target_body_fat: Option<f64>,
    pub weekly_workout_target: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Values used when a user has no goal yet. Each one may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalDefaults {
    pub target_weight: Option<f64>,
    pub target_body_fat: Option<f64>,
    pub weekly_workout_target: Option<i32>,
}
