use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const MAX_WORKOUT_TYPE_LEN: usize = 100;

/// One immutable self-reported entry. Several may share a calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ProgressLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub calories_intake: Option<i32>,
    pub protein_intake: Option<i32>,
    pub workout_completed: bool,
    pub workout_type: Option<String>,
    pub strength_bench: Option<f64>,
    pub strength_squat: Option<f64>,
    pub strength_deadlift: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ProgressLog {
    pub fn has_strength(&self) -> bool {
        self.strength_bench.is_some()
            || self.strength_squat.is_some()
            || self.strength_deadlift.is_some()
    }
}

/// Fully coerced log ready to be appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProgressLog {
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub calories_intake: Option<i32>,
    pub protein_intake: Option<i32>,
    pub workout_completed: bool,
    pub workout_type: Option<String>,
    pub strength_bench: Option<f64>,
    pub strength_squat: Option<f64>,
    pub strength_deadlift: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// POST /api/progress body. Numeric fields arrive as loosely-typed JSON
/// (forms post strings) and are coerced rather than rejected.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProgressInput {
    #[serde(default)]
    pub log_date: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub body_fat: Option<Value>,
    #[serde(default)]
    pub calories_intake: Option<Value>,
    #[serde(default)]
    pub protein_intake: Option<Value>,
    #[serde(default)]
    pub workout_completed: Option<Value>,
    #[serde(default)]
    #[validate(custom = "validate_workout_type")]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub strength_bench: Option<Value>,
    #[serde(default)]
    pub strength_squat: Option<Value>,
    #[serde(default)]
    pub strength_deadlift: Option<Value>,
    #[serde(default)]
    pub sleep_hours: Option<Value>,
    #[serde(default)]
    pub water_intake: Option<Value>,
}

/// Length limit applies after trimming, matching how the value is stored.
fn validate_workout_type(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() > MAX_WORKOUT_TYPE_LEN {
        let mut err = ValidationError::new("length");
        err.message = Some("workout_type must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
