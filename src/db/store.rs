use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::goal::{GoalDefaults, UserGoal};
use crate::models::progress_log::{NewProgressLog, ProgressLog, SortOrder};
use crate::models::user::{ClientRow, ClientSummary};

/// Append-only log and goal storage the analytics read from.
#[async_trait]
pub trait ProgressLogStore: Send + Sync {
    async fn insert_log(&self, user_id: Uuid, log: &NewProgressLog) -> AppResult<()>;

    /// Logs ordered by `created_at`, then insertion order. `None` means no limit.
    async fn query_logs(
        &self,
        user_id: Uuid,
        order: SortOrder,
        limit: Option<i64>,
    ) -> AppResult<Vec<ProgressLog>>;

    /// Most recently created goal row, if any.
    async fn latest_goal(&self, user_id: Uuid) -> AppResult<Option<UserGoal>>;

    async fn insert_goal(&self, user_id: Uuid, defaults: &GoalDefaults) -> AppResult<UserGoal>;

    /// Approved accounts with the `user` role.
    async fn list_clients(&self) -> AppResult<Vec<ClientSummary>>;

    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressLogStore for PgProgressStore {
    async fn insert_log(&self, user_id: Uuid, log: &NewProgressLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO progress_logs (
                id, user_id, weight, body_fat, calories_intake, protein_intake,
                workout_completed, workout_type, strength_bench, strength_squat,
                strength_deadlift, sleep_hours, water_intake, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(log.weight)
        .bind(log.body_fat)
        .bind(log.calories_intake)
        .bind(log.protein_intake)
        .bind(log.workout_completed)
        .bind(&log.workout_type)
        .bind(log.strength_bench)
        .bind(log.strength_squat)
        .bind(log.strength_deadlift)
        .bind(log.sleep_hours)
        .bind(log.water_intake)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query_logs(
        &self,
        user_id: Uuid,
        order: SortOrder,
        limit: Option<i64>,
    ) -> AppResult<Vec<ProgressLog>> {
        let direction = order.as_sql();
        let sql = format!(
            "SELECT * FROM progress_logs WHERE user_id = $1 \
             ORDER BY created_at {direction}, seq {direction} LIMIT $2"
        );

        // LIMIT NULL is treated as no limit by Postgres.
        let logs = sqlx::query_as::<_, ProgressLog>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(logs)
    }

    async fn latest_goal(&self, user_id: Uuid) -> AppResult<Option<UserGoal>> {
        let goal = sqlx::query_as::<_, UserGoal>(
            "SELECT * FROM user_goals WHERE user_id = $1 ORDER BY created_at DESC, seq DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(goal)
    }

    async fn insert_goal(&self, user_id: Uuid, defaults: &GoalDefaults) -> AppResult<UserGoal> {
        let goal = sqlx::query_as::<_, UserGoal>(
            r#"
            INSERT INTO user_goals (id, user_id, target_weight, target_body_fat, weekly_workout_target)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(defaults.target_weight)
        .bind(defaults.target_body_fat)
        .bind(defaults.weekly_workout_target)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    async fn list_clients(&self) -> AppResult<Vec<ClientSummary>> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, first_name, last_name, email FROM users
            WHERE role = 'user' AND (approval_status IS NULL OR approval_status = 'approved')
            ORDER BY first_name, last_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClientSummary::from).collect())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
