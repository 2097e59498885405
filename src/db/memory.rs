use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::ProgressLogStore;
use crate::error::AppResult;
use crate::models::goal::{GoalDefaults, UserGoal};
use crate::models::progress_log::{NewProgressLog, ProgressLog, SortOrder};
use crate::models::user::ClientSummary;

/// In-process store for tests.
#[derive(Default)]
pub struct MemoryStore {
    logs: Mutex<Vec<ProgressLog>>,
    goals: Mutex<Vec<UserGoal>>,
    clients: Vec<ClientSummary>,
}

impl MemoryStore {
    pub fn with_clients(clients: Vec<ClientSummary>) -> Self {
        Self {
            clients,
            ..Default::default()
        }
    }

    pub async fn push_goal(&self, goal: UserGoal) {
        self.goals.lock().await.push(goal);
    }
}

#[async_trait]
impl ProgressLogStore for MemoryStore {
    async fn insert_log(&self, user_id: Uuid, log: &NewProgressLog) -> AppResult<()> {
        self.logs.lock().await.push(ProgressLog {
            id: Uuid::new_v4(),
            user_id,
            weight: log.weight,
            body_fat: log.body_fat,
            calories_intake: log.calories_intake,
            protein_intake: log.protein_intake,
            workout_completed: log.workout_completed,
            workout_type: log.workout_type.clone(),
            strength_bench: log.strength_bench,
            strength_squat: log.strength_squat,
            strength_deadlift: log.strength_deadlift,
            sleep_hours: log.sleep_hours,
            water_intake: log.water_intake,
            created_at: log.created_at,
        });
        Ok(())
    }

    async fn query_logs(
        &self,
        user_id: Uuid,
        order: SortOrder,
        limit: Option<i64>,
    ) -> AppResult<Vec<ProgressLog>> {
        let mut logs: Vec<ProgressLog> = self
            .logs
            .lock()
            .await
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();

        // Stable, so same-timestamp logs keep insertion order.
        logs.sort_by_key(|l| l.created_at);
        if order == SortOrder::Desc {
            logs.reverse();
        }
        if let Some(limit) = limit {
            logs.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(logs)
    }

    async fn latest_goal(&self, user_id: Uuid) -> AppResult<Option<UserGoal>> {
        let goals = self.goals.lock().await;
        Ok(goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .max_by_key(|g| g.created_at)
            .cloned())
    }

    async fn insert_goal(&self, user_id: Uuid, defaults: &GoalDefaults) -> AppResult<UserGoal> {
        let goal = UserGoal {
            id: Uuid::new_v4(),
            user_id,
            target_weight: defaults.target_weight,
            target_body_fat: defaults.target_body_fat,
            weekly_workout_target: defaults.weekly_workout_target,
            created_at: Utc::now(),
        };
        self.goals.lock().await.push(goal.clone());
        Ok(goal)
    }

    async fn list_clients(&self) -> AppResult<Vec<ClientSummary>> {
        Ok(self.clients.clone())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
