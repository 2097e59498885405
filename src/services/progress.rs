//! Progress aggregation for the user dashboard and the admin rollup.
//!
//! Every view is recomputed from stored history on each call; nothing here
//! caches derived values.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::day::DayBoundary;
use super::{coerce, goal, insight, round1, streak};
use crate::db::store::ProgressLogStore;
use crate::error::AppResult;
use crate::models::progress_log::{ProgressInput, ProgressLog, SortOrder};

const TRAILING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressWithMeta {
    pub logs: Vec<ProgressLog>,
    pub streak: i32,
    pub goal_completion_percent: Option<f64>,
    pub insights: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserProgress {
    pub current_weight: Option<f64>,
    pub weight_change_percent: Option<f64>,
    pub strength_growth_percent: Option<f64>,
    pub workout_consistency_percent: f64,
    pub active_streak: i32,
    pub goal_completion_percent: Option<f64>,
    pub average_calories: Option<i64>,
    pub average_sleep: Option<f64>,
    pub insights: Vec<String>,
    pub logs: Vec<ProgressLog>,
}

#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn ProgressLogStore>,
    boundary: DayBoundary,
    log_limit: i64,
}

impl ProgressService {
    pub fn new(store: Arc<dyn ProgressLogStore>, boundary: DayBoundary, log_limit: i64) -> Self {
        Self {
            store,
            boundary,
            log_limit,
        }
    }

    pub fn store(&self) -> &dyn ProgressLogStore {
        self.store.as_ref()
    }

    pub async fn insert_progress(&self, user_id: Uuid, input: &ProgressInput) -> AppResult<()> {
        let log = coerce::new_progress_log(input, &self.boundary, Utc::now());
        self.store.insert_log(user_id, &log).await?;
        tracing::info!(
            user_id = %user_id,
            created_at = %log.created_at,
            workout_completed = log.workout_completed,
            "Progress log recorded"
        );
        Ok(())
    }

    pub async fn get_progress_with_meta(&self, user_id: Uuid) -> AppResult<ProgressWithMeta> {
        self.progress_with_meta_at(user_id, Utc::now()).await
    }

    pub async fn get_admin_user_progress(&self, user_id: Uuid) -> AppResult<AdminUserProgress> {
        self.admin_user_progress_at(user_id, Utc::now()).await
    }

    pub(crate) async fn progress_with_meta_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<ProgressWithMeta> {
        let logs = self
            .store
            .query_logs(user_id, SortOrder::Desc, Some(self.log_limit))
            .await?;
        let history = self.store.query_logs(user_id, SortOrder::Asc, None).await?;

        let streak = streak::current_streak(&history, &self.boundary, now);
        let goal_completion_percent = self.goal_completion(user_id, &history).await?;
        let insights = insight::insights(&history);

        tracing::debug!(
            user_id = %user_id,
            logs = history.len(),
            streak,
            "Computed progress summary"
        );

        Ok(ProgressWithMeta {
            logs,
            streak,
            goal_completion_percent,
            insights,
        })
    }

    pub(crate) async fn admin_user_progress_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<AdminUserProgress> {
        let logs = self.store.query_logs(user_id, SortOrder::Asc, None).await?;

        let active_streak = streak::current_streak(&logs, &self.boundary, now);
        let goal_completion_percent = self.goal_completion(user_id, &logs).await?;
        let insights = insight::insights(&logs);

        let current_weight = logs.iter().rev().find_map(|l| l.weight);
        let weight_change_percent = weight_change_percent(&logs, current_weight, now);

        tracing::debug!(user_id = %user_id, logs = logs.len(), "Computed admin rollup");

        Ok(AdminUserProgress {
            current_weight,
            weight_change_percent,
            strength_growth_percent: insight::strength_growth_percent(&logs).map(round1),
            workout_consistency_percent: insight::consistency_percent(&logs)
                .map(round1)
                .unwrap_or(0.0),
            active_streak,
            goal_completion_percent,
            average_calories: mean(logs.iter().filter_map(|l| l.calories_intake).map(f64::from))
                .map(|avg| avg.round() as i64),
            average_sleep: mean(logs.iter().filter_map(|l| l.sleep_hours)).map(round1),
            insights,
            logs,
        })
    }

    async fn goal_completion(&self, user_id: Uuid, logs_asc: &[ProgressLog]) -> AppResult<Option<f64>> {
        let goal = self.store.latest_goal(user_id).await?;
        let (start, current) = goal::weight_endpoints(logs_asc);
        Ok(goal::goal_completion_percent(goal.as_ref(), start, current))
    }
}

/// Percent change from the last weight recorded on or before the start of the
/// trailing window to `current`. Requires some activity inside the window.
fn weight_change_percent(
    logs_asc: &[ProgressLog],
    current: Option<f64>,
    now: DateTime<Utc>,
) -> Option<f64> {
    let cutoff = now - Duration::days(TRAILING_WINDOW_DAYS);
    if !logs_asc.iter().any(|l| l.created_at >= cutoff) {
        return None;
    }

    let current = current?;
    let past = logs_asc
        .iter()
        .rev()
        .filter(|l| l.created_at <= cutoff)
        .find_map(|l| l.weight)?;
    if past == 0.0 {
        return None;
    }
    Some(round1((current - past) / past * 100.0))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::goal::UserGoal;
    use crate::models::progress_log::NewProgressLog;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 30, 12, 0, 0).unwrap()
    }

    fn service() -> (Arc<MemoryStore>, ProgressService) {
        let store = Arc::new(MemoryStore::default());
        let service = ProgressService::new(store.clone(), DayBoundary::utc(), 365);
        (store, service)
    }

    fn entry(days_ago: i64) -> NewProgressLog {
        NewProgressLog {
            created_at: now() - Duration::days(days_ago),
            ..Default::default()
        }
    }

    async fn seed(store: &MemoryStore, user: Uuid, logs: Vec<NewProgressLog>) {
        for log in logs {
            store.insert_log(user, &log).await.unwrap();
        }
    }

    async fn set_goal(store: &MemoryStore, user: Uuid, target_weight: f64) {
        store
            .push_goal(UserGoal {
                id: Uuid::new_v4(),
                user_id: user,
                target_weight: Some(target_weight),
                target_body_fat: None,
                weekly_workout_target: Some(4),
                created_at: now() - Duration::days(90),
            })
            .await;
    }

    #[tokio::test]
    async fn empty_history_user_view() {
        let (_, service) = service();
        let view = service
            .progress_with_meta_at(Uuid::new_v4(), now())
            .await
            .unwrap();

        assert!(view.logs.is_empty());
        assert_eq!(view.streak, 0);
        assert_eq!(view.goal_completion_percent, None);
        assert!(view.insights.is_empty());
    }

    #[tokio::test]
    async fn user_view_combines_streak_goal_and_insights() {
        let (store, service) = service();
        let user = Uuid::new_v4();
        set_goal(&store, user, 70.0).await;
        seed(
            &store,
            user,
            vec![
                NewProgressLog {
                    weight: Some(75.0),
                    workout_completed: true,
                    ..entry(0)
                },
                NewProgressLog {
                    workout_completed: true,
                    ..entry(1)
                },
                NewProgressLog {
                    weight: Some(80.0),
                    workout_completed: true,
                    ..entry(2)
                },
            ],
        )
        .await;

        let view = service.progress_with_meta_at(user, now()).await.unwrap();
        assert_eq!(view.streak, 3);
        assert_eq!(view.goal_completion_percent, Some(50.0));
        assert!(view.insights.is_empty());
        assert_eq!(view.logs.first().and_then(|l| l.weight), Some(75.0));
    }

    #[tokio::test]
    async fn newest_goal_wins() {
        let (store, service) = service();
        let user = Uuid::new_v4();
        set_goal(&store, user, 70.0).await;
        store
            .push_goal(UserGoal {
                id: Uuid::new_v4(),
                user_id: user,
                target_weight: Some(60.0),
                target_body_fat: None,
                weekly_workout_target: None,
                created_at: now() - Duration::days(1),
            })
            .await;
        seed(
            &store,
            user,
            vec![
                NewProgressLog {
                    weight: Some(80.0),
                    ..entry(20)
                },
                NewProgressLog {
                    weight: Some(75.0),
                    ..entry(0)
                },
            ],
        )
        .await;

        let view = service.progress_with_meta_at(user, now()).await.unwrap();
        assert_eq!(view.goal_completion_percent, Some(25.0));
    }

    #[tokio::test]
    async fn user_view_caps_log_list_but_not_analytics() {
        let store = Arc::new(MemoryStore::default());
        let service = ProgressService::new(store.clone(), DayBoundary::utc(), 2);
        let user = Uuid::new_v4();
        seed(
            &store,
            user,
            (0..4)
                .map(|d| NewProgressLog {
                    workout_completed: true,
                    ..entry(d)
                })
                .collect(),
        )
        .await;

        let view = service.progress_with_meta_at(user, now()).await.unwrap();
        assert_eq!(view.logs.len(), 2);
        assert!(view.logs[0].created_at > view.logs[1].created_at);
        assert_eq!(view.streak, 4);
    }

    #[tokio::test]
    async fn insert_progress_is_visible_to_reads() {
        let (_, service) = service();
        let user = Uuid::new_v4();
        let input = ProgressInput {
            log_date: Some(json!("2026-06-29")),
            weight: Some(json!("81.4")),
            calories_intake: Some(json!(2100)),
            workout_completed: Some(json!(true)),
            workout_type: Some("Upper".to_string()),
            ..Default::default()
        };
        service.insert_progress(user, &input).await.unwrap();

        let logs = service
            .store()
            .query_logs(user, SortOrder::Asc, None)
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].weight, Some(81.4));
        assert_eq!(logs[0].calories_intake, Some(2100));
        assert_eq!(
            logs[0].created_at,
            Utc.with_ymd_and_hms(2026, 6, 29, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn same_day_relogs_keep_insertion_order() {
        let (_, service) = service();
        let user = Uuid::new_v4();
        for weight in ["80", "75"] {
            let input = ProgressInput {
                log_date: Some(json!("2026-06-29")),
                weight: Some(json!(weight)),
                ..Default::default()
            };
            service.insert_progress(user, &input).await.unwrap();
        }

        let admin = service.admin_user_progress_at(user, now()).await.unwrap();
        assert_eq!(admin.current_weight, Some(75.0));
        assert_eq!(admin.logs[0].weight, Some(80.0));

        let view = service.progress_with_meta_at(user, now()).await.unwrap();
        assert_eq!(view.logs[0].weight, Some(75.0));
        assert_eq!(view.logs[1].weight, Some(80.0));
    }

    #[tokio::test]
    async fn admin_rollup_of_empty_history() {
        let (_, service) = service();
        let view = service
            .admin_user_progress_at(Uuid::new_v4(), now())
            .await
            .unwrap();

        assert_eq!(view.current_weight, None);
        assert_eq!(view.weight_change_percent, None);
        assert_eq!(view.strength_growth_percent, None);
        assert_eq!(view.workout_consistency_percent, 0.0);
        assert_eq!(view.active_streak, 0);
        assert_eq!(view.average_calories, None);
        assert_eq!(view.average_sleep, None);
        assert!(view.insights.is_empty());
        assert!(view.logs.is_empty());
    }

    #[tokio::test]
    async fn admin_rollup_summarises_history() {
        let (store, service) = service();
        let user = Uuid::new_v4();
        seed(
            &store,
            user,
            vec![
                NewProgressLog {
                    weight: Some(84.0),
                    strength_bench: Some(100.0),
                    strength_squat: Some(80.0),
                    strength_deadlift: Some(120.0),
                    calories_intake: Some(2000),
                    sleep_hours: Some(6.0),
                    workout_completed: true,
                    ..entry(45)
                },
                NewProgressLog {
                    weight: Some(80.0),
                    calories_intake: Some(2501),
                    ..entry(31)
                },
                NewProgressLog {
                    sleep_hours: Some(7.5),
                    workout_completed: true,
                    ..entry(10)
                },
                NewProgressLog {
                    weight: Some(78.0),
                    strength_bench: Some(115.0),
                    strength_squat: Some(115.0),
                    strength_deadlift: Some(115.0),
                    workout_completed: true,
                    ..entry(0)
                },
            ],
        )
        .await;

        let view = service.admin_user_progress_at(user, now()).await.unwrap();
        assert_eq!(view.current_weight, Some(78.0));
        assert_eq!(view.weight_change_percent, Some(-2.5));
        assert_eq!(view.strength_growth_percent, Some(15.0));
        assert_eq!(view.workout_consistency_percent, 75.0);
        assert_eq!(view.active_streak, 1);
        assert_eq!(view.average_calories, Some(2251));
        assert_eq!(view.average_sleep, Some(6.8));
        assert_eq!(view.insights, vec![insight::STRENGTH_MILESTONE.to_string()]);
        assert_eq!(view.logs.len(), 4);
        assert!(view.logs[0].created_at < view.logs[3].created_at);
    }

    fn stored(days_ago: i64, weight: f64) -> ProgressLog {
        ProgressLog {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            weight: Some(weight),
            body_fat: None,
            calories_intake: None,
            protein_intake: None,
            workout_completed: false,
            workout_type: None,
            strength_bench: None,
            strength_squat: None,
            strength_deadlift: None,
            sleep_hours: None,
            water_intake: None,
            created_at: now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn baseline_exactly_thirty_days_old_counts() {
        let mut baseline = stored(0, 80.0);
        baseline.created_at = now() - Duration::days(TRAILING_WINDOW_DAYS);
        let logs = vec![baseline, stored(1, 76.0)];
        assert_eq!(weight_change_percent(&logs, Some(76.0), now()), Some(-5.0));
    }

    #[test]
    fn baseline_one_second_inside_the_window_is_ignored() {
        let mut baseline = stored(0, 80.0);
        baseline.created_at = now() - Duration::days(TRAILING_WINDOW_DAYS) + Duration::seconds(1);
        let logs = vec![baseline, stored(1, 76.0)];
        assert_eq!(weight_change_percent(&logs, Some(76.0), now()), None);
    }

    #[test]
    fn weight_change_needs_a_baseline_before_the_window() {
        let logs = vec![stored(5, 80.0)];
        assert_eq!(weight_change_percent(&logs, Some(80.0), now()), None);
    }

    #[test]
    fn weight_change_needs_recent_activity() {
        let logs = vec![stored(90, 85.0), stored(60, 80.0)];
        assert_eq!(weight_change_percent(&logs, Some(80.0), now()), None);
    }

    #[test]
    fn zero_baseline_weight_yields_none() {
        let logs = vec![stored(40, 0.0), stored(1, 80.0)];
        assert_eq!(weight_change_percent(&logs, Some(80.0), now()), None);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([1.0, 2.0, 4.5].into_iter()), Some(2.5));
    }
}
