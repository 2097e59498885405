use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::goal::{GoalDefaults, UserGoal};
use crate::models::progress_log::ProgressInput;
use crate::services::goal::get_or_create_goals;
use crate::services::progress::ProgressWithMeta;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub message: String,
}

pub async fn post_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ProgressInput>,
) -> AppResult<(StatusCode, Json<SavedResponse>)> {
    body.validate()?;

    state.progress.insert_progress(auth_user.id, &body).await?;

    Ok((
        StatusCode::CREATED,
        Json(SavedResponse {
            success: true,
            message: "Progress saved for this date".into(),
        }),
    ))
}

pub async fn get_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<ProgressWithMeta>> {
    let view = state.progress.get_progress_with_meta(auth_user.id).await?;
    Ok(Json(view))
}

pub async fn get_goals(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(defaults): Query<GoalDefaults>,
) -> AppResult<Json<UserGoal>> {
    let goal = get_or_create_goals(state.progress.store(), auth_user.id, &defaults).await?;
    Ok(Json(goal))
}
