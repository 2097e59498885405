use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::user::ClientSummary;
use crate::services::progress::AdminUserProgress;
use crate::AppState;

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<ClientSummary>>> {
    let users = state.progress.store().list_clients().await?;
    Ok(Json(users))
}

pub async fn get_user_progress(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<AdminUserProgress>> {
    let view = state.progress.get_admin_user_progress(user_id).await?;
    Ok(Json(view))
}
