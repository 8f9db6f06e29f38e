use axum::{extract::State, response::Json};

use crate::entities::{admin_delete_history, user_delete_history};
use crate::{ApiResponse, ApiResult, AppState};

/// Deletions performed by administrators, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/history/admin-deletes",
    responses(
        (status = 200, description = "Audit rows returned")
    ),
    tag = "history"
)]
pub async fn list_admin_deletes(
    State(state): State<AppState>,
) -> ApiResult<Vec<admin_delete_history::Model>> {
    let rows = state.services.audit.list_admin_history().await?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Deletions performed by end users, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/history/user-deletes",
    responses(
        (status = 200, description = "Audit rows returned")
    ),
    tag = "history"
)]
pub async fn list_user_deletes(
    State(state): State<AppState>,
) -> ApiResult<Vec<user_delete_history::Model>> {
    let rows = state.services.audit.list_user_history().await?;
    Ok(Json(ApiResponse::success(rows)))
}
