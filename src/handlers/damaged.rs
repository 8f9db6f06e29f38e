use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::entities::{damaged_asset, repair_history};
use crate::{ApiResponse, ApiResult, AppState};

/// Open damage records, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/damaged-assets",
    responses(
        (status = 200, description = "Damage records returned")
    ),
    tag = "damaged-assets"
)]
pub async fn list_damaged(
    State(state): State<AppState>,
) -> ApiResult<Vec<damaged_asset::Model>> {
    let records = state.services.damaged.list_damaged().await?;
    Ok(Json(ApiResponse::success(records)))
}

/// Repair a damaged unit: removes the damage record, resets the unit, and
/// appends to repair history.
#[utoipa::path(
    post,
    path = "/api/v1/damaged-assets/repair/{id}",
    responses(
        (status = 200, description = "Unit repaired"),
        (status = 404, description = "Damage record not found", body = crate::errors::ErrorResponse)
    ),
    tag = "damaged-assets"
)]
pub async fn repair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<repair_history::Model> {
    let history = state.services.damaged.repair(id).await?;
    Ok(Json(ApiResponse::success(history)))
}

/// Append-only repair history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/repair-history",
    responses(
        (status = 200, description = "Repair history returned")
    ),
    tag = "damaged-assets"
)]
pub async fn list_repair_history(
    State(state): State<AppState>,
) -> ApiResult<Vec<repair_history::Model>> {
    let records = state.services.damaged.list_repair_history().await?;
    Ok(Json(ApiResponse::success(records)))
}
