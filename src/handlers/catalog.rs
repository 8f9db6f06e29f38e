use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::services::catalog::AssetSummary;
use crate::{ApiResponse, ApiResult, AppState};

/// Catalog categories with their derived available quantity.
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    responses(
        (status = 200, description = "Catalog returned", body = [AssetSummary])
    ),
    tag = "assets"
)]
pub async fn list_assets(State(state): State<AppState>) -> ApiResult<Vec<AssetSummary>> {
    let assets = state.services.catalog.list_assets().await?;
    Ok(Json(ApiResponse::success(assets)))
}

/// One catalog category.
#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}",
    responses(
        (status = 200, description = "Category returned", body = AssetSummary),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "assets"
)]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AssetSummary> {
    let asset = state.services.catalog.get_asset(id).await?;
    Ok(Json(ApiResponse::success(asset)))
}
