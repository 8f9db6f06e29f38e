use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::errors::ServiceError;
use crate::services::item_store::{AssetType, CreateUnitPayload, ItemFilter, UnitRecord};
use crate::{ApiResponse, ApiResult, AppState};

fn parse_type(raw: &str) -> Result<AssetType, ServiceError> {
    AssetType::parse(raw)
        .ok_or_else(|| ServiceError::BadRequest(format!("Unknown asset type: {}", raw)))
}

/// Register a new inventory unit of the given type.
#[utoipa::path(
    post,
    path = "/api/v1/inventory/{asset_type}",
    request_body = CreateUnitPayload,
    responses(
        (status = 200, description = "Unit registered", body = UnitRecord),
        (status = 400, description = "Unknown type, duplicate tag, or missing spec", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
    Json(payload): Json<CreateUnitPayload>,
) -> ApiResult<UnitRecord> {
    let ty = parse_type(&asset_type)?;
    let unit = state.services.item_store.create_unit(ty, payload).await?;
    Ok(Json(ApiResponse::success(unit)))
}

/// All units of one type, stable id order.
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{asset_type}",
    responses(
        (status = 200, description = "Units returned"),
        (status = 400, description = "Unknown asset type", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_units(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
) -> ApiResult<Vec<UnitRecord>> {
    let ty = parse_type(&asset_type)?;
    let units = state.services.item_store.list_units(ty).await?;
    Ok(Json(ApiResponse::success(units)))
}

/// Units of one type that are unassigned, undamaged, and match the spec
/// filters. Assignable candidates only; availability is re-validated at
/// approval time.
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{asset_type}/available",
    params(ItemFilter),
    responses(
        (status = 200, description = "Available units returned"),
        (status = 400, description = "Unknown asset type", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_available(
    State(state): State<AppState>,
    Path(asset_type): Path<String>,
    Query(filter): Query<ItemFilter>,
) -> ApiResult<Vec<UnitRecord>> {
    let ty = parse_type(&asset_type)?;
    let units = state.services.item_store.list_available(ty, &filter).await?;
    Ok(Json(ApiResponse::success(units)))
}
