use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::assignments::{
    ApprovalOutcome, CancelRequestRequest, ConfirmApproveRequest, DeleteRequestRequest,
    ReturnItemRequest, ReturnOutcome,
};
use crate::services::requests::{AssetRequestDetail, CreateAssetRequest};
use crate::{ApiResponse, ApiResult, AppState, PaginatedResponse};

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct RequestListQuery {
    /// Page number (1-indexed)
    pub page: Option<u64>,
    /// Page size (max 100)
    pub limit: Option<u64>,
    /// Narrow to one requester email
    pub email: Option<String>,
}

/// Submit a new asset request.
#[utoipa::path(
    post,
    path = "/api/v1/asset-requests",
    request_body = CreateAssetRequest,
    responses(
        (status = 200, description = "Request created pending review"),
        (status = 400, description = "No items, unknown category, or bad quantity", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn create_asset_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssetRequest>,
) -> ApiResult<AssetRequestDetail> {
    let created = state.services.requests.create_request(payload).await?;
    Ok(Json(ApiResponse::success(created)))
}

/// List requests with nested items and resolved assignment details.
#[utoipa::path(
    get,
    path = "/api/v1/asset-requests",
    responses(
        (status = 200, description = "Requests returned newest first")
    ),
    tag = "asset-requests"
)]
pub async fn list_asset_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> ApiResult<PaginatedResponse<AssetRequestDetail>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (items, total) = state
        .services
        .requests
        .list_requests(page, limit, query.email.as_deref())
        .await?;

    let total_pages = (total + limit - 1) / limit;

    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

/// Single request detail including per-item spec filters.
#[utoipa::path(
    get,
    path = "/api/v1/asset-requests/{id}",
    responses(
        (status = 200, description = "Request detail"),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn get_asset_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<AssetRequestDetail> {
    let detail = state.services.requests.get_request(id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// Approve a request, binding concrete inventory units to its items.
#[utoipa::path(
    post,
    path = "/api/v1/asset-requests/{id}/confirm-approve",
    request_body = ConfirmApproveRequest,
    responses(
        (status = 200, description = "Request approved", body = ApprovalOutcome),
        (status = 400, description = "Bad item or asset type", body = crate::errors::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "A unit was claimed concurrently", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn confirm_approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmApproveRequest>,
) -> ApiResult<ApprovalOutcome> {
    let outcome = state.services.assignments.confirm_approve(id, payload).await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// Reject a pending request.
#[utoipa::path(
    post,
    path = "/api/v1/asset-requests/{id}/reject",
    responses(
        (status = 200, description = "Request rejected"),
        (status = 400, description = "Request is not pending", body = crate::errors::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.services.assignments.reject_request(id).await?;
    Ok(Json(ApiResponse::success(json!({
        "request_id": id,
        "status": "rejected"
    }))))
}

/// Withdraw an own pending request; writes the user-side audit row.
#[utoipa::path(
    post,
    path = "/api/v1/asset-requests/{id}/cancel",
    request_body = CancelRequestRequest,
    responses(
        (status = 200, description = "Request cancelled"),
        (status = 400, description = "Not the requester or not pending", body = crate::errors::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequestRequest>,
) -> ApiResult<serde_json::Value> {
    state.services.assignments.cancel_request(id, payload).await?;
    Ok(Json(ApiResponse::success(json!({
        "request_id": id,
        "status": "cancelled"
    }))))
}

/// Return one assigned unit, optionally reporting damage.
#[utoipa::path(
    post,
    path = "/api/v1/asset-requests/return-item/{assigned_id}",
    request_body = ReturnItemRequest,
    responses(
        (status = 200, description = "Unit returned", body = ReturnOutcome),
        (status = 400, description = "Already returned or missing damage reason", body = crate::errors::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn return_item(
    State(state): State<AppState>,
    Path(assigned_id): Path<Uuid>,
    Json(payload): Json<ReturnItemRequest>,
) -> ApiResult<ReturnOutcome> {
    let outcome = state
        .services
        .assignments
        .return_item(assigned_id, payload)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// Hard-delete a request, restoring stock and writing the audit record.
#[utoipa::path(
    delete,
    path = "/api/v1/asset-requests/{id}",
    request_body = DeleteRequestRequest,
    responses(
        (status = 200, description = "Request deleted"),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "asset-requests"
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeleteRequestRequest>,
) -> ApiResult<serde_json::Value> {
    state.services.assignments.delete_request(id, payload).await?;
    Ok(Json(ApiResponse::success(json!({
        "request_id": id,
        "status": "deleted"
    }))))
}
