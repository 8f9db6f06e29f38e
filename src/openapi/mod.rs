//! OpenAPI documentation aggregated from the handler annotations.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AssetTrack API",
        description = "IT asset inventory, request lifecycle, and assignment tracking",
        license(name = "MIT")
    ),
    paths(
        crate::handlers::requests::create_asset_request,
        crate::handlers::requests::list_asset_requests,
        crate::handlers::requests::get_asset_request,
        crate::handlers::requests::confirm_approve,
        crate::handlers::requests::reject_request,
        crate::handlers::requests::cancel_request,
        crate::handlers::requests::return_item,
        crate::handlers::requests::delete_request,
        crate::handlers::catalog::list_assets,
        crate::handlers::catalog::get_asset,
        crate::handlers::inventory::create_unit,
        crate::handlers::inventory::list_units,
        crate::handlers::inventory::list_available,
        crate::handlers::damaged::list_damaged,
        crate::handlers::damaged::repair,
        crate::handlers::damaged::list_repair_history,
        crate::handlers::history::list_admin_deletes,
        crate::handlers::history::list_user_deletes,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::services::catalog::AssetSummary,
        crate::services::item_store::AssetType,
        crate::services::item_store::CreateUnitPayload,
        crate::services::item_store::DisplayFields,
        crate::services::item_store::ItemFilter,
        crate::services::item_store::UnitRecord,
        crate::services::requests::AssetRequestDetail,
        crate::services::requests::AssignedAssetDetail,
        crate::services::requests::CreateAssetRequest,
        crate::services::requests::CreateRequestItem,
        crate::services::requests::RequestItemDetail,
        crate::services::assignments::ApprovalOutcome,
        crate::services::assignments::AssignmentInput,
        crate::services::assignments::CancelRequestRequest,
        crate::services::assignments::ConfirmApproveRequest,
        crate::services::assignments::DeleteRequestRequest,
        crate::services::assignments::ReturnItemRequest,
        crate::services::assignments::ReturnOutcome,
    )),
    tags(
        (name = "asset-requests", description = "Request lifecycle and assignment"),
        (name = "assets", description = "Catalog categories with derived quantity"),
        (name = "inventory", description = "Per-type inventory unit store"),
        (name = "damaged-assets", description = "Damage and repair ledger"),
        (name = "history", description = "Delete audit trail"),
    )
)]
pub struct ApiDoc;
