//! Deletion paths: stock restoration, cascade removal of items and
//! assignment rows, and the audit row written in the same transaction.

mod common;

use common::TestApp;

use assettrack_api::entities::{admin_delete_history, asset_request_item, assigned_asset};
use assettrack_api::errors::ServiceError;
use assettrack_api::services::assignments::{
    AssignmentInput, CancelRequestRequest, ConfirmApproveRequest, DeleteRequestRequest,
};
use assettrack_api::services::item_store::{self, AssetType};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

#[tokio::test]
async fn deleting_a_request_restores_stock_and_writes_one_audit_row() {
    let app = TestApp::new().await;

    let l1 = app.seed_laptop("Dell", "LAP-2001").await;
    let l2 = app.seed_laptop("Dell", "LAP-2002").await;
    let l3 = app.seed_laptop("Dell", "LAP-2003").await;
    let request = app.submit_laptop_request(3, None).await;
    let item_id = request.items[0].id;

    app.services
        .assignments
        .confirm_approve(
            request.id,
            ConfirmApproveRequest {
                admin_name: "ops-admin".to_string(),
                assignments: vec![AssignmentInput {
                    item_id,
                    asset_type: "laptop".to_string(),
                    asset_type_item_ids: vec![l1.id, l2.id, l3.id],
                    partial_reason: None,
                }],
            },
        )
        .await
        .expect("approve three laptops");

    app.services
        .assignments
        .delete_request(
            request.id,
            DeleteRequestRequest {
                admin_name: "ops-admin".to_string(),
                reason: "duplicate submission".to_string(),
            },
        )
        .await
        .expect("delete request");

    // All three laptops are back in stock.
    for unit_id in [l1.id, l2.id, l3.id] {
        let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!unit.is_assigned, "stock must be restored on delete");
    }

    // Request, items, and assignment rows are gone.
    let err = app
        .services
        .requests
        .get_request(request.id)
        .await
        .expect_err("request must be gone");
    assert!(matches!(err, ServiceError::NotFound(_)));
    let items = asset_request_item::Entity::find()
        .filter(asset_request_item::Column::AssetRequestId.eq(request.id))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(items, 0);
    let assignments = assigned_asset::Entity::find()
        .filter(assigned_asset::Column::AssetRequestItemId.eq(item_id))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(assignments, 0);

    // Exactly one audit row records the delete.
    let audit = app.services.audit.list_admin_history().await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].item_type, "AssetRequest");
    assert_eq!(audit[0].deleted_by, "ops-admin");
    assert_eq!(audit[0].reason, "duplicate submission");
    assert_eq!(
        audit[0].deleted_item_name,
        format!("Request #{}", request.id)
    );
}

#[tokio::test]
async fn deleting_unknown_request_writes_no_audit_row() {
    let app = TestApp::new().await;

    let err = app
        .services
        .assignments
        .delete_request(
            Uuid::new_v4(),
            DeleteRequestRequest {
                admin_name: "ops-admin".to_string(),
                reason: "cleanup".to_string(),
            },
        )
        .await
        .expect_err("unknown request");
    assert!(matches!(err, ServiceError::NotFound(_)));

    let audit = admin_delete_history::Entity::find()
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(audit, 0);
}

#[tokio::test]
async fn catalog_quantity_tracks_assignment_state() {
    let app = TestApp::new().await;

    let l1 = app.seed_laptop("Dell", "LAP-2101").await;
    app.seed_laptop("Dell", "LAP-2102").await;
    app.seed_laptop("Dell", "LAP-2103").await;

    let assets = app.services.catalog.list_assets().await.unwrap();
    let laptops = assets.iter().find(|a| a.name == "Laptops").unwrap();
    assert_eq!(laptops.quantity, 3);
    assert_eq!(laptops.pre_code, "LAP");

    let request = app.submit_laptop_request(1, None).await;
    app.services
        .assignments
        .confirm_approve(
            request.id,
            ConfirmApproveRequest {
                admin_name: "ops-admin".to_string(),
                assignments: vec![AssignmentInput {
                    item_id: request.items[0].id,
                    asset_type: "laptop".to_string(),
                    asset_type_item_ids: vec![l1.id],
                    partial_reason: None,
                }],
            },
        )
        .await
        .expect("approve");

    let assets = app.services.catalog.list_assets().await.unwrap();
    let laptops = assets.iter().find(|a| a.name == "Laptops").unwrap();
    assert_eq!(laptops.quantity, 2);
}

#[tokio::test]
async fn requester_can_cancel_own_pending_request() {
    let app = TestApp::new().await;
    app.seed_laptop("Dell", "LAP-2201").await;
    let request = app.submit_laptop_request(1, None).await;

    let err = app
        .services
        .assignments
        .cancel_request(
            request.id,
            CancelRequestRequest {
                user_email: "someone-else@example.com".to_string(),
                reason: "changed my mind".to_string(),
            },
        )
        .await
        .expect_err("cancel by another user must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    app.services
        .assignments
        .cancel_request(
            request.id,
            CancelRequestRequest {
                user_email: "requester@example.com".to_string(),
                reason: "changed my mind".to_string(),
            },
        )
        .await
        .expect("cancel own pending request");

    let err = app
        .services
        .requests
        .get_request(request.id)
        .await
        .expect_err("request must be gone");
    assert!(matches!(err, ServiceError::NotFound(_)));

    let audit = app.services.audit.list_user_history().await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].item_type, "AssetRequest");
    assert_eq!(audit[0].deleted_by, "requester@example.com");

    // Admin history stays untouched by a user cancellation.
    let admin_rows = app.services.audit.list_admin_history().await.unwrap();
    assert!(admin_rows.is_empty());
}

#[tokio::test]
async fn approved_request_cannot_be_cancelled_by_requester() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-2301").await;
    let request = app.submit_laptop_request(1, None).await;

    app.services
        .assignments
        .confirm_approve(
            request.id,
            ConfirmApproveRequest {
                admin_name: "ops-admin".to_string(),
                assignments: vec![AssignmentInput {
                    item_id: request.items[0].id,
                    asset_type: "laptop".to_string(),
                    asset_type_item_ids: vec![l1.id],
                    partial_reason: None,
                }],
            },
        )
        .await
        .expect("approve");

    let err = app
        .services
        .assignments
        .cancel_request(
            request.id,
            CancelRequestRequest {
                user_email: "requester@example.com".to_string(),
                reason: "changed my mind".to_string(),
            },
        )
        .await
        .expect_err("cancel after approval must fail");
    assert!(matches!(err, ServiceError::InvalidStateTransition(_)));
}
