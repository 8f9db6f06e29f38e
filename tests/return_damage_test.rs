//! Return workflow: the already-returned guard, damage reporting with its
//! required reason, and the damage → repair round trip.

mod common;

use common::TestApp;

use assettrack_api::entities::{damaged_asset, repair_history};
use assettrack_api::errors::ServiceError;
use assettrack_api::services::assignments::{
    AssignmentInput, ConfirmApproveRequest, ReturnItemRequest,
};
use assettrack_api::services::item_store::{self, AssetType, ItemFilter};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

/// Seeds one laptop, requests it, approves it, and hands back the
/// assignment id.
async fn assigned_laptop(app: &TestApp, tag: &str) -> (Uuid, Uuid) {
    let unit = app.seed_laptop("Dell", tag).await;
    let request = app.submit_laptop_request(1, None).await;
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
                    asset_type_item_ids: vec![unit.id],
                    partial_reason: None,
                }],
            },
        )
        .await
        .expect("approve");

    let detail = app.services.requests.get_request(request.id).await.unwrap();
    let assigned_id = detail.items[0].assigned[0].id;
    (assigned_id, unit.id)
}

#[tokio::test]
async fn returning_twice_fails_and_keeps_first_return() {
    let app = TestApp::new().await;
    let (assigned_id, unit_id) = assigned_laptop(&app, "LAP-1001").await;

    let outcome = app
        .services
        .assignments
        .return_item(
            assigned_id,
            ReturnItemRequest {
                is_damaged: false,
                damage_reason: None,
            },
        )
        .await
        .expect("first return");
    assert_eq!(outcome.status, "returned");

    let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!unit.is_assigned);
    assert!(unit.assigned_date.is_none());

    let err = app
        .services
        .assignments
        .return_item(
            assigned_id,
            ReturnItemRequest {
                is_damaged: false,
                damage_reason: None,
            },
        )
        .await
        .expect_err("second return must fail");
    assert!(matches!(err, ServiceError::InvalidStateTransition(_)));

    // First return's effects persist unchanged.
    let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!unit.is_assigned);
}

#[tokio::test]
async fn damaged_return_requires_a_reason_and_applies_nothing_without_one() {
    let app = TestApp::new().await;
    let (assigned_id, unit_id) = assigned_laptop(&app, "LAP-1101").await;

    let err = app
        .services
        .assignments
        .return_item(
            assigned_id,
            ReturnItemRequest {
                is_damaged: true,
                damage_reason: Some("   ".to_string()),
            },
        )
        .await
        .expect_err("damage without reason must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    // The rejected return applied nothing: still assigned, no damage row.
    let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
        .await
        .unwrap()
        .unwrap();
    assert!(unit.is_assigned);
    assert!(!unit.is_damaged());
    let damaged = damaged_asset::Entity::find().count(&*app.db).await.unwrap();
    assert_eq!(damaged, 0);
}

#[tokio::test]
async fn damage_round_trip_through_repair() {
    let app = TestApp::new().await;
    let (assigned_id, unit_id) = assigned_laptop(&app, "LAP-1201").await;

    app.services
        .assignments
        .return_item(
            assigned_id,
            ReturnItemRequest {
                is_damaged: true,
                damage_reason: Some("screen cracked".to_string()),
            },
        )
        .await
        .expect("damaged return");

    let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!unit.is_assigned);
    assert!(unit.is_damaged());

    // Exactly one damage record, carrying the unit's tag.
    let damaged = app.services.damaged.list_damaged().await.unwrap();
    assert_eq!(damaged.len(), 1);
    assert_eq!(damaged[0].asset_tag, "LAP-1201");
    assert_eq!(damaged[0].reason, "screen cracked");

    // A damaged unit is not available even though it is unassigned.
    let available = app
        .services
        .item_store
        .list_available(AssetType::Laptop, &ItemFilter::default())
        .await
        .unwrap();
    assert!(available.iter().all(|u| u.id != unit_id));

    let history = app
        .services
        .damaged
        .repair(damaged[0].id)
        .await
        .expect("repair");
    assert_eq!(history.asset_tag, "LAP-1201");
    assert_eq!(history.remarks, "Repaired successfully");

    // Damage record removed, one history row, remarks reset.
    let open = damaged_asset::Entity::find().count(&*app.db).await.unwrap();
    assert_eq!(open, 0);
    let repairs = repair_history::Entity::find()
        .filter(repair_history::Column::AssetTag.eq("LAP-1201"))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(repairs, 1);

    let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!unit.is_damaged());
    assert_eq!(unit.remarks.as_deref(), Some("No"));

    // Back in the availability listing.
    let available = app
        .services
        .item_store
        .list_available(AssetType::Laptop, &ItemFilter::default())
        .await
        .unwrap();
    assert!(available.iter().any(|u| u.id == unit_id));
}

#[tokio::test]
async fn repairing_unknown_record_is_not_found() {
    let app = TestApp::new().await;
    let err = app
        .services
        .damaged
        .repair(Uuid::new_v4())
        .await
        .expect_err("unknown damage record");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
