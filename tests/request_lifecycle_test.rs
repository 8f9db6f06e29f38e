//! End-to-end coverage of the request lifecycle: availability listing,
//! approval with concrete unit binding, partial approval, rejection
//! preconditions, approval atomicity, and the double-assignment guard.

mod common;

use common::TestApp;

use assettrack_api::entities::assigned_asset;
use assettrack_api::errors::ServiceError;
use assettrack_api::services::assignments::{AssignmentInput, ConfirmApproveRequest};
use assettrack_api::services::item_store::{self, AssetType, ItemFilter};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

fn approve_payload(item_id: Uuid, unit_ids: Vec<Uuid>) -> ConfirmApproveRequest {
    ConfirmApproveRequest {
        admin_name: "ops-admin".to_string(),
        assignments: vec![AssignmentInput {
            item_id,
            asset_type: "laptop".to_string(),
            asset_type_item_ids: unit_ids,
            partial_reason: None,
        }],
    }
}

#[tokio::test]
async fn dell_scenario_availability_approval_and_flags() {
    let app = TestApp::new().await;

    let l1 = app.seed_laptop("Dell", "LAP-0001").await;
    let l2 = app.seed_laptop("Dell", "LAP-0002").await;
    let l3 = app.seed_laptop("Dell", "LAP-0003").await;
    let l4 = app.seed_laptop("Dell", "LAP-0004").await;
    // L4 is already out on assignment.
    item_store::claim_unit(&*app.db, AssetType::Laptop, l4.id, chrono::Utc::now())
        .await
        .expect("claim l4");

    let dell_filter = ItemFilter {
        brand: Some("Dell".to_string()),
        ..Default::default()
    };
    let available = app
        .services
        .item_store
        .list_available(AssetType::Laptop, &dell_filter)
        .await
        .expect("list available");
    let available_ids: Vec<Uuid> = available.iter().map(|u| u.id).collect();
    assert_eq!(available_ids.len(), 3);
    assert!(available_ids.contains(&l1.id));
    assert!(available_ids.contains(&l2.id));
    assert!(available_ids.contains(&l3.id));

    let request = app.submit_laptop_request(2, Some("Dell")).await;
    assert_eq!(request.status, "pending");
    let item = &request.items[0];
    assert_eq!(item.requested_quantity, 2);
    assert_eq!(item.filters.brand.as_deref(), Some("Dell"));

    let outcome = app
        .services
        .assignments
        .confirm_approve(request.id, approve_payload(item.id, vec![l1.id, l2.id]))
        .await
        .expect("approve");
    assert_eq!(outcome.assigned_count, 2);
    assert_eq!(outcome.status, "approved");

    let l1_now = item_store::find_unit(&*app.db, AssetType::Laptop, l1.id)
        .await
        .unwrap()
        .unwrap();
    let l2_now = item_store::find_unit(&*app.db, AssetType::Laptop, l2.id)
        .await
        .unwrap()
        .unwrap();
    let l3_now = item_store::find_unit(&*app.db, AssetType::Laptop, l3.id)
        .await
        .unwrap()
        .unwrap();
    assert!(l1_now.is_assigned);
    assert!(l1_now.assigned_date.is_some());
    assert!(l2_now.is_assigned);
    assert!(!l3_now.is_assigned);

    let detail = app
        .services
        .requests
        .get_request(request.id)
        .await
        .expect("reload request");
    assert_eq!(detail.status, "approved");
    let item = &detail.items[0];
    assert_eq!(item.approved_quantity, Some(2));
    assert_eq!(item.assigned.len(), 2);
    assert!(item
        .assigned
        .iter()
        .all(|a| a.status == "assigned" && a.detail.is_some()));
}

#[tokio::test]
async fn partial_approval_records_reason_and_count() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-0101").await;
    let request = app.submit_laptop_request(3, None).await;
    let item_id = request.items[0].id;

    let payload = ConfirmApproveRequest {
        admin_name: "ops-admin".to_string(),
        assignments: vec![AssignmentInput {
            item_id,
            asset_type: "laptop".to_string(),
            asset_type_item_ids: vec![l1.id],
            partial_reason: Some("Only one unit in stock".to_string()),
        }],
    };
    let outcome = app
        .services
        .assignments
        .confirm_approve(request.id, payload)
        .await
        .expect("partial approve");
    assert_eq!(outcome.assigned_count, 1);

    let detail = app.services.requests.get_request(request.id).await.unwrap();
    let item = &detail.items[0];
    assert_eq!(item.approved_quantity, Some(1));
    assert_eq!(item.partial_reason.as_deref(), Some("Only one unit in stock"));
}

#[tokio::test]
async fn rejecting_non_pending_request_is_an_invalid_transition() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("HP", "LAP-0201").await;
    let request = app.submit_laptop_request(1, None).await;
    let item_id = request.items[0].id;

    app.services
        .assignments
        .confirm_approve(request.id, approve_payload(item_id, vec![l1.id]))
        .await
        .expect("approve");

    let err = app
        .services
        .assignments
        .reject_request(request.id)
        .await
        .expect_err("reject after approve must fail");
    assert!(matches!(err, ServiceError::InvalidStateTransition(_)));

    // Nothing changed: still approved, unit still assigned.
    let detail = app.services.requests.get_request(request.id).await.unwrap();
    assert_eq!(detail.status, "approved");
    let unit = item_store::find_unit(&*app.db, AssetType::Laptop, l1.id)
        .await
        .unwrap()
        .unwrap();
    assert!(unit.is_assigned);
}

#[tokio::test]
async fn rejecting_pending_request_works_once() {
    let app = TestApp::new().await;
    app.seed_laptop("HP", "LAP-0301").await;
    let request = app.submit_laptop_request(1, None).await;

    app.services
        .assignments
        .reject_request(request.id)
        .await
        .expect("reject pending");

    let detail = app.services.requests.get_request(request.id).await.unwrap();
    assert_eq!(detail.status, "rejected");

    let err = app
        .services
        .assignments
        .reject_request(request.id)
        .await
        .expect_err("second reject must fail");
    assert!(matches!(err, ServiceError::InvalidStateTransition(_)));
}

#[tokio::test]
async fn failed_approval_rolls_back_every_assignment() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-0401").await;
    let l2 = app.seed_laptop("Dell", "LAP-0402").await;
    let request = app.submit_laptop_request(3, None).await;
    let item_id = request.items[0].id;

    // Third unit id does not exist, so the claim fails after two units have
    // already been claimed inside the transaction.
    let payload = approve_payload(item_id, vec![l1.id, l2.id, Uuid::new_v4()]);
    let err = app
        .services
        .assignments
        .confirm_approve(request.id, payload)
        .await
        .expect_err("approval with a missing unit must fail");
    assert!(matches!(err, ServiceError::NotFound(_)));

    // Full rollback: no flags flipped, no assignment rows, still pending.
    for unit_id in [l1.id, l2.id] {
        let unit = item_store::find_unit(&*app.db, AssetType::Laptop, unit_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!unit.is_assigned, "unit flag must be rolled back");
    }
    let assignments = assigned_asset::Entity::find()
        .filter(assigned_asset::Column::AssetRequestItemId.eq(item_id))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(assignments, 0);
    let detail = app.services.requests.get_request(request.id).await.unwrap();
    assert_eq!(detail.status, "pending");
    assert_eq!(detail.items[0].approved_quantity, None);
}

#[tokio::test]
async fn unknown_asset_type_fails_before_any_mutation() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-0501").await;
    let request = app.submit_laptop_request(1, None).await;
    let item_id = request.items[0].id;

    let payload = ConfirmApproveRequest {
        admin_name: "ops-admin".to_string(),
        assignments: vec![AssignmentInput {
            item_id,
            asset_type: "typewriter".to_string(),
            asset_type_item_ids: vec![l1.id],
            partial_reason: None,
        }],
    };
    let err = app
        .services
        .assignments
        .confirm_approve(request.id, payload)
        .await
        .expect_err("unknown type must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let detail = app.services.requests.get_request(request.id).await.unwrap();
    assert_eq!(detail.status, "pending");
}

#[tokio::test]
async fn contested_unit_is_assigned_exactly_once() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-0601").await;

    let first = app.submit_laptop_request(1, None).await;
    let second = app.submit_laptop_request(1, None).await;

    app.services
        .assignments
        .confirm_approve(first.id, approve_payload(first.items[0].id, vec![l1.id]))
        .await
        .expect("first approval wins");

    let err = app
        .services
        .assignments
        .confirm_approve(second.id, approve_payload(second.items[0].id, vec![l1.id]))
        .await
        .expect_err("second approval of the same unit must fail");
    assert!(matches!(err, ServiceError::ConcurrentModification(_)));

    // Exactly one active assignment row references the unit.
    let active = assigned_asset::Entity::find()
        .filter(assigned_asset::Column::AssetTypeItemId.eq(l1.id))
        .filter(assigned_asset::Column::Status.eq("assigned"))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(active, 1);

    let detail = app.services.requests.get_request(second.id).await.unwrap();
    assert_eq!(detail.status, "pending");
}

#[tokio::test]
async fn reassignment_releases_previous_units_first() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-0701").await;
    let l2 = app.seed_laptop("Dell", "LAP-0702").await;
    let request = app.submit_laptop_request(1, None).await;
    let item_id = request.items[0].id;

    app.services
        .assignments
        .confirm_approve(request.id, approve_payload(item_id, vec![l1.id]))
        .await
        .expect("initial approval");

    // Correction call swaps the unit; the old one is released in the same
    // transaction.
    app.services
        .assignments
        .confirm_approve(request.id, approve_payload(item_id, vec![l2.id]))
        .await
        .expect("reassignment");

    let l1_now = item_store::find_unit(&*app.db, AssetType::Laptop, l1.id)
        .await
        .unwrap()
        .unwrap();
    let l2_now = item_store::find_unit(&*app.db, AssetType::Laptop, l2.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!l1_now.is_assigned);
    assert!(l2_now.is_assigned);

    let active = assigned_asset::Entity::find()
        .filter(assigned_asset::Column::AssetRequestItemId.eq(item_id))
        .filter(assigned_asset::Column::Status.eq("assigned"))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(active, 1);

    // Reassigning the same unit to itself must not double-book it either.
    app.services
        .assignments
        .confirm_approve(request.id, approve_payload(item_id, vec![l2.id]))
        .await
        .expect("self reassignment");
    let active = assigned_asset::Entity::find()
        .filter(assigned_asset::Column::AssetTypeItemId.eq(l2.id))
        .filter(assigned_asset::Column::Status.eq("assigned"))
        .count(&*app.db)
        .await
        .unwrap();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn overassignment_is_rejected() {
    let app = TestApp::new().await;
    let l1 = app.seed_laptop("Dell", "LAP-0801").await;
    let l2 = app.seed_laptop("Dell", "LAP-0802").await;
    let request = app.submit_laptop_request(1, None).await;
    let item_id = request.items[0].id;

    let err = app
        .services
        .assignments
        .confirm_approve(request.id, approve_payload(item_id, vec![l1.id, l2.id]))
        .await
        .expect_err("assigning more than requested must fail");
    assert!(matches!(err, ServiceError::BadRequest(_)));
}
