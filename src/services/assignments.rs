//! Assignment Engine
//!
//! Moves asset requests through their lifecycle and keeps the unit tables
//! consistent while doing it. Every mutation here runs inside one database
//! transaction: partial application of a multi-step mutation is a bug, so
//! any error at any step rolls the whole operation back and the caller
//! retries from scratch.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::asset_request::{self, RequestStatus};
use crate::entities::asset_request_item;
use crate::entities::assigned_asset::{self, AssignmentStatus};
use crate::entities::damaged_asset;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit;
use crate::services::item_store::{self, AssetType};

/// One item's worth of concrete unit picks in an approval call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentInput {
    /// The request item being fulfilled.
    pub item_id: Uuid,
    /// Type tag selecting the unit table ("laptop", "scanner2", ...).
    pub asset_type: String,
    /// Concrete unit ids to hand out; may be fewer than requested.
    pub asset_type_item_ids: Vec<Uuid>,
    /// Required by operators when approving fewer units than requested;
    /// recorded as given, the engine does not hard-block its absence.
    pub partial_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConfirmApproveRequest {
    #[validate(length(min = 1, message = "Admin name is required"))]
    pub admin_name: String,
    #[validate(length(min = 1, message = "At least one assignment is required"))]
    pub assignments: Vec<AssignmentInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReturnItemRequest {
    #[serde(default)]
    pub is_damaged: bool,
    pub damage_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeleteRequestRequest {
    #[validate(length(min = 1, message = "Admin name is required"))]
    pub admin_name: String,
    #[validate(length(min = 1, message = "A delete reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CancelRequestRequest {
    #[validate(email(message = "A valid requester email is required"))]
    pub user_email: String,
    #[validate(length(min = 1, message = "A cancellation reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApprovalOutcome {
    pub request_id: Uuid,
    pub status: String,
    pub assigned_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnOutcome {
    pub assigned_id: Uuid,
    pub status: String,
    pub damaged: bool,
}

/// Orchestrates approval, rejection, return, and deletion of requests.
#[derive(Clone)]
pub struct AssignmentService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl AssignmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Approves a request, binding concrete units to each supplied item.
    ///
    /// Existing active bindings of an item are released before its new ones
    /// are claimed, so a correction call can reassign a unit to the same
    /// item without transiently double-booking it. Availability of every
    /// unit is re-checked inside the transaction; a unit contested by a
    /// concurrent approval aborts the whole call with
    /// `ConcurrentModification` and no state change.
    #[instrument(skip(self, request), fields(request_id = %request_id, admin = %request.admin_name))]
    pub async fn confirm_approve(
        &self,
        request_id: Uuid,
        request: ConfirmApproveRequest,
    ) -> Result<ApprovalOutcome, ServiceError> {
        request.validate()?;

        // Parse and sanity-check the payload before touching the database.
        let mut parsed: Vec<(AssignmentInput, AssetType)> =
            Vec::with_capacity(request.assignments.len());
        for assignment in request.assignments {
            let ty = AssetType::parse(&assignment.asset_type).ok_or_else(|| {
                ServiceError::BadRequest(format!(
                    "Unknown asset type: {}",
                    assignment.asset_type
                ))
            })?;
            let mut seen = std::collections::HashSet::new();
            for unit_id in &assignment.asset_type_item_ids {
                if !seen.insert(*unit_id) {
                    return Err(ServiceError::BadRequest(format!(
                        "Item with id {} is listed twice in one assignment",
                        unit_id
                    )));
                }
            }
            parsed.push((assignment, ty));
        }

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let request_row = asset_request::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Asset request {} not found", request_id))
            })?;

        let items: HashMap<Uuid, asset_request_item::Model> = asset_request_item::Entity::find()
            .filter(asset_request_item::Column::AssetRequestId.eq(request_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let mut total_assigned = 0usize;

        for (assignment, ty) in &parsed {
            let item = items.get(&assignment.item_id).ok_or_else(|| {
                ServiceError::BadRequest(format!(
                    "Item with id {} not found in request {}",
                    assignment.item_id, request_id
                ))
            })?;

            let supplied = assignment.asset_type_item_ids.len();
            if supplied as i32 > item.requested_quantity {
                return Err(ServiceError::BadRequest(format!(
                    "Cannot assign {} units to item {}; only {} were requested",
                    supplied, item.id, item.requested_quantity
                )));
            }

            // Release-before-claim: drop the item's existing active
            // bindings so a reassignment of the same unit cannot collide
            // with itself.
            let existing = assigned_asset::Entity::find()
                .filter(assigned_asset::Column::AssetRequestItemId.eq(item.id))
                .filter(
                    assigned_asset::Column::Status.eq(AssignmentStatus::Assigned.as_str()),
                )
                .all(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            for row in &existing {
                match AssetType::parse(&row.asset_type) {
                    Some(row_ty) => {
                        item_store::release_unit(&txn, row_ty, row.asset_type_item_id).await?
                    }
                    None => warn!(
                        assigned_id = %row.id,
                        asset_type = %row.asset_type,
                        "Stored assignment carries unknown asset type; releasing row only"
                    ),
                }
            }
            if !existing.is_empty() {
                let ids: Vec<Uuid> = existing.iter().map(|row| row.id).collect();
                assigned_asset::Entity::delete_many()
                    .filter(assigned_asset::Column::Id.is_in(ids))
                    .exec(&txn)
                    .await
                    .map_err(ServiceError::db_error)?;
            }

            for unit_id in &assignment.asset_type_item_ids {
                item_store::claim_unit(&txn, *ty, *unit_id, now).await?;

                assigned_asset::ActiveModel {
                    asset_request_item_id: Set(item.id),
                    asset_type: Set(ty.as_str().to_string()),
                    asset_type_item_id: Set(*unit_id),
                    status: Set(AssignmentStatus::Assigned.as_str().to_string()),
                    assigned_date: Set(now),
                    returned_date: Set(None),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            }

            let mut item_update: asset_request_item::ActiveModel = item.clone().into();
            item_update.approved_quantity = Set(Some(supplied as i32));
            if let Some(reason) = &assignment.partial_reason {
                item_update.partial_reason = Set(Some(reason.clone()));
            }
            item_update
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            total_assigned += supplied;
        }

        let mut request_update: asset_request::ActiveModel = request_row.into();
        request_update.status = Set(RequestStatus::Approved.as_str().to_string());
        request_update
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(
            request_id = %request_id,
            assigned_count = total_assigned,
            "Asset request approved"
        );
        let _ = self
            .event_sender
            .send(Event::RequestApproved {
                request_id,
                assigned_count: total_assigned,
            })
            .await;

        Ok(ApprovalOutcome {
            request_id,
            status: RequestStatus::Approved.as_str().to_string(),
            assigned_count: total_assigned,
        })
    }

    /// Rejects a pending request. Any assignment rows found under it
    /// (normally none) are released defensively in the same transaction.
    #[instrument(skip(self), fields(request_id = %request_id))]
    pub async fn reject_request(&self, request_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let request_row = asset_request::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Asset request {} not found", request_id))
            })?;

        if RequestStatus::from_str(&request_row.status) != Some(RequestStatus::Pending) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "Request {} is {} and can no longer be rejected",
                request_id, request_row.status
            )));
        }

        let item_ids: Vec<Uuid> = asset_request_item::Entity::find()
            .filter(asset_request_item::Column::AssetRequestId.eq(request_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|item| item.id)
            .collect();

        if !item_ids.is_empty() {
            let assignments = assigned_asset::Entity::find()
                .filter(assigned_asset::Column::AssetRequestItemId.is_in(item_ids.clone()))
                .all(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            for row in &assignments {
                if AssignmentStatus::from_str(&row.status) == Some(AssignmentStatus::Assigned) {
                    if let Some(ty) = AssetType::parse(&row.asset_type) {
                        item_store::release_unit(&txn, ty, row.asset_type_item_id).await?;
                    }
                }
            }
            if !assignments.is_empty() {
                let ids: Vec<Uuid> = assignments.iter().map(|row| row.id).collect();
                assigned_asset::Entity::delete_many()
                    .filter(assigned_asset::Column::Id.is_in(ids))
                    .exec(&txn)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
        }

        let mut request_update: asset_request::ActiveModel = request_row.into();
        request_update.status = Set(RequestStatus::Rejected.as_str().to_string());
        request_update
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(request_id = %request_id, "Asset request rejected");
        let _ = self.event_sender.send(Event::RequestRejected(request_id)).await;

        Ok(())
    }

    /// Returns one assigned unit to stock, optionally reporting damage.
    /// Damage requires a non-empty reason; a rejected return applies
    /// nothing.
    #[instrument(skip(self, request), fields(assigned_id = %assigned_id, damaged = request.is_damaged))]
    pub async fn return_item(
        &self,
        assigned_id: Uuid,
        request: ReturnItemRequest,
    ) -> Result<ReturnOutcome, ServiceError> {
        let damage_reason = request
            .damage_reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty());
        if request.is_damaged && damage_reason.is_none() {
            return Err(ServiceError::BadRequest(
                "Damage reason is required when returning a damaged asset".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let row = assigned_asset::Entity::find_by_id(assigned_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Assigned asset {} not found", assigned_id))
            })?;

        if AssignmentStatus::from_str(&row.status) == Some(AssignmentStatus::Returned) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "Assigned asset {} has already been returned",
                assigned_id
            )));
        }

        let ty = AssetType::parse(&row.asset_type).ok_or_else(|| {
            ServiceError::InternalError(format!(
                "Assignment {} carries unknown asset type {}",
                assigned_id, row.asset_type
            ))
        })?;

        item_store::release_unit(&txn, ty, row.asset_type_item_id).await?;

        if request.is_damaged {
            let unit = item_store::find_unit(&txn, ty, row.asset_type_item_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "{} item {} referenced by assignment {} no longer exists",
                        ty, row.asset_type_item_id, assigned_id
                    ))
                })?;

            item_store::mark_damaged(&txn, ty, row.asset_type_item_id).await?;

            damaged_asset::ActiveModel {
                asset_type: Set(ty.as_str().to_string()),
                asset_type_item_id: Set(row.asset_type_item_id),
                asset_tag: Set(unit.asset_tag),
                reason: Set(damage_reason.unwrap_or_default().to_string()),
                reported_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        }

        let mut row_update: assigned_asset::ActiveModel = row.into();
        row_update.status = Set(AssignmentStatus::Returned.as_str().to_string());
        row_update.returned_date = Set(Some(now));
        row_update
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(assigned_id = %assigned_id, damaged = request.is_damaged, "Asset returned");
        let _ = self
            .event_sender
            .send(Event::AssetReturned {
                assigned_id,
                damaged: request.is_damaged,
            })
            .await;

        Ok(ReturnOutcome {
            assigned_id,
            status: AssignmentStatus::Returned.as_str().to_string(),
            damaged: request.is_damaged,
        })
    }

    /// Hard-deletes a request, restoring stock and writing the audit row in
    /// the same transaction. The audit row is the only durable record that
    /// the request existed.
    #[instrument(skip(self, request), fields(request_id = %request_id, admin = %request.admin_name))]
    pub async fn delete_request(
        &self,
        request_id: Uuid,
        request: DeleteRequestRequest,
    ) -> Result<(), ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let request_row = asset_request::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Asset request {} not found", request_id))
            })?;

        audit::record_admin_delete(
            &txn,
            &format!("Request #{}", request_row.id),
            "AssetRequest",
            &request.admin_name,
            &request.reason,
            now,
        )
        .await?;

        purge_request_tree(&txn, request_id).await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(request_id = %request_id, "Asset request deleted");
        let _ = self.event_sender.send(Event::RequestDeleted(request_id)).await;

        Ok(())
    }

    /// Lets a requester withdraw their own request while it is still
    /// pending. The user-side audit row commits with the delete.
    #[instrument(skip(self, request), fields(request_id = %request_id))]
    pub async fn cancel_request(
        &self,
        request_id: Uuid,
        request: CancelRequestRequest,
    ) -> Result<(), ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let request_row = asset_request::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Asset request {} not found", request_id))
            })?;

        if !request_row
            .user_email
            .eq_ignore_ascii_case(&request.user_email)
        {
            return Err(ServiceError::BadRequest(format!(
                "Request {} does not belong to {}",
                request_id, request.user_email
            )));
        }
        if RequestStatus::from_str(&request_row.status) != Some(RequestStatus::Pending) {
            return Err(ServiceError::InvalidStateTransition(format!(
                "Request {} is {} and can only be cancelled while pending",
                request_id, request_row.status
            )));
        }

        audit::record_user_delete(
            &txn,
            &format!("Request #{}", request_row.id),
            "AssetRequest",
            &request.user_email,
            &request.reason,
            now,
        )
        .await?;

        purge_request_tree(&txn, request_id).await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(request_id = %request_id, "Asset request cancelled by requester");
        let _ = self
            .event_sender
            .send(Event::RequestCancelled(request_id))
            .await;

        Ok(())
    }
}

/// Removes a request with its items and assignment rows, restoring any unit
/// that is still held. Runs on the caller's transaction.
async fn purge_request_tree(
    txn: &sea_orm::DatabaseTransaction,
    request_id: Uuid,
) -> Result<(), ServiceError> {
    let item_ids: Vec<Uuid> = asset_request_item::Entity::find()
        .filter(asset_request_item::Column::AssetRequestId.eq(request_id))
        .all(txn)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .map(|item| item.id)
        .collect();

    if !item_ids.is_empty() {
        let assignments = assigned_asset::Entity::find()
            .filter(assigned_asset::Column::AssetRequestItemId.is_in(item_ids.clone()))
            .all(txn)
            .await
            .map_err(ServiceError::db_error)?;

        for row in &assignments {
            let Some(ty) = AssetType::parse(&row.asset_type) else {
                continue;
            };
            // Release only units that are actually held; a returned
            // assignment's unit may belong to someone else by now.
            if let Some(unit) = item_store::find_unit(txn, ty, row.asset_type_item_id).await? {
                if unit.is_assigned {
                    item_store::release_unit(txn, ty, row.asset_type_item_id).await?;
                }
            }
        }

        assigned_asset::Entity::delete_many()
            .filter(assigned_asset::Column::AssetRequestItemId.is_in(item_ids.clone()))
            .exec(txn)
            .await
            .map_err(ServiceError::db_error)?;

        asset_request_item::Entity::delete_many()
            .filter(asset_request_item::Column::AssetRequestId.eq(request_id))
            .exec(txn)
            .await
            .map_err(ServiceError::db_error)?;
    }

    asset_request::Entity::delete_by_id(request_id)
        .exec(txn)
        .await
        .map_err(ServiceError::db_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_approve_payload_requires_assignments() {
        let payload = ConfirmApproveRequest {
            admin_name: "ops".into(),
            assignments: vec![],
        };
        assert!(payload.validate().is_err());

        let payload = ConfirmApproveRequest {
            admin_name: "ops".into(),
            assignments: vec![AssignmentInput {
                item_id: Uuid::new_v4(),
                asset_type: "laptop".into(),
                asset_type_item_ids: vec![Uuid::new_v4()],
                partial_reason: None,
            }],
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn delete_payload_requires_reason() {
        let payload = DeleteRequestRequest {
            admin_name: "ops".into(),
            reason: "".into(),
        };
        assert!(payload.validate().is_err());
    }
}
