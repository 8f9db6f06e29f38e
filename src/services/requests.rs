//! Request Aggregate
//!
//! Creation and read-side projection of asset requests. Requests own their
//! items, items own their assignment rows; assigned-unit display details are
//! resolved with one batched lookup per referenced unit table so listing N
//! requests never issues N queries per row.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::asset_request::{self, RequestStatus};
use crate::entities::asset_request_item;
use crate::entities::assigned_asset;
use crate::entities::asset;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::catalog;
use crate::services::item_store::{self, AssetType, DisplayFields, ItemFilter, UnitRecord};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRequestItem {
    #[validate(length(min = 1, message = "Asset category is required"))]
    pub asset_category: String,
    #[validate(range(min = 1, message = "Requested quantity must be at least 1"))]
    pub requested_quantity: i32,
    /// Desired specs; empty fields do not constrain matching.
    #[serde(flatten)]
    pub filters: ItemFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAssetRequest {
    pub user_id: Uuid,
    #[validate(email(message = "A valid requester email is required"))]
    pub user_email: String,
    pub location_id: Uuid,
    pub message: Option<String>,
    #[validate(length(min = 1, message = "A request needs at least one item"))]
    pub items: Vec<CreateRequestItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignedAssetDetail {
    pub id: Uuid,
    pub asset_type: String,
    pub asset_type_item_id: Uuid,
    pub status: String,
    pub assigned_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    /// Resolved unit display fields; absent when the unit row has been
    /// deleted out from under the weak reference.
    pub detail: Option<DisplayFields>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestItemDetail {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub requested_quantity: i32,
    pub approved_quantity: Option<i32>,
    pub partial_reason: Option<String>,
    pub filters: ItemFilter,
    pub assigned: Vec<AssignedAssetDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetRequestDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub location_id: Uuid,
    pub request_date: DateTime<Utc>,
    pub status: String,
    pub message: Option<String>,
    pub items: Vec<RequestItemDetail>,
}

fn filters_from_item(model: &asset_request_item::Model) -> ItemFilter {
    ItemFilter {
        brand: model.brand.clone(),
        processor: model.processor.clone(),
        storage: model.storage.clone(),
        ram: model.ram.clone(),
        operating_system: model.operating_system.clone(),
        network_type: model.network_type.clone(),
        sim_type: model.sim_type.clone(),
        sim_support: model.sim_support.clone(),
        printer_type: model.printer_type.clone(),
        paper_size: model.paper_size.clone(),
        dpi: model.dpi.clone(),
        scanner_type: model.scanner_type.clone(),
        scanner_resolution: model.scanner_resolution.clone(),
        scan_type: model.scan_type.clone(),
        technology: model.technology.clone(),
    }
}

/// Service for creating and reading asset requests.
#[derive(Clone)]
pub struct RequestService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl RequestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a pending request with its items. Every category must exist
    /// in the catalog and normalize to a known type tag.
    #[instrument(skip(self, request), fields(user_email = %request.user_email))]
    pub async fn create_request(
        &self,
        request: CreateAssetRequest,
    ) -> Result<AssetRequestDetail, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        // Resolve categories before opening the transaction: fail fast, no
        // mutation on a bad payload.
        let mut resolved = Vec::with_capacity(request.items.len());
        for item in &request.items {
            item.validate()?;
            let category = catalog::find_by_name(db, &item.asset_category)
                .await?
                .ok_or_else(|| {
                    ServiceError::BadRequest(format!(
                        "Unknown asset category: {}",
                        item.asset_category
                    ))
                })?;
            if AssetType::from_category_name(&category.name).is_none() {
                return Err(ServiceError::BadRequest(format!(
                    "Asset category {} does not map to a known asset type",
                    category.name
                )));
            }
            resolved.push((category, item));
        }

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let request_row = asset_request::ActiveModel {
            user_id: Set(request.user_id),
            user_email: Set(request.user_email.clone()),
            location_id: Set(request.location_id),
            request_date: Set(now),
            status: Set(RequestStatus::Pending.as_str().to_string()),
            message: Set(request.message.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        for (category, item) in &resolved {
            let f = &item.filters;
            asset_request_item::ActiveModel {
                asset_request_id: Set(request_row.id),
                asset_id: Set(category.id),
                requested_quantity: Set(item.requested_quantity),
                approved_quantity: Set(None),
                partial_reason: Set(None),
                brand: Set(f.brand.clone()),
                processor: Set(f.processor.clone()),
                storage: Set(f.storage.clone()),
                ram: Set(f.ram.clone()),
                operating_system: Set(f.operating_system.clone()),
                network_type: Set(f.network_type.clone()),
                sim_type: Set(f.sim_type.clone()),
                sim_support: Set(f.sim_support.clone()),
                printer_type: Set(f.printer_type.clone()),
                paper_size: Set(f.paper_size.clone()),
                dpi: Set(f.dpi.clone()),
                scanner_type: Set(f.scanner_type.clone()),
                scanner_resolution: Set(f.scanner_resolution.clone()),
                scan_type: Set(f.scan_type.clone()),
                technology: Set(f.technology.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(request_id = %request_row.id, "Asset request created");
        let _ = self
            .event_sender
            .send(Event::RequestCreated(request_row.id))
            .await;

        self.get_request(request_row.id).await
    }

    /// Single request with items, filters, and resolved assignment details.
    #[instrument(skip(self))]
    pub async fn get_request(&self, request_id: Uuid) -> Result<AssetRequestDetail, ServiceError> {
        let db = &*self.db_pool;

        let request = asset_request::Entity::find_by_id(request_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Asset request {} not found", request_id))
            })?;

        let mut details = self.assemble(vec![request]).await?;
        details
            .pop()
            .ok_or_else(|| ServiceError::InternalError("request projection lost".to_string()))
    }

    /// Requests newest-first, optionally narrowed to one requester email.
    #[instrument(skip(self))]
    pub async fn list_requests(
        &self,
        page: u64,
        limit: u64,
        email: Option<&str>,
    ) -> Result<(Vec<AssetRequestDetail>, u64), ServiceError> {
        let db = &*self.db_pool;

        let mut query = asset_request::Entity::find();
        if let Some(email) = email {
            query = query.filter(asset_request::Column::UserEmail.eq(email));
        }
        query = query.order_by_desc(asset_request::Column::CreatedAt);

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let requests = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        let details = self.assemble(requests).await?;
        Ok((details, total))
    }

    /// Builds the nested projection for a page of requests. One query for
    /// items, one for assignment rows, one per referenced unit table, one
    /// for category names.
    async fn assemble(
        &self,
        requests: Vec<asset_request::Model>,
    ) -> Result<Vec<AssetRequestDetail>, ServiceError> {
        let db = &*self.db_pool;

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let request_ids: Vec<Uuid> = requests.iter().map(|r| r.id).collect();
        let items = asset_request_item::Entity::find()
            .filter(asset_request_item::Column::AssetRequestId.is_in(request_ids))
            .order_by_asc(asset_request_item::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let item_ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        let assignments = if item_ids.is_empty() {
            Vec::new()
        } else {
            assigned_asset::Entity::find()
                .filter(assigned_asset::Column::AssetRequestItemId.is_in(item_ids))
                .order_by_asc(assigned_asset::Column::AssignedDate)
                .all(db)
                .await
                .map_err(ServiceError::db_error)?
        };

        // Distinct unit ids per type, then one batched fetch per table.
        let mut ids_by_type: HashMap<AssetType, HashSet<Uuid>> = HashMap::new();
        for row in &assignments {
            if let Some(ty) = AssetType::parse(&row.asset_type) {
                ids_by_type.entry(ty).or_default().insert(row.asset_type_item_id);
            }
        }
        let mut units_by_type: HashMap<AssetType, HashMap<Uuid, UnitRecord>> = HashMap::new();
        for (ty, ids) in ids_by_type {
            let ids: Vec<Uuid> = ids.into_iter().collect();
            units_by_type.insert(ty, item_store::fetch_units_by_ids(db, ty, &ids).await?);
        }

        let asset_ids: Vec<Uuid> = items
            .iter()
            .map(|i| i.asset_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let asset_names: HashMap<Uuid, String> = if asset_ids.is_empty() {
            HashMap::new()
        } else {
            asset::Entity::find()
                .filter(asset::Column::Id.is_in(asset_ids))
                .all(db)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect()
        };

        let mut assignments_by_item: HashMap<Uuid, Vec<AssignedAssetDetail>> = HashMap::new();
        for row in assignments {
            let detail = AssetType::parse(&row.asset_type)
                .and_then(|ty| units_by_type.get(&ty))
                .and_then(|units| units.get(&row.asset_type_item_id))
                .map(UnitRecord::display);
            assignments_by_item
                .entry(row.asset_request_item_id)
                .or_default()
                .push(AssignedAssetDetail {
                    id: row.id,
                    asset_type: row.asset_type,
                    asset_type_item_id: row.asset_type_item_id,
                    status: row.status,
                    assigned_date: row.assigned_date,
                    returned_date: row.returned_date,
                    detail,
                });
        }

        let mut items_by_request: HashMap<Uuid, Vec<RequestItemDetail>> = HashMap::new();
        for item in items {
            let filters = filters_from_item(&item);
            let assigned = assignments_by_item.remove(&item.id).unwrap_or_default();
            items_by_request
                .entry(item.asset_request_id)
                .or_default()
                .push(RequestItemDetail {
                    id: item.id,
                    asset_id: item.asset_id,
                    asset_name: asset_names
                        .get(&item.asset_id)
                        .cloned()
                        .unwrap_or_default(),
                    requested_quantity: item.requested_quantity,
                    approved_quantity: item.approved_quantity,
                    partial_reason: item.partial_reason,
                    filters,
                    assigned,
                });
        }

        Ok(requests
            .into_iter()
            .map(|request| AssetRequestDetail {
                items: items_by_request.remove(&request.id).unwrap_or_default(),
                id: request.id,
                user_id: request.user_id,
                user_email: request.user_email,
                location_id: request.location_id,
                request_date: request.request_date,
                status: request.status,
                message: request.message,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_payload_validation() {
        let request = CreateAssetRequest {
            user_id: Uuid::new_v4(),
            user_email: "not-an-email".into(),
            location_id: Uuid::new_v4(),
            message: None,
            items: vec![],
        };
        let err = request.validate().unwrap_err().to_string();
        assert!(err.contains("email") || err.contains("item"));

        let item = CreateRequestItem {
            asset_category: "Laptops".into(),
            requested_quantity: 0,
            filters: ItemFilter::default(),
        };
        assert!(item.validate().is_err());

        let request = CreateAssetRequest {
            user_id: Uuid::new_v4(),
            user_email: "dev@example.com".into(),
            location_id: Uuid::new_v4(),
            message: Some("two for the new hires".into()),
            items: vec![CreateRequestItem {
                asset_category: "Laptops".into(),
                requested_quantity: 2,
                filters: ItemFilter::default(),
            }],
        };
        assert!(request.validate().is_ok());
    }
}
