//! Damage/Repair Ledger
//!
//! Open damage records and the append-only repair history. A repair removes
//! the damage record, resets the unit's remarks sentinel, and writes the
//! history row in one transaction.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{damaged_asset, repair_history};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::item_store::{self, AssetType};

const REPAIR_REMARKS: &str = "Repaired successfully";

#[derive(Clone)]
pub struct DamageService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl DamageService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Open damage records, newest first.
    #[instrument(skip(self))]
    pub async fn list_damaged(&self) -> Result<Vec<damaged_asset::Model>, ServiceError> {
        damaged_asset::Entity::find()
            .order_by_desc(damaged_asset::Column::ReportedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Marks a damaged unit repaired: one repair-history row, remarks reset
    /// on the unit, damage record removed.
    #[instrument(skip(self), fields(damaged_id = %damaged_id))]
    pub async fn repair(&self, damaged_id: Uuid) -> Result<repair_history::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let damaged = damaged_asset::Entity::find_by_id(damaged_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Damaged asset {} not found", damaged_id))
            })?;

        let history = repair_history::ActiveModel {
            asset_type: Set(damaged.asset_type.clone()),
            asset_tag: Set(damaged.asset_tag.clone()),
            repaired_at: Set(now),
            remarks: Set(REPAIR_REMARKS.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        match AssetType::parse(&damaged.asset_type) {
            Some(ty) => {
                item_store::clear_damage(&txn, ty, damaged.asset_type_item_id).await?;
            }
            None => warn!(
                damaged_id = %damaged_id,
                asset_type = %damaged.asset_type,
                "Damage record carries unknown asset type; ledger row removed without remarks reset"
            ),
        }

        damaged_asset::Entity::delete_by_id(damaged_id)
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(asset_tag = %history.asset_tag, "Damaged asset repaired");
        let _ = self
            .event_sender
            .send(Event::AssetRepaired {
                asset_tag: history.asset_tag.clone(),
            })
            .await;

        Ok(history)
    }

    /// Append-only repair history, newest first.
    #[instrument(skip(self))]
    pub async fn list_repair_history(
        &self,
    ) -> Result<Vec<repair_history::Model>, ServiceError> {
        repair_history::Entity::find()
            .order_by_desc(repair_history::Column::RepairedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
