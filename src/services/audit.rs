//! Audit Trail
//!
//! Append-only delete-history rows. The write helpers run on the caller's
//! connection so the audit row commits (or rolls back) atomically with the
//! structural delete it records: an audit entry never exists without the
//! delete having completed, and vice versa.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::{admin_delete_history, user_delete_history};
use crate::errors::ServiceError;

pub async fn record_admin_delete<C: ConnectionTrait>(
    conn: &C,
    deleted_item_name: &str,
    item_type: &str,
    deleted_by: &str,
    reason: &str,
    at: DateTime<Utc>,
) -> Result<(), ServiceError> {
    admin_delete_history::ActiveModel {
        deleted_item_name: Set(deleted_item_name.to_string()),
        item_type: Set(item_type.to_string()),
        deleted_by: Set(deleted_by.to_string()),
        reason: Set(reason.to_string()),
        deleted_at: Set(at),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)?;
    Ok(())
}

pub async fn record_user_delete<C: ConnectionTrait>(
    conn: &C,
    deleted_item_name: &str,
    item_type: &str,
    deleted_by: &str,
    reason: &str,
    at: DateTime<Utc>,
) -> Result<(), ServiceError> {
    user_delete_history::ActiveModel {
        deleted_item_name: Set(deleted_item_name.to_string()),
        item_type: Set(item_type.to_string()),
        deleted_by: Set(deleted_by.to_string()),
        reason: Set(reason.to_string()),
        deleted_at: Set(at),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(ServiceError::db_error)?;
    Ok(())
}

/// Read-side service over both history tables.
#[derive(Clone)]
pub struct AuditService {
    db_pool: Arc<DbPool>,
}

impl AuditService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_admin_history(
        &self,
    ) -> Result<Vec<admin_delete_history::Model>, ServiceError> {
        admin_delete_history::Entity::find()
            .order_by_desc(admin_delete_history::Column::DeletedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_user_history(
        &self,
    ) -> Result<Vec<user_delete_history::Model>, ServiceError> {
        user_delete_history::Entity::find()
            .order_by_desc(user_delete_history::Column::DeletedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}
