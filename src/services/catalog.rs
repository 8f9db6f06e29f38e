//! Asset Catalog
//!
//! Logical categories with a derived available quantity. The quantity is
//! never stored: it is recomputed from the unit tables on every read and
//! floored at zero, so it can never drift from the source of truth.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::asset;
use crate::errors::ServiceError;
use crate::services::item_store::{self, AssetType};

/// Catalog entry projected for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetSummary {
    pub id: Uuid,
    pub name: String,
    pub pre_code: String,
    /// Units currently available for assignment (total − assigned, floor 0).
    pub quantity: u64,
    pub created_at: DateTime<Utc>,
}

/// Derives a tag prefix from a category name: the first three alphabetic
/// characters, uppercased ("Laptops" → "LAP").
fn derive_pre_code(name: &str) -> String {
    let code: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect();
    if code.is_empty() {
        "AST".to_string()
    } else {
        code.to_ascii_uppercase()
    }
}

/// Finds a category by name (case-insensitive), creating it when absent.
/// Used by unit registration; runs on the caller's connection so it can
/// participate in a transaction.
pub async fn find_or_create_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<asset::Model, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::BadRequest(
            "Asset category name must not be empty".to_string(),
        ));
    }

    let existing = asset::Entity::find()
        .all(conn)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .find(|a| a.name.eq_ignore_ascii_case(name));

    if let Some(found) = existing {
        return Ok(found);
    }

    let active = asset::ActiveModel {
        name: Set(name.to_string()),
        pre_code: Set(derive_pre_code(name)),
        ..Default::default()
    };
    active.insert(conn).await.map_err(ServiceError::db_error)
}

/// Finds a category by name without creating it.
pub async fn find_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<asset::Model>, ServiceError> {
    let name = name.trim();
    Ok(asset::Entity::find()
        .all(conn)
        .await
        .map_err(ServiceError::db_error)?
        .into_iter()
        .find(|a| a.name.eq_ignore_ascii_case(name)))
}

/// Available quantity for a category's normalized type.
pub async fn quantity<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
) -> Result<u64, ServiceError> {
    let total = item_store::count_units(conn, ty).await?;
    let assigned = item_store::count_assigned(conn, ty).await?;
    Ok(total.saturating_sub(assigned))
}

/// Read-side service over the catalog.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists categories with their derived quantity. Categories whose name
    /// does not normalize to a known type have no unit table and list as
    /// zero.
    #[instrument(skip(self))]
    pub async fn list_assets(&self) -> Result<Vec<AssetSummary>, ServiceError> {
        let db = &*self.db_pool;

        let categories = asset::Entity::find()
            .order_by_asc(asset::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut summaries = Vec::with_capacity(categories.len());
        for category in categories {
            let available = match AssetType::from_category_name(&category.name) {
                Some(ty) => quantity(db, ty).await?,
                None => 0,
            };
            summaries.push(AssetSummary {
                id: category.id,
                name: category.name,
                pre_code: category.pre_code,
                quantity: available,
                created_at: category.created_at,
            });
        }

        Ok(summaries)
    }

    pub async fn get_asset(&self, id: Uuid) -> Result<AssetSummary, ServiceError> {
        let db = &*self.db_pool;
        let category = asset::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Asset category {} not found", id)))?;

        let available = match AssetType::from_category_name(&category.name) {
            Some(ty) => quantity(db, ty).await?,
            None => 0,
        };

        Ok(AssetSummary {
            id: category.id,
            name: category.name,
            pre_code: category.pre_code,
            quantity: available,
            created_at: category.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_codes_derive_from_names() {
        assert_eq!(derive_pre_code("Laptops"), "LAP");
        assert_eq!(derive_pre_code("Barcode Scanners"), "BAR");
        assert_eq!(derive_pre_code("  42  "), "AST");
    }
}
