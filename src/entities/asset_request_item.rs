use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One category-line within an asset request. The optional spec columns act
/// as filters when matching eligible inventory units; a field only applies
/// when non-empty, and only the fields relevant for the category's
/// normalized type are consulted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_request_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub asset_request_id: Uuid,
    /// Requested catalog category.
    pub asset_id: Uuid,
    pub requested_quantity: i32,
    pub approved_quantity: Option<i32>,
    pub partial_reason: Option<String>,
    pub brand: Option<String>,
    pub processor: Option<String>,
    pub storage: Option<String>,
    pub ram: Option<String>,
    pub operating_system: Option<String>,
    pub network_type: Option<String>,
    pub sim_type: Option<String>,
    pub sim_support: Option<String>,
    pub printer_type: Option<String>,
    pub paper_size: Option<String>,
    pub dpi: Option<String>,
    pub scanner_type: Option<String>,
    pub scanner_resolution: Option<String>,
    pub scan_type: Option<String>,
    pub technology: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset_request::Entity",
        from = "Column::AssetRequestId",
        to = "super::asset_request::Column::Id",
        on_delete = "Cascade"
    )]
    Request,
    #[sea_orm(has_many = "super::assigned_asset::Entity")]
    Assignments,
}

impl Related<super::asset_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::assigned_asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.created_at = Set(now);
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
        }

        active_model.updated_at = Set(Some(now));

        Ok(active_model)
    }
}
