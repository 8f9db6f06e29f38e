use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a concrete unit handed out against a request item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Assigned,
    Returned,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Returned => "returned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "assigned" => Some(AssignmentStatus::Assigned),
            "returned" => Some(AssignmentStatus::Returned),
            _ => None,
        }
    }
}

/// The binding record bridging a request item to one concrete inventory
/// unit. `asset_type` + `asset_type_item_id` form a weak reference into the
/// unit table selected by the type tag; there is no enforced foreign key
/// because the discriminator spans nine tables.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assigned_assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub asset_request_item_id: Uuid,
    pub asset_type: String,
    pub asset_type_item_id: Uuid,
    pub status: String,
    pub assigned_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset_request_item::Entity",
        from = "Column::AssetRequestItemId",
        to = "super::asset_request_item::Column::Id",
        on_delete = "Cascade"
    )]
    RequestItem,
}

impl Related<super::asset_request_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestItem.def()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        assert_eq!(AssignmentStatus::Assigned.as_str(), "assigned");
        assert_eq!(
            AssignmentStatus::from_str("Returned"),
            Some(AssignmentStatus::Returned)
        );
        assert_eq!(AssignmentStatus::from_str("lost"), None);
    }
}
