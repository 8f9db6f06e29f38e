//! Inventory Item Store
//!
//! Uniform access to the nine per-type inventory unit tables. The tables are
//! heterogeneous at the SQL level, so every operation dispatches on the
//! closed [`AssetType`] tag; the `per_type!` macro expands one body per
//! entity module so call sites never repeat the nine-way branch.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    barcode, desktop, laptop, mobile, printer, scanner1, scanner2, scanner3, tablet,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::catalog;

/// Remarks sentinel carried over from the source data: "Yes" marks a unit
/// damaged, "No" (or NULL) marks it sound.
pub const DAMAGED: &str = "Yes";
pub const REPAIRED: &str = "No";

/// Closed discriminator over the nine inventory unit tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AssetType {
    Laptop,
    Mobile,
    Tablet,
    Desktop,
    Printer,
    Scanner1,
    Scanner2,
    Scanner3,
    Barcode,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Laptop => "laptop",
            AssetType::Mobile => "mobile",
            AssetType::Tablet => "tablet",
            AssetType::Desktop => "desktop",
            AssetType::Printer => "printer",
            AssetType::Scanner1 => "scanner1",
            AssetType::Scanner2 => "scanner2",
            AssetType::Scanner3 => "scanner3",
            AssetType::Barcode => "barcode",
        }
    }

    /// Parses a stored or client-supplied tag ("laptop", "scanner3", ...).
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Maps a free-text catalog category name to its type tag via
    /// case-insensitive substring matching. "Barcode Scanners" must win over
    /// the scanner checks, and "Scanner3(OMR Scanner)" over plain "scanner".
    /// `None` is an error condition for callers, never silently ignored.
    pub fn from_category_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.contains("laptop") {
            Some(AssetType::Laptop)
        } else if name.contains("mobile") {
            Some(AssetType::Mobile)
        } else if name.contains("tablet") {
            Some(AssetType::Tablet)
        } else if name.contains("desktop") {
            Some(AssetType::Desktop)
        } else if name.contains("printer") {
            Some(AssetType::Printer)
        } else if name.contains("barcode") {
            Some(AssetType::Barcode)
        } else if name.contains("scanner1") {
            Some(AssetType::Scanner1)
        } else if name.contains("scanner2") {
            Some(AssetType::Scanner2)
        } else if name.contains("scanner3") {
            Some(AssetType::Scanner3)
        } else {
            None
        }
    }
}

/// Expands `$body!(module)` once per unit table, selected by the tag.
macro_rules! per_type {
    ($ty:expr, $body:ident) => {
        match $ty {
            AssetType::Laptop => $body!(laptop),
            AssetType::Mobile => $body!(mobile),
            AssetType::Tablet => $body!(tablet),
            AssetType::Desktop => $body!(desktop),
            AssetType::Printer => $body!(printer),
            AssetType::Scanner1 => $body!(scanner1),
            AssetType::Scanner2 => $body!(scanner2),
            AssetType::Scanner3 => $body!(scanner3),
            AssetType::Barcode => $body!(barcode),
        }
    };
}

/// A unit row lifted out of its per-type table into a uniform shape.
/// Spec fields a table does not carry stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UnitRecord {
    pub id: Uuid,
    pub asset_tag: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
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
    pub is_assigned: bool,
    pub assigned_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub asset_id: Uuid,
}

impl UnitRecord {
    pub fn is_damaged(&self) -> bool {
        self.remarks.as_deref() == Some(DAMAGED)
    }

    pub fn display(&self) -> DisplayFields {
        DisplayFields {
            asset_tag: self.asset_tag.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
        }
    }
}

/// Display projection resolved for assigned-asset detail listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DisplayFields {
    pub asset_tag: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

macro_rules! unit_record_from {
    ($module:ident { $($spec:ident),* $(,)? }) => {
        impl From<$module::Model> for UnitRecord {
            fn from(m: $module::Model) -> Self {
                UnitRecord {
                    id: m.id,
                    asset_tag: m.asset_tag,
                    brand: Some(m.brand),
                    model: m.model,
                    is_assigned: m.is_assigned,
                    assigned_date: m.assigned_date,
                    remarks: m.remarks,
                    asset_id: m.asset_id,
                    $($spec: Some(m.$spec),)*
                    ..Default::default()
                }
            }
        }
    };
}

unit_record_from!(laptop { processor, ram, storage, operating_system });
unit_record_from!(desktop { processor, ram, storage, operating_system });
unit_record_from!(mobile { processor, ram, storage, network_type, sim_type });
unit_record_from!(tablet { processor, ram, storage, network_type, sim_type, sim_support });
unit_record_from!(printer { printer_type, paper_size, dpi });
unit_record_from!(scanner1 { scanner_type, scanner_resolution });
unit_record_from!(scanner2 { scanner_type, scanner_resolution });
unit_record_from!(scanner3 { scanner_type, scanner_resolution });
unit_record_from!(barcode { scan_type, technology });

/// Optional spec filters for matching eligible units. A field applies only
/// when non-empty, and only the fields relevant for the unit's type are
/// consulted; comparison is exact, case-insensitive equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ItemFilter {
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
}

fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(wanted) => actual
            .as_deref()
            .map(|actual| actual.trim().eq_ignore_ascii_case(wanted))
            .unwrap_or(false),
    }
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.relevant_pairs_all().iter().all(|(wanted, _)| {
            matches!(wanted.as_deref().map(str::trim), None | Some(""))
        })
    }

    fn relevant_pairs_all(&self) -> Vec<(&Option<String>, &str)> {
        vec![
            (&self.brand, "brand"),
            (&self.processor, "processor"),
            (&self.storage, "storage"),
            (&self.ram, "ram"),
            (&self.operating_system, "operating_system"),
            (&self.network_type, "network_type"),
            (&self.sim_type, "sim_type"),
            (&self.sim_support, "sim_support"),
            (&self.printer_type, "printer_type"),
            (&self.paper_size, "paper_size"),
            (&self.dpi, "dpi"),
            (&self.scanner_type, "scanner_type"),
            (&self.scanner_resolution, "scanner_resolution"),
            (&self.scan_type, "scan_type"),
            (&self.technology, "technology"),
        ]
    }

    /// True when `unit` satisfies every non-empty filter field relevant for
    /// `ty`. Fields outside the type's relevance set are ignored even when
    /// set, matching how the per-type screens queried the source tables.
    pub fn matches(&self, ty: AssetType, unit: &UnitRecord) -> bool {
        let base = field_matches(&self.brand, &unit.brand)
            && field_matches(&self.processor, &unit.processor)
            && field_matches(&self.storage, &unit.storage)
            && field_matches(&self.ram, &unit.ram);

        match ty {
            AssetType::Laptop | AssetType::Desktop => {
                base && field_matches(&self.operating_system, &unit.operating_system)
            }
            AssetType::Mobile => {
                base && field_matches(&self.network_type, &unit.network_type)
                    && field_matches(&self.sim_type, &unit.sim_type)
            }
            AssetType::Tablet => {
                base && field_matches(&self.network_type, &unit.network_type)
                    && field_matches(&self.sim_type, &unit.sim_type)
                    && field_matches(&self.sim_support, &unit.sim_support)
            }
            AssetType::Printer => {
                field_matches(&self.printer_type, &unit.printer_type)
                    && field_matches(&self.paper_size, &unit.paper_size)
                    && field_matches(&self.dpi, &unit.dpi)
            }
            AssetType::Scanner1 | AssetType::Scanner2 | AssetType::Scanner3 => {
                field_matches(&self.scanner_type, &unit.scanner_type)
                    && field_matches(&self.scanner_resolution, &unit.scanner_resolution)
            }
            AssetType::Barcode => {
                field_matches(&self.scan_type, &unit.scan_type)
                    && field_matches(&self.technology, &unit.technology)
            }
        }
    }
}

/// Finds one unit by id in the table selected by `ty`.
pub async fn find_unit<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    id: Uuid,
) -> Result<Option<UnitRecord>, ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find_by_id(id)
                .one(conn)
                .await
                .map_err(ServiceError::db_error)?
                .map(UnitRecord::from)
        };
    }
    Ok(per_type!(ty, go))
}

/// Finds one unit by asset tag; used for the duplicate-tag check.
pub async fn find_unit_by_tag<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    tag: &str,
) -> Result<Option<UnitRecord>, ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find()
                .filter($m::Column::AssetTag.eq(tag))
                .one(conn)
                .await
                .map_err(ServiceError::db_error)?
                .map(UnitRecord::from)
        };
    }
    Ok(per_type!(ty, go))
}

/// All units of one type, stable id order.
pub async fn list_units<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
) -> Result<Vec<UnitRecord>, ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find()
                .order_by_asc($m::Column::Id)
                .all(conn)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(UnitRecord::from)
                .collect()
        };
    }
    Ok(per_type!(ty, go))
}

/// Units of `ty` that are unassigned, undamaged, and satisfy `filter`.
/// Callers that assign must not trust this listing: availability is
/// re-checked by [`claim_unit`] inside the assignment transaction.
pub async fn list_available<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    filter: &ItemFilter,
) -> Result<Vec<UnitRecord>, ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find()
                .filter($m::Column::IsAssigned.eq(false))
                .filter(
                    Condition::any()
                        .add($m::Column::Remarks.is_null())
                        .add($m::Column::Remarks.ne(DAMAGED)),
                )
                .order_by_asc($m::Column::Id)
                .all(conn)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(UnitRecord::from)
                .collect::<Vec<UnitRecord>>()
        };
    }
    let mut units: Vec<UnitRecord> = per_type!(ty, go);
    units.retain(|unit| filter.matches(ty, unit));
    Ok(units)
}

/// Batch-fetches units of one type by id, keyed for O(1) joins when
/// resolving assigned-asset display details (one query per referenced
/// table instead of one per row).
pub async fn fetch_units_by_ids<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, UnitRecord>, ServiceError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find()
                .filter($m::Column::Id.is_in(ids.iter().copied()))
                .all(conn)
                .await
                .map_err(ServiceError::db_error)?
                .into_iter()
                .map(UnitRecord::from)
                .collect::<Vec<UnitRecord>>()
        };
    }
    let units: Vec<UnitRecord> = per_type!(ty, go);
    Ok(units.into_iter().map(|u| (u.id, u)).collect())
}

/// Atomically claims one unit for assignment: a conditional update flips
/// `is_assigned` only while the row is still unassigned and undamaged.
/// Zero affected rows means the unit was taken (or damaged) after the
/// caller last looked; the whole surrounding transaction must abort.
pub async fn claim_unit<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    id: Uuid,
    at: DateTime<Utc>,
) -> Result<UnitRecord, ServiceError> {
    let current = find_unit(conn, ty, id).await?.ok_or_else(|| {
        ServiceError::NotFound(format!("{} item with id {} not found", ty, id))
    })?;

    macro_rules! go {
        ($m:ident) => {
            $m::Entity::update_many()
                .col_expr($m::Column::IsAssigned, Expr::value(true))
                .col_expr($m::Column::AssignedDate, Expr::value(Some(at)))
                .filter($m::Column::Id.eq(id))
                .filter($m::Column::IsAssigned.eq(false))
                .filter(
                    Condition::any()
                        .add($m::Column::Remarks.is_null())
                        .add($m::Column::Remarks.ne(DAMAGED)),
                )
                .exec(conn)
                .await
                .map_err(ServiceError::db_error)?
                .rows_affected
        };
    }
    let affected = per_type!(ty, go);

    if affected == 0 {
        if current.is_damaged() {
            return Err(ServiceError::BadRequest(format!(
                "Item {} is damaged and cannot be assigned",
                current.asset_tag
            )));
        }
        return Err(ServiceError::ConcurrentModification(format!(
            "Item {} is no longer available",
            current.asset_tag
        )));
    }

    Ok(current)
}

/// Releases a unit back to stock.
pub async fn release_unit<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    id: Uuid,
) -> Result<(), ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::update_many()
                .col_expr($m::Column::IsAssigned, Expr::value(false))
                .col_expr(
                    $m::Column::AssignedDate,
                    Expr::value(None::<DateTime<Utc>>),
                )
                .filter($m::Column::Id.eq(id))
                .exec(conn)
                .await
                .map_err(ServiceError::db_error)?
        };
    }
    per_type!(ty, go);
    Ok(())
}

/// Flags a unit damaged (remarks sentinel).
pub async fn mark_damaged<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    id: Uuid,
) -> Result<(), ServiceError> {
    set_remarks(conn, ty, id, DAMAGED).await
}

/// Clears the damage flag after repair.
pub async fn clear_damage<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    id: Uuid,
) -> Result<(), ServiceError> {
    set_remarks(conn, ty, id, REPAIRED).await
}

async fn set_remarks<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
    id: Uuid,
    value: &str,
) -> Result<(), ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::update_many()
                .col_expr($m::Column::Remarks, Expr::value(Some(value.to_string())))
                .filter($m::Column::Id.eq(id))
                .exec(conn)
                .await
                .map_err(ServiceError::db_error)?
        };
    }
    per_type!(ty, go);
    Ok(())
}

/// Total units of one type.
pub async fn count_units<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
) -> Result<u64, ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find()
                .count(conn)
                .await
                .map_err(ServiceError::db_error)?
        };
    }
    Ok(per_type!(ty, go))
}

/// Units of one type currently assigned.
pub async fn count_assigned<C: ConnectionTrait>(
    conn: &C,
    ty: AssetType,
) -> Result<u64, ServiceError> {
    macro_rules! go {
        ($m:ident) => {
            $m::Entity::find()
                .filter($m::Column::IsAssigned.eq(true))
                .count(conn)
                .await
                .map_err(ServiceError::db_error)?
        };
    }
    Ok(per_type!(ty, go))
}

/// Payload for registering a new physical unit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUnitPayload {
    /// Catalog category name; created when absent.
    #[validate(length(min = 1, message = "Asset category is required"))]
    pub asset_category: String,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    pub model: Option<String>,
    #[validate(length(min = 1, message = "Asset tag is required"))]
    pub asset_tag: String,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
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
    /// Register the unit as already damaged; requires `damage_reason`.
    #[serde(default)]
    pub is_damaged: bool,
    pub damage_reason: Option<String>,
}

fn require_spec(
    value: &Option<String>,
    field: &str,
    ty: AssetType,
) -> Result<String, ServiceError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::BadRequest(format!(
            "{} is required for {} units",
            field, ty
        ))),
    }
}

/// Handler-facing surface over the unit tables.
#[derive(Clone)]
pub struct ItemStoreService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl ItemStoreService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new unit: duplicate-tag check, category resolution
    /// (created when absent), insert, and, when registered damaged, the
    /// damage-ledger row, all in one transaction.
    #[instrument(skip(self, payload), fields(asset_type = %ty, asset_tag = %payload.asset_tag))]
    pub async fn create_unit(
        &self,
        ty: AssetType,
        payload: CreateUnitPayload,
    ) -> Result<UnitRecord, ServiceError> {
        payload.validate()?;

        if payload.is_damaged
            && payload
                .damage_reason
                .as_deref()
                .map(str::trim)
                .map_or(true, str::is_empty)
        {
            return Err(ServiceError::BadRequest(
                "Damage reason is required when registering a damaged unit".to_string(),
            ));
        }

        let db = &*self.db_pool;

        if find_unit_by_tag(db, ty, &payload.asset_tag).await?.is_some() {
            return Err(ServiceError::BadRequest(format!(
                "Asset tag {} already exists for {} units",
                payload.asset_tag, ty
            )));
        }

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let category = catalog::find_or_create_by_name(&txn, &payload.asset_category).await?;
        let remarks = if payload.is_damaged {
            Some(DAMAGED.to_string())
        } else {
            None
        };

        macro_rules! insert_unit {
            ($m:ident, [$($spec:ident),*]) => {{
                let active = $m::ActiveModel {
                    brand: Set(payload.brand.clone()),
                    model: Set(payload.model.clone()),
                    asset_tag: Set(payload.asset_tag.clone()),
                    is_assigned: Set(false),
                    assigned_date: Set(None),
                    remarks: Set(remarks.clone()),
                    asset_id: Set(category.id),
                    $($spec: Set(require_spec(&payload.$spec, stringify!($spec), ty)?),)*
                    ..Default::default()
                };
                let model = active.insert(&txn).await.map_err(ServiceError::db_error)?;
                UnitRecord::from(model)
            }};
        }

        let unit = match ty {
            AssetType::Laptop => insert_unit!(laptop, [processor, ram, storage, operating_system]),
            AssetType::Desktop => {
                insert_unit!(desktop, [processor, ram, storage, operating_system])
            }
            AssetType::Mobile => {
                insert_unit!(mobile, [processor, ram, storage, network_type, sim_type])
            }
            AssetType::Tablet => insert_unit!(
                tablet,
                [processor, ram, storage, network_type, sim_type, sim_support]
            ),
            AssetType::Printer => insert_unit!(printer, [printer_type, paper_size, dpi]),
            AssetType::Scanner1 => insert_unit!(scanner1, [scanner_type, scanner_resolution]),
            AssetType::Scanner2 => insert_unit!(scanner2, [scanner_type, scanner_resolution]),
            AssetType::Scanner3 => insert_unit!(scanner3, [scanner_type, scanner_resolution]),
            AssetType::Barcode => insert_unit!(barcode, [scan_type, technology]),
        };

        if payload.is_damaged {
            let reason = payload.damage_reason.clone().unwrap_or_default();
            let damaged = crate::entities::damaged_asset::ActiveModel {
                asset_type: Set(ty.as_str().to_string()),
                asset_type_item_id: Set(unit.id),
                asset_tag: Set(unit.asset_tag.clone()),
                reason: Set(reason),
                reported_at: Set(Utc::now()),
                ..Default::default()
            };
            damaged.insert(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(unit_id = %unit.id, "Inventory unit registered");
        let _ = self
            .event_sender
            .send(Event::UnitCreated {
                asset_type: ty.as_str().to_string(),
                unit_id: unit.id,
            })
            .await;

        Ok(unit)
    }

    pub async fn list_units(&self, ty: AssetType) -> Result<Vec<UnitRecord>, ServiceError> {
        list_units(&*self.db_pool, ty).await
    }

    pub async fn list_available(
        &self,
        ty: AssetType,
        filter: &ItemFilter,
    ) -> Result<Vec<UnitRecord>, ServiceError> {
        list_available(&*self.db_pool, ty, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dell_laptop() -> UnitRecord {
        UnitRecord {
            id: Uuid::new_v4(),
            asset_tag: "LAP-0001".into(),
            brand: Some("Dell".into()),
            processor: Some("i7".into()),
            ram: Some("16GB".into()),
            storage: Some("512GB".into()),
            operating_system: Some("Windows 11".into()),
            ..Default::default()
        }
    }

    #[test]
    fn category_names_normalize_to_tags() {
        assert_eq!(
            AssetType::from_category_name("Laptops"),
            Some(AssetType::Laptop)
        );
        assert_eq!(
            AssetType::from_category_name("Barcode Scanners"),
            Some(AssetType::Barcode)
        );
        assert_eq!(
            AssetType::from_category_name("Scanner3(OMR Scanner)"),
            Some(AssetType::Scanner3)
        );
        assert_eq!(
            AssetType::from_category_name("scanner1(Flatbed)"),
            Some(AssetType::Scanner1)
        );
        assert_eq!(AssetType::from_category_name("Projectors"), None);
        assert_eq!(AssetType::from_category_name("Scanners"), None);
    }

    #[test]
    fn tag_round_trip() {
        assert_eq!(AssetType::Laptop.as_str(), "laptop");
        assert_eq!(AssetType::parse("laptop"), Some(AssetType::Laptop));
        assert_eq!(AssetType::parse("SCANNER3"), Some(AssetType::Scanner3));
        assert_eq!(AssetType::parse("toaster"), None);
        assert_eq!(AssetType::Barcode.to_string(), "barcode");
    }

    #[test]
    fn filter_matching_is_case_insensitive_and_exact() {
        let unit = dell_laptop();
        let filter = ItemFilter {
            brand: Some("dell".into()),
            ..Default::default()
        };
        assert!(filter.matches(AssetType::Laptop, &unit));

        let filter = ItemFilter {
            brand: Some("Del".into()),
            ..Default::default()
        };
        assert!(!filter.matches(AssetType::Laptop, &unit));
    }

    #[test]
    fn empty_filter_fields_are_ignored() {
        let unit = dell_laptop();
        let filter = ItemFilter {
            brand: Some("".into()),
            processor: Some("  ".into()),
            ..Default::default()
        };
        assert!(filter.matches(AssetType::Laptop, &unit));
        assert!(filter.is_empty());
    }

    #[test]
    fn irrelevant_fields_are_not_applied() {
        // A printer_type filter must not exclude laptops, which have no
        // printer_type at all.
        let unit = dell_laptop();
        let filter = ItemFilter {
            printer_type: Some("LaserJet".into()),
            ..Default::default()
        };
        assert!(filter.matches(AssetType::Laptop, &unit));
        assert!(!filter.matches(AssetType::Printer, &unit));
    }

    #[test]
    fn damaged_units_are_flagged() {
        let mut unit = dell_laptop();
        assert!(!unit.is_damaged());
        unit.remarks = Some(DAMAGED.to_string());
        assert!(unit.is_damaged());
        unit.remarks = Some(REPAIRED.to_string());
        assert!(!unit.is_damaged());
    }
}
