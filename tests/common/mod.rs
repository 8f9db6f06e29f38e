//! Shared harness for integration tests: an in-memory SQLite database with
//! the embedded migrations applied and the full service layer wired up.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;

use assettrack_api::db::{self, DbConfig};
use assettrack_api::events::{process_events, EventSender};
use assettrack_api::handlers::AppServices;
use assettrack_api::services::item_store::{AssetType, CreateUnitPayload, UnitRecord};
use assettrack_api::services::requests::{
    AssetRequestDetail, CreateAssetRequest, CreateRequestItem,
};
use assettrack_api::services::item_store::ItemFilter;
use uuid::Uuid;

pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub services: AppServices,
}

impl TestApp {
    pub async fn new() -> Self {
        // A pooled sqlite::memory: database is per-connection; pin the pool
        // to one connection so every query sees the migrated schema.
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&config)
            .await
            .expect("sqlite memory connection");
        db::run_migrations(&pool).await.expect("migrations");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(process_events(rx));
        let services = AppServices::new(db.clone(), EventSender::new(tx));

        Self { db, services }
    }

    /// Registers a sound laptop under the "Laptops" category.
    pub async fn seed_laptop(&self, brand: &str, tag: &str) -> UnitRecord {
        self.services
            .item_store
            .create_unit(
                AssetType::Laptop,
                CreateUnitPayload {
                    asset_category: "Laptops".to_string(),
                    brand: brand.to_string(),
                    model: Some("Latitude 5440".to_string()),
                    asset_tag: tag.to_string(),
                    processor: Some("i7".to_string()),
                    ram: Some("16GB".to_string()),
                    storage: Some("512GB".to_string()),
                    operating_system: Some("Windows 11".to_string()),
                    network_type: None,
                    sim_type: None,
                    sim_support: None,
                    printer_type: None,
                    paper_size: None,
                    dpi: None,
                    scanner_type: None,
                    scanner_resolution: None,
                    scan_type: None,
                    technology: None,
                    is_damaged: false,
                    damage_reason: None,
                },
            )
            .await
            .expect("seed laptop")
    }

    /// Submits a pending request for laptops, optionally filtered by brand.
    pub async fn submit_laptop_request(
        &self,
        quantity: i32,
        brand: Option<&str>,
    ) -> AssetRequestDetail {
        self.services
            .requests
            .create_request(CreateAssetRequest {
                user_id: Uuid::new_v4(),
                user_email: "requester@example.com".to_string(),
                location_id: Uuid::new_v4(),
                message: None,
                items: vec![CreateRequestItem {
                    asset_category: "Laptops".to_string(),
                    requested_quantity: quantity,
                    filters: ItemFilter {
                        brand: brand.map(str::to_string),
                        ..Default::default()
                    },
                }],
            })
            .await
            .expect("create request")
    }
}
