pub mod catalog;
pub mod damaged;
pub mod history;
pub mod inventory;
pub mod requests;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub requests: Arc<crate::services::requests::RequestService>,
    pub assignments: Arc<crate::services::assignments::AssignmentService>,
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub damaged: Arc<crate::services::damaged::DamageService>,
    pub audit: Arc<crate::services::audit::AuditService>,
    pub item_store: Arc<crate::services::item_store::ItemStoreService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            requests: Arc::new(crate::services::requests::RequestService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            assignments: Arc::new(crate::services::assignments::AssignmentService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            catalog: Arc::new(crate::services::catalog::CatalogService::new(
                db_pool.clone(),
            )),
            damaged: Arc::new(crate::services::damaged::DamageService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            audit: Arc::new(crate::services::audit::AuditService::new(db_pool.clone())),
            item_store: Arc::new(crate::services::item_store::ItemStoreService::new(
                db_pool,
                event_sender,
            )),
        }
    }
}
