//! AssetTrack API Library
//!
//! IT-asset inventory and request lifecycle service: employees submit asset
//! requests, administrators approve/assign/reject them against per-type
//! inventory tables, returns and damage reports release and quarantine
//! units, and every delete leaves an audit row.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}


// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

// API route tree under /api/v1
pub fn api_v1_routes() -> Router<AppState> {
    let asset_requests = Router::new()
        .route(
            "/asset-requests",
            get(handlers::requests::list_asset_requests)
                .post(handlers::requests::create_asset_request),
        )
        .route(
            "/asset-requests/:id",
            get(handlers::requests::get_asset_request)
                .delete(handlers::requests::delete_request),
        )
        .route(
            "/asset-requests/:id/confirm-approve",
            axum::routing::post(handlers::requests::confirm_approve),
        )
        .route(
            "/asset-requests/:id/reject",
            axum::routing::post(handlers::requests::reject_request),
        )
        .route(
            "/asset-requests/:id/cancel",
            axum::routing::post(handlers::requests::cancel_request),
        )
        .route(
            "/asset-requests/return-item/:assigned_id",
            axum::routing::post(handlers::requests::return_item),
        );

    let catalog = Router::new()
        .route("/assets", get(handlers::catalog::list_assets))
        .route("/assets/:id", get(handlers::catalog::get_asset));

    let inventory = Router::new()
        .route(
            "/inventory/:asset_type",
            get(handlers::inventory::list_units).post(handlers::inventory::create_unit),
        )
        .route(
            "/inventory/:asset_type/available",
            get(handlers::inventory::list_available),
        );

    let damage = Router::new()
        .route("/damaged-assets", get(handlers::damaged::list_damaged))
        .route(
            "/damaged-assets/repair/:id",
            axum::routing::post(handlers::damaged::repair),
        )
        .route(
            "/repair-history",
            get(handlers::damaged::list_repair_history),
        );

    let history = Router::new()
        .route(
            "/history/admin-deletes",
            get(handlers::history::list_admin_deletes),
        )
        .route(
            "/history/user-deletes",
            get(handlers::history::list_user_deletes),
        );

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(asset_requests)
        .merge(catalog)
        .merge(inventory)
        .merge(damage)
        .merge(history)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "assettrack-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_wraps_data() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
    }

    #[test]
    fn error_response_carries_message() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("oops"));
    }
}
