//! API route handlers
//!
//! This module contains all HTTP endpoint implementations for the catalog
//! service. Routes are organized by functionality:
//!
//! - `health`: Health and readiness checks
//! - `catalog`: CSV upload, paginated listing, filtered search

pub mod catalog;
pub mod health;

use crate::error::{ApiError, ApiResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Returns service information including version and available endpoints.
/// This is the root endpoint (GET /) and requires no authentication.
pub async fn api_info() -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "skustore",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/upload",
            "/api/products",
            "/api/products/search",
            "/health",
            "/ready"
        ]
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
