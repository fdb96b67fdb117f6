//! skustore - seller catalog ingestion service
//!
//! This crate provides an HTTP service that ingests seller product catalogs
//! uploaded as CSV files, validates each row against business rules, and
//! durably stores valid rows via an idempotent upsert keyed on SKU. It
//! supports:
//!
//! - **Bulk Ingestion**: Streaming CSV decode with per-row validation and a
//!   single batch upsert per upload
//! - **Catalog Queries**: Paginated listing and multi-field filtered search
//! - **Health Checks**: Liveness and store-readiness probes
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use skustore::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     skustore::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (checks the store)
//! - `POST /api/upload` - Upload a catalog CSV (multipart field `file`)
//! - `GET /api/products` - Paginated listing (`page`, `limit`)
//! - `GET /api/products/search` - Filtered search (`brand`, `name`,
//!   `color`, `minPrice`, `maxPrice`)
//!
//! See README.md for response shapes and the rejection-reason taxonomy.

pub mod config;
pub mod error;
pub mod ingest;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server};
pub use state::AppState;
