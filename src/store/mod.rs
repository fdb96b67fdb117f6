//! Catalog persistence boundary.
//!
//! The pipeline and the query routes talk to the store exclusively through
//! the [`CatalogStore`] trait: idempotent batch upsert keyed on sku, plus
//! the two read paths (offset pagination and multi-field filtering).
//! Backends:
//!
//! - [`redb::RedbCatalogStore`]: embedded ACID store, the production default
//! - [`memory::MemoryCatalogStore`]: in-process map for tests and ephemeral
//!   deployments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::ValidatedProduct;

pub mod memory;
pub mod redb;

pub use self::redb::RedbCatalogStore;

/// Errors surfaced by catalog store backends.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// Backend-level failure (I/O, transaction, corruption).
    #[error("store backend error: {0}")]
    Backend(String),

    /// A record failed (de)serialization at the storage boundary.
    #[error("store codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A record violated a store-level field constraint. This is the
    /// integrity backstop behind the row validator, not a replacement
    /// for it: the validator produces per-row reasons, this aborts the
    /// batch.
    #[error("store constraint violated: {0}")]
    Constraint(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// A persisted product record, addressed by sku.
///
/// `created_at` is fixed at first insert; upserts replace every other field
/// and refresh `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub sku: String,
    pub name: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub mrp: f64,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Build a fresh entry, or carry an existing entry's creation time
    /// forward when the sku is being replaced.
    pub fn from_product(
        product: ValidatedProduct,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sku: product.sku,
            name: product.name,
            brand: product.brand,
            color: product.color,
            size: product.size,
            mrp: product.mrp,
            price: product.price,
            quantity: product.quantity,
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

/// Store-level field constraints, enforced by every backend before a write.
///
/// Deliberately overlaps the row validator (price ≤ mrp, quantity ≥ 0) and
/// additionally pins mrp/price non-negativity, which the validator leaves
/// unchecked.
pub fn check_constraints(product: &ValidatedProduct) -> Result<(), StoreError> {
    if product.mrp < 0.0 {
        return Err(StoreError::Constraint(format!(
            "mrp must be non-negative (sku {}, mrp {})",
            product.sku, product.mrp
        )));
    }
    if product.price < 0.0 {
        return Err(StoreError::Constraint(format!(
            "price must be non-negative (sku {}, price {})",
            product.sku, product.price
        )));
    }
    if product.price > product.mrp {
        return Err(StoreError::Constraint(format!(
            "price must not exceed mrp (sku {})",
            product.sku
        )));
    }
    if product.quantity < 0 {
        return Err(StoreError::Constraint(format!(
            "quantity must be non-negative (sku {})",
            product.sku
        )));
    }
    Ok(())
}

/// Multi-field catalog filter. All present criteria must match; string
/// criteria are case-insensitive substring matches, price bounds are
/// inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub brand: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ProductFilter {
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if let Some(brand) = &self.brand {
            if !contains_ci(&entry.brand, brand) {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !contains_ci(&entry.name, name) {
                return false;
            }
        }
        if let Some(color) = &self.color {
            // A record without a color never matches a color filter.
            match &entry.color {
                Some(c) if contains_ci(c, color) => {}
                _ => return false,
            }
        }
        if let Some(min) = self.min_price {
            if entry.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if entry.price > max {
                return false;
            }
        }
        true
    }
}

/// Persistence operations the ingestion pipeline and query routes consume.
///
/// Implementations must make `upsert_many` idempotent per key (replaying the
/// same batch leaves the catalog unchanged except `updated_at`) and must
/// keep concurrent upserts to distinct skus independent. There is no
/// cross-row atomicity requirement.
pub trait CatalogStore: Send + Sync {
    /// Upsert every product, keyed on sku: create-if-absent, otherwise
    /// replace mutable fields while preserving identity and `created_at`.
    /// Returns the number of records written.
    fn upsert_many(&self, products: Vec<ValidatedProduct>) -> Result<usize, StoreError>;

    /// One page of the catalog in the store's stable order (ascending sku),
    /// plus the total entry count.
    fn find_page(&self, offset: u64, limit: u64) -> Result<(Vec<CatalogEntry>, u64), StoreError>;

    /// All entries matching the filter, unpaginated.
    fn find_by_filter(&self, filter: &ProductFilter) -> Result<Vec<CatalogEntry>, StoreError>;
}
