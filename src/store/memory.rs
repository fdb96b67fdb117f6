//! In-memory catalog store for tests and ephemeral deployments.
//!
//! Keeps entries in a `BTreeMap` keyed by sku, so iteration order matches
//! the redb backend's ascending-key order and the two backends stay
//! interchangeable in tests.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::ingest::ValidatedProduct;
use crate::store::{
    check_constraints, CatalogEntry, CatalogStore, ProductFilter, StoreError,
};

#[derive(Default)]
pub struct MemoryCatalogStore {
    entries: Mutex<BTreeMap<String, CatalogEntry>>,
    batches: AtomicUsize,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `upsert_many` calls received. Lets pipeline tests assert
    /// that uploads with an empty accepted set never touch the store.
    pub fn upsert_batches(&self) -> usize {
        self.batches.load(Ordering::Relaxed)
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn upsert_many(&self, products: Vec<ValidatedProduct>) -> Result<usize, StoreError> {
        self.batches.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("store mutex poisoned"))?;

        let mut written = 0usize;
        for product in products {
            check_constraints(&product)?;
            let created_at = entries.get(&product.sku).map(|e| e.created_at);
            let entry = CatalogEntry::from_product(product, created_at, now);
            entries.insert(entry.sku.clone(), entry);
            written += 1;
        }
        Ok(written)
    }

    fn find_page(&self, offset: u64, limit: u64) -> Result<(Vec<CatalogEntry>, u64), StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("store mutex poisoned"))?;
        let total = entries.len() as u64;
        let page = entries
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    fn find_by_filter(&self, filter: &ProductFilter) -> Result<Vec<CatalogEntry>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::backend("store mutex poisoned"))?;
        Ok(entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}
