//! Redb (Rust embedded database) backend for the catalog store.
//!
//! Redb is a pure Rust embedded key-value store with ACID transactions, so
//! the service needs no external database process. One table maps sku to a
//! JSON-encoded [`CatalogEntry`]; the whole upload batch is applied inside
//! a single write transaction, which gives the per-key upsert atomicity the
//! pipeline relies on (and, incidentally, batch atomicity the contract does
//! not promise).
//!
//! # Thread safety
//! The `Arc<Database>` wrapper allows safe sharing across request handlers.
//! Redb handles its own internal locking and MVCC.

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use crate::ingest::ValidatedProduct;
use crate::store::{
    check_constraints, CatalogEntry, CatalogStore, ProductFilter, StoreError,
};

/// Table definition for the catalog: sku → JSON-encoded entry.
const CATALOG_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("catalog_products");

/// Catalog store backed by a redb database file.
pub struct RedbCatalogStore {
    db: Arc<Database>,
}

impl RedbCatalogStore {
    /// Open or create a redb database at the given path and ensure the
    /// catalog table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::backend(e.to_string()))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            // Accessing the table creates it if it doesn't exist.
            let _table = write_txn
                .open_table(CATALOG_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl CatalogStore for RedbCatalogStore {
    fn upsert_many(&self, products: Vec<ValidatedProduct>) -> Result<usize, StoreError> {
        let now = Utc::now();
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut written = 0usize;
        {
            let mut table = write_txn
                .open_table(CATALOG_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;

            for product in products {
                check_constraints(&product)?;

                // Replacing an existing sku keeps its creation timestamp.
                let created_at = {
                    let existing = table
                        .get(product.sku.as_str())
                        .map_err(|e| StoreError::backend(e.to_string()))?;
                    match existing {
                        Some(guard) => {
                            let entry: CatalogEntry = serde_json::from_slice(guard.value())?;
                            Some(entry.created_at)
                        }
                        None => None,
                    }
                };

                let entry = CatalogEntry::from_product(product, created_at, now);
                let encoded = serde_json::to_vec(&entry)?;
                table
                    .insert(entry.sku.as_str(), encoded.as_slice())
                    .map_err(|e| StoreError::backend(e.to_string()))?;
                written += 1;
            }
        }

        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(written)
    }

    fn find_page(&self, offset: u64, limit: u64) -> Result<(Vec<CatalogEntry>, u64), StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(CATALOG_TABLE)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let total = table
            .len()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut entries = Vec::new();
        for item in table
            .iter()
            .map_err(|e| StoreError::backend(e.to_string()))?
            .skip(offset as usize)
            .take(limit as usize)
        {
            let (_, value) = item.map_err(|e| StoreError::backend(e.to_string()))?;
            entries.push(serde_json::from_slice(value.value())?);
        }

        Ok((entries, total))
    }

    fn find_by_filter(&self, filter: &ProductFilter) -> Result<Vec<CatalogEntry>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(CATALOG_TABLE)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut entries = Vec::new();
        for item in table
            .iter()
            .map_err(|e| StoreError::backend(e.to_string()))?
        {
            let (_, value) = item.map_err(|e| StoreError::backend(e.to_string()))?;
            let entry: CatalogEntry = serde_json::from_slice(value.value())?;
            if filter.matches(&entry) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }
}
