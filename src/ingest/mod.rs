//! Catalog ingestion pipeline.
//!
//! This is where seller CSV uploads enter the system. We decode the byte
//! stream one row at a time, run each row through the validator, and at
//! end-of-stream issue a single batch upsert for everything that passed.
//!
//! ## What we do here
//!
//! - **Stream, don't buffer** - Rows are pulled lazily from the transport
//!   via `csv_async`; row N+1 is not read until row N's outcome is recorded,
//!   so arbitrarily large files never accumulate at the row level.
//! - **Partition** - Accepted and rejected rows are collected in arrival
//!   order. Each data row gets a 1-based ordinal (header excluded).
//! - **Persist once** - One `upsert_many` call per upload, keyed on sku:
//!   create-if-absent-else-replace-mutable-fields. Rows that failed
//!   validation never reach the store.
//! - **Log everything** - Structured events via `tracing` with counts and
//!   elapsed time, mirroring what operators need to debug a bad upload.
//!
//! Row-level rejections are data, not errors: they come back inside the
//! [`IngestSummary`]. Only a decode failure or a store failure aborts the
//! run, as [`IngestError`].

use std::time::Instant;

use csv_async::{AsyncReaderBuilder, StringRecord};
use tokio::io::AsyncRead;
use tracing::{info, warn, Instrument, Level};

mod error;
mod types;
mod validate;

pub use crate::ingest::error::IngestError;
pub use crate::ingest::types::{
    IngestSummary, RawRow, RejectReason, RejectionRecord, ValidatedProduct, EXPECTED_COLUMNS,
};
pub use crate::ingest::validate::validate_row;

use crate::store::CatalogStore;

/// Resolved positions of the expected columns within the upload's header.
///
/// A column missing from the header is simply unresolved; every row then
/// carries `None` for that field and the validator produces the structured
/// "Missing required fields." rejection instead of a hard error.
#[derive(Debug, Default)]
struct ColumnMap {
    sku: Option<usize>,
    name: Option<usize>,
    brand: Option<usize>,
    color: Option<usize>,
    size: Option<usize>,
    mrp: Option<usize>,
    price: Option<usize>,
    quantity: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            sku: position("sku"),
            name: position("name"),
            brand: position("brand"),
            color: position("color"),
            size: position("size"),
            mrp: position("mrp"),
            price: position("price"),
            quantity: position("quantity"),
        }
    }

    fn extract(&self, record: &StringRecord) -> RawRow {
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_owned);
        RawRow {
            sku: cell(self.sku),
            name: cell(self.name),
            brand: cell(self.brand),
            color: cell(self.color),
            size: cell(self.size),
            mrp: cell(self.mrp),
            price: cell(self.price),
            quantity: cell(self.quantity),
        }
    }
}

/// Ingest one CSV upload: decode rows from `reader`, validate each, and
/// batch-upsert the accepted set into `store` at end-of-stream.
///
/// The first line must be a comma-delimited header naming the expected
/// columns (see [`EXPECTED_COLUMNS`]). Returns the summary with rejection
/// details in ascending row order, or an [`IngestError`] when the stream
/// cannot be decoded or the batch persistence call fails — in the decode
/// case no store call is made at all.
pub async fn ingest_catalog<R, S>(reader: R, store: &S) -> Result<IngestSummary, IngestError>
where
    R: AsyncRead + Unpin + Send,
    S: CatalogStore + ?Sized,
{
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "catalog.ingest");

    // The span must follow the future across awaits, not a thread.
    async {
        match ingest_inner(reader, store).await {
            Ok(summary) => {
                let elapsed_micros = start.elapsed().as_micros();
                info!(
                    stored = summary.stored,
                    failed = summary.failed,
                    elapsed_micros,
                    "ingest_success"
                );
                Ok(summary)
            }
            Err(err) => {
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "ingest_failure");
                Err(err)
            }
        }
    }
    .instrument(span)
    .await
}

async fn ingest_inner<R, S>(reader: R, store: &S) -> Result<IngestSummary, IngestError>
where
    R: AsyncRead + Unpin + Send,
    S: CatalogStore + ?Sized,
{
    let mut rdr = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .create_reader(reader);

    let columns = ColumnMap::from_headers(rdr.headers().await?);

    let mut accepted: Vec<ValidatedProduct> = Vec::new();
    let mut rejected: Vec<RejectionRecord> = Vec::new();

    // One reusable buffer; ordinals are 1-based and exclude the header.
    let mut record = StringRecord::new();
    let mut ordinal: u64 = 0;
    while rdr.read_record(&mut record).await? {
        ordinal += 1;
        let raw = columns.extract(&record);
        match validate_row(&raw) {
            Ok(product) => accepted.push(product),
            Err(reason) => rejected.push(RejectionRecord {
                row: ordinal,
                data: raw,
                reason,
            }),
        }
    }

    let stored = if accepted.is_empty() {
        0
    } else {
        store.upsert_many(accepted)?
    };

    Ok(IngestSummary {
        stored,
        failed: rejected.len(),
        rejected,
    })
}
