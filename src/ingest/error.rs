//! Error types produced by the ingestion pipeline.
//!
//! Per-row validation failures are *not* errors: they are data, carried in
//! the [`IngestSummary`](crate::ingest::IngestSummary). The variants here
//! cover the two conditions that abort a whole upload.

use crate::store::StoreError;
use thiserror::Error;

/// Errors that abort an ingestion run.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    /// The byte stream could not be decoded as comma-delimited UTF-8 CSV
    /// (malformed encoding, truncated quoted field, transport failure).
    /// No partial summary is produced.
    #[error("failed to decode CSV stream: {0}")]
    Decode(#[from] csv_async::Error),

    /// The batch persistence call failed after validation completed.
    /// Validated-but-unwritten rows must be re-uploaded by the client.
    #[error("failed to persist accepted rows: {0}")]
    Persistence(#[from] StoreError),
}
