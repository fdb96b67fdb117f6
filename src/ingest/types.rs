//! Core data model types for catalog ingestion.
//!
//! These types represent the shape of one uploaded CSV row at each stage of
//! the pipeline:
//!
//! ```text
//! RawRow                       one decoded CSV line, untyped strings
//!   ├── sku / name / brand     required (checked by the validator)
//!   ├── color / size           optional
//!   └── mrp / price / quantity numeric fields, still strings here
//!
//!         ↓ validate_row()
//!
//! ValidatedProduct             trimmed strings + parsed numbers
//!         — or —
//! RejectionRecord              ordinal + original row + fixed reason
//! ```
//!
//! A `RawRow` lives only for the duration of its own validation; rejected
//! rows keep a copy inside their [`RejectionRecord`] so operators can see
//! exactly what was uploaded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names the upload header is expected to carry, in canonical order.
pub const EXPECTED_COLUMNS: [&str; 8] = [
    "sku", "name", "brand", "color", "size", "mrp", "price", "quantity",
];

/// One decoded CSV data line, keyed by the expected column names.
///
/// No type coercion has happened yet; every field is the raw cell string
/// (or `None` when the column is absent from the header). Serialized as the
/// `data` field of rejection details, omitting absent columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// A product row that passed every validation rule.
///
/// Invariants held by construction (see [`crate::ingest::validate_row`]):
/// sku/name/brand are trimmed and non-empty, mrp and price are finite,
/// price ≤ mrp, and quantity ≥ 0. Note that mrp/price negativity is *not*
/// checked here; the store's constraint layer owns that check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedProduct {
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub mrp: f64,
    pub price: f64,
    pub quantity: i64,
}

/// Why a row was rejected. The display strings are a fixed taxonomy and are
/// part of the API surface; do not reword them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// sku, name, brand, mrp or price missing / empty after trimming.
    MissingRequiredFields,
    /// mrp/price not a finite number, or quantity not an integer.
    InvalidNumberFormat,
    /// price parsed greater than mrp.
    PriceAboveMrp,
    /// quantity parsed negative.
    NegativeQuantity,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::MissingRequiredFields => "Missing required fields.",
            RejectReason::InvalidNumberFormat => {
                "Invalid number format for MRP, Price, or Quantity."
            }
            RejectReason::PriceAboveMrp => "Price cannot be greater than MRP.",
            RejectReason::NegativeQuantity => "Quantity can't be negative.",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for RejectReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One rejected row: 1-based ordinal within the file (header excluded), the
/// original raw row for operator diagnosis, and the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionRecord {
    pub row: u64,
    pub data: RawRow,
    pub reason: RejectReason,
}

/// Outcome of one upload: counts plus rejection details in file order.
/// Ephemeral, constructed once per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub stored: usize,
    pub failed: usize,
    pub rejected: Vec<RejectionRecord>,
}
