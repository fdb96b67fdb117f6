//! Row Validator: one raw CSV row in, a validated product or a rejection
//! reason out. Pure, total, no I/O.

use crate::ingest::types::{RawRow, RejectReason, ValidatedProduct};

/// Returns the trimmed field if it is present and non-empty.
fn required(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Returns the trimmed field, mapping empty-after-trim to `None`.
fn optional(field: &Option<String>) -> Option<String> {
    required(field).map(str::to_owned)
}

/// Validate one raw row against the business rules, in order:
///
/// 1. sku, name, brand, mrp, price present and non-empty after trimming
/// 2. mrp and price parse as finite numbers; quantity parses as an integer
///    (a missing or blank quantity defaults to 0 before parsing)
/// 3. price ≤ mrp
/// 4. quantity ≥ 0
///
/// The first failing rule determines the reason; later rules are not
/// evaluated. Quantity is the only field checked for negativity here —
/// negative mrp/price slip through to the store's constraint layer, which
/// mirrors the original schema split.
pub fn validate_row(row: &RawRow) -> Result<ValidatedProduct, RejectReason> {
    let (Some(sku), Some(name), Some(brand), Some(mrp_raw), Some(price_raw)) = (
        required(&row.sku),
        required(&row.name),
        required(&row.brand),
        required(&row.mrp),
        required(&row.price),
    ) else {
        return Err(RejectReason::MissingRequiredFields);
    };

    let quantity_raw = required(&row.quantity).unwrap_or("0");
    let (Ok(mrp), Ok(price), Ok(quantity)) = (
        mrp_raw.parse::<f64>(),
        price_raw.parse::<f64>(),
        quantity_raw.parse::<i64>(),
    ) else {
        return Err(RejectReason::InvalidNumberFormat);
    };
    if !mrp.is_finite() || !price.is_finite() {
        return Err(RejectReason::InvalidNumberFormat);
    }

    if price > mrp {
        return Err(RejectReason::PriceAboveMrp);
    }

    if quantity < 0 {
        return Err(RejectReason::NegativeQuantity);
    }

    Ok(ValidatedProduct {
        sku: sku.to_owned(),
        name: name.to_owned(),
        brand: brand.to_owned(),
        color: optional(&row.color),
        size: optional(&row.size),
        mrp,
        price,
        quantity,
    })
}
