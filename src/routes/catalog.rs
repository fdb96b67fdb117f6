//! Catalog endpoints: bulk CSV upload, paginated listing, filtered search.

use crate::error::{ApiError, ApiResult};
use crate::ingest::{ingest_catalog, IngestSummary, RejectionRecord};
use crate::state::AppState;
use crate::store::{CatalogEntry, ProductFilter};
use axum::extract::multipart::Multipart;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;

/// Response from a processed upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub stored: usize,
    pub failed: usize,
    pub failed_details: Vec<RejectionRecord>,
}

impl From<IngestSummary> for UploadResponse {
    fn from(summary: IngestSummary) -> Self {
        Self {
            message: "CSV processed successfully".to_string(),
            stored: summary.stored,
            failed: summary.failed,
            failed_details: summary.rejected,
        }
    }
}

/// Upload a seller catalog as a multipart CSV file.
///
/// The CSV bytes stream straight from the `file` field into the ingestion
/// pipeline; the transport may buffer chunks but rows are decoded and
/// validated one at a time. A request without a `file` field fails fast
/// with 400 before any row is read.
pub async fn upload_catalog(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let reader = StreamReader::new(field.map_err(io::Error::other));
        let summary = ingest_catalog(reader, state.store.as_ref()).await?;
        return Ok((StatusCode::CREATED, Json(UploadResponse::from(summary))));
    }

    Err(ApiError::MissingFile)
}

/// Query parameters for paginated listing
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u64>,

    #[serde(default)]
    pub limit: Option<u64>,
}

/// One page of the catalog
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub total_products: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub products: Vec<CatalogEntry>,
}

/// List stored products, paginated in the store's stable order.
///
/// `page` defaults to 1 and `limit` to 10; values below 1 are clamped to 1.
/// An empty catalog is a normal 200 with zero counts.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);

    // Saturate: an absurd page is a valid request for a page past the end,
    // which comes back empty, not a panic.
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let (products, total) = state.store.find_page(offset, limit)?;

    Ok(Json(ProductPage {
        total_products: total,
        total_pages: total.div_ceil(limit),
        current_page: page,
        products,
    }))
}

/// Query parameters for filtered search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub min_price: Option<f64>,

    #[serde(default)]
    pub max_price: Option<f64>,
}

impl From<SearchQuery> for ProductFilter {
    fn from(query: SearchQuery) -> Self {
        ProductFilter {
            brand: query.brand,
            name: query.name,
            color: query.color,
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

/// Search the catalog by brand/name/color substrings and price bounds.
///
/// All matches are returned unpaginated. An empty match set is a 404,
/// deliberately distinct from an empty paginated listing.
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ProductFilter::from(query);
    let matches = state.store.find_by_filter(&filter)?;

    if matches.is_empty() {
        return Err(ApiError::NoMatches);
    }

    Ok(Json(matches))
}
