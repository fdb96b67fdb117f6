//! Integration tests for the preserved HTTP surface.
//!
//! These drive the full router via `tower::ServiceExt::oneshot`, without a
//! TCP listener, over an in-memory catalog store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use skustore::ingest::ValidatedProduct;
use skustore::store::memory::MemoryCatalogStore;
use skustore::store::CatalogStore;
use skustore::{build_router, AppConfig, AppState};

fn test_app() -> (axum::Router, Arc<MemoryCatalogStore>) {
    let store = Arc::new(MemoryCatalogStore::new());
    let state = Arc::new(AppState::with_store(AppConfig::default(), store.clone()));
    (build_router(state), store)
}

fn csv_upload(content: &str) -> Request<Body> {
    multipart_request("file", content)
}

fn multipart_request(field_name: &str, content: &str) -> Request<Body> {
    let boundary = "skustore-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"catalog.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn product(sku: &str, brand: &str, price: f64) -> ValidatedProduct {
    ValidatedProduct {
        sku: sku.into(),
        name: "Shirt".into(),
        brand: brand.into(),
        color: Some("Red".into()),
        size: Some("M".into()),
        mrp: price * 2.0,
        price,
        quantity: 1,
    }
}

#[tokio::test]
async fn upload_valid_csv_returns_201_with_summary() {
    let (app, _store) = test_app();
    let csv = "sku,name,brand,color,size,mrp,price,quantity\n\
               TSHIRT-RED-M-001,T-Shirt,CoolBrand,Red,M,800,500,10\n\
               JEANS-BLU-32-002,Jeans,DenimCo,Blue,32,2000,1500,5";

    let response = app.clone().oneshot(csv_upload(csv)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["stored"], 2);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["failedDetails"], serde_json::json!([]));
    assert!(json["message"].is_string());

    // The catalog subsequently contains both entries.
    let response = app
        .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["totalProducts"], 2);
}

#[tokio::test]
async fn upload_mixed_csv_reports_each_rejection() {
    let (app, _store) = test_app();
    // One valid row and five invalid: missing sku, missing mrp, price > mrp,
    // negative quantity, non-numeric price.
    let csv = "sku,name,brand,color,size,mrp,price,quantity\n\
               ,Shirt,BrandA,Red,M,100,50,1\n\
               SKU-OK-1,Shirt,BrandA,Red,M,100,50,1\n\
               SKU-2,Shirt,BrandA,Red,M,,50,1\n\
               SKU-3,Shirt,BrandA,Red,M,100,150,1\n\
               SKU-4,Shirt,BrandA,Red,M,100,50,-2\n\
               SKU-5,Shirt,BrandA,Red,M,100,abc,1";

    let response = app.oneshot(csv_upload(csv)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["stored"], 1);
    assert_eq!(json["failed"], 5);

    let details = json["failedDetails"].as_array().unwrap();
    assert_eq!(details.len(), 5);

    let rows: Vec<u64> = details.iter().map(|d| d["row"].as_u64().unwrap()).collect();
    assert_eq!(rows, vec![1, 3, 4, 5, 6], "ascending ordinal order");

    let mut reasons: Vec<&str> = details
        .iter()
        .map(|d| d["reason"].as_str().unwrap())
        .collect();
    reasons.sort_unstable();
    assert_eq!(
        reasons,
        vec![
            "Invalid number format for MRP, Price, or Quantity.",
            "Missing required fields.",
            "Missing required fields.",
            "Price cannot be greater than MRP.",
            "Quantity can't be negative.",
        ]
    );

    // Rejected rows echo the original data.
    assert_eq!(details[4]["data"]["price"], "abc");
}

#[tokio::test]
async fn upload_without_file_field_is_400() {
    let (app, store) = test_app();

    let response = app
        .oneshot(multipart_request("attachment", "sku,name\nX,Y"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["message"], "No file uploaded");
    assert_eq!(store.upsert_batches(), 0, "zero rows processed");
}

#[tokio::test]
async fn upload_invalid_utf8_is_500_with_error_detail() {
    let (app, _store) = test_app();
    let boundary = "skustore-test-boundary";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"catalog.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         sku,name,brand,mrp,price,quantity\r\n"
    )
    .into_bytes();
    body.extend_from_slice(b"SKU-1,Sh\xFF\xFEirt,BrandA,100,50,1\r\n");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Error processing CSV file");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn upload_is_idempotent_across_requests() {
    let (app, _store) = test_app();
    let csv = "sku,name,brand,color,size,mrp,price,quantity\n\
               SKU-1,Shirt,BrandA,Red,M,100,50,1\n\
               SKU-2,Jeans,BrandB,Blue,32,2000,1500,5";

    for _ in 0..2 {
        let response = app.clone().oneshot(csv_upload(csv)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["stored"], 2);
    }

    let response = app
        .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["totalProducts"], 2, "second upload must not duplicate");
}

#[tokio::test]
async fn listing_pages_through_fifteen_entries() {
    let (app, store) = test_app();
    let batch: Vec<ValidatedProduct> = (1..=15)
        .map(|i| product(&format!("SKU-{i:02}"), "CoolBrand", 100.0 * i as f64))
        .collect();
    store.upsert_many(batch).unwrap();

    let response = app
        .oneshot(
            Request::get("/api/products?page=2&limit=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["totalProducts"], 15);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["currentPage"], 2);

    let skus: Vec<&str> = json["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sku"].as_str().unwrap())
        .collect();
    assert_eq!(skus, ["SKU-06", "SKU-07", "SKU-08", "SKU-09", "SKU-10"]);
}

#[tokio::test]
async fn listing_far_past_the_end_is_200_and_empty() {
    let (app, store) = test_app();
    store.upsert_many(vec![product("SKU-1", "CoolBrand", 500.0)]).unwrap();

    // u64::MAX page: the offset saturates instead of overflowing.
    let response = app
        .oneshot(
            Request::get("/api/products?page=18446744073709551615&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["totalProducts"], 1);
    assert_eq!(json["products"], serde_json::json!([]));
}

#[tokio::test]
async fn listing_defaults_and_empty_catalog_are_200() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["totalProducts"], 0);
    assert_eq!(json["totalPages"], 0);
    assert_eq!(json["currentPage"], 1);
    assert_eq!(json["products"], serde_json::json!([]));
}

#[tokio::test]
async fn search_with_no_match_is_404() {
    let (app, store) = test_app();
    store.upsert_many(vec![product("SKU-1", "CoolBrand", 500.0)]).unwrap();

    let response = app
        .oneshot(
            Request::get("/api/products/search?brand=NoSuchBrand")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["message"], "No products found matching your criteria");
}

#[tokio::test]
async fn search_filters_by_min_price() {
    let (app, store) = test_app();
    let batch = vec![
        product("SKU-1", "CoolBrand", 500.0),
        product("SKU-2", "CoolBrand", 1999.99),
        product("SKU-3", "DenimCo", 2000.0),
        product("SKU-4", "DenimCo", 2500.0),
        product("SKU-5", "DenimCo", 3000.0),
    ];
    store.upsert_many(batch).unwrap();

    let response = app
        .oneshot(
            Request::get("/api/products/search?minPrice=2000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let skus: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["sku"].as_str().unwrap())
        .collect();
    assert_eq!(skus, ["SKU-3", "SKU-4", "SKU-5"]);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let (app, store) = test_app();
    store
        .upsert_many(vec![
            product("SKU-1", "CoolBrand", 500.0),
            product("SKU-2", "DenimCo", 1500.0),
        ])
        .unwrap();

    let response = app
        .oneshot(
            Request::get("/api/products/search?brand=coolb&color=RED")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["sku"], "SKU-1");
}

#[tokio::test]
async fn health_and_ready_respond() {
    let (app, _store) = test_app();

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["catalog"]["status"], "ready");
    assert_eq!(json["catalog"]["products"], 0);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
