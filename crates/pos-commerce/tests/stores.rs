//! Store and resource behaviour against a simulated backend.

mod common;

use common::{api, pid, Backend};
use pos_commerce::prelude::*;
use pos_data::mock::{json_response, MockTransport};
use pos_data::Method;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;

fn backend() -> Backend {
    Backend::new()
        .with_product(1, "Jasmine Rice 5kg", "249.50", 10)
        .with_product(2, "Instant Coffee", "12.75", 2)
        .with_category(2, "Beverages")
        .with_product(3, "Brown Rice 1kg", "89.00", 40)
}

#[tokio::test]
async fn test_refresh_normalizes_numeric_text() {
    let backend = backend();
    let mut store = ProductStore::new(api(backend.transport()).products());
    store.refresh().await.unwrap();

    assert_eq!(store.len(), 3);
    let rice = store.find(pid(1)).unwrap();
    assert_eq!(rice.price, dec!(249.50));
    assert_eq!(rice.stock, 10);
    assert_eq!(rice.min_stock, Some(5));
    assert!(rice.supplier.is_none());
    assert_eq!(rice.sku.as_deref(), Some("SKU-1"));
    assert!(store.error().is_none());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_refresh_accepts_paginated_listing() {
    let backend = backend().paginated();
    let mut store = ProductStore::new(api(backend.transport()).products());
    store.refresh().await.unwrap();

    assert_eq!(store.len(), 3);
    assert_eq!(store.items()[1].name, "Instant Coffee");
}

#[tokio::test]
async fn test_failed_refresh_keeps_mirror() {
    let backend = backend();
    let mut store = ProductStore::new(api(backend.transport()).products());
    store.refresh().await.unwrap();

    backend.set_offline(true);
    let err = store.refresh().await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(store.len(), 3);
    assert_eq!(store.error(), Some("Failed to fetch"));
    assert!(!store.is_loading());

    backend.set_offline(false);
    store.refresh().await.unwrap();
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_add_update_remove() {
    let backend = backend();
    let transport = backend.transport();
    let mut store = ProductStore::new(api(transport.clone()).products());
    store.refresh().await.unwrap();

    let created = store
        .add(&ProductCreate::new("Cooking Oil", dec!(120), 6).with_category("Pantry"))
        .await
        .unwrap();
    assert_eq!(created.id, pid(4));
    assert_eq!(store.len(), 4);
    assert_eq!(backend.stock(4), 6);

    let updated = store.update_stock(pid(4), 2).await.unwrap();
    assert_eq!(updated.stock, 2);
    assert_eq!(store.stock_of(pid(4)), 2);
    assert!(store.low_stock().iter().any(|p| p.id == pid(2)));

    store.remove(pid(4)).await.unwrap();
    assert_eq!(store.len(), 3);
    assert!(store.find(pid(4)).is_none());
    assert_eq!(transport.requests_to(Method::Delete, "/products/4/").len(), 1);
}

#[tokio::test]
async fn test_failed_mutation_leaves_mirror() {
    let backend = backend();
    let mut store = ProductStore::new(api(backend.transport()).products());
    store.refresh().await.unwrap();

    let err = store.remove(pid(9)).await.unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(store.len(), 3);
    assert!(store.error().is_some());

    let err = store.update_stock(pid(9), 1).await.unwrap_err();
    assert_eq!(err.message, "detail: Not found.");
}

#[tokio::test]
async fn test_validation_errors_surface_field_messages() {
    let transport = Arc::new(MockTransport::new(|_| {
        Ok(json_response(400, &json!({"name": ["This field is required."]})))
    }));
    let mut store = CustomerStore::new(api(transport).customers());

    let err = store
        .add(&CustomerCreate::new("", ""))
        .await
        .unwrap_err();

    assert_eq!(err.status, 400);
    assert_eq!(err.message, "name: This field is required.");
    assert_eq!(store.error(), Some("name: This field is required."));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_search_does_not_touch_mirror() {
    let backend = backend();
    let transport = backend.transport();
    let mut store = ProductStore::new(api(transport.clone()).products());
    store.refresh().await.unwrap();

    let hits = store.search("rice").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(store.len(), 3);

    let searched = transport.requests_to(Method::Get, "/products/");
    assert_eq!(searched.last().unwrap().query_param("search"), Some("rice"));
}

#[tokio::test]
async fn test_successful_search_clears_error() {
    let backend = backend();
    let mut store = ProductStore::new(api(backend.transport()).products());

    backend.set_offline(true);
    store.search("rice").await.unwrap_err();
    assert_eq!(store.error(), Some("Failed to fetch"));

    backend.set_offline(false);
    let hits = store.search("coffee").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(store.error().is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_local_filters() {
    let backend = backend();
    let mut store = ProductStore::new(api(backend.transport()).products());
    store.refresh().await.unwrap();

    assert_eq!(store.categories(), vec!["General", "Beverages"]);
    assert_eq!(store.filter("RICE", ALL_CATEGORIES).len(), 2);
    assert_eq!(store.filter("", "Beverages").len(), 1);
    assert!(store.filter("rice", "Beverages").is_empty());
}
