//! In-memory backend for integration tests.
//!
//! Serves the product and sale endpoints the way the real server does:
//! decimals as strings, stock deducted when a sale is created, and
//! `{"error": ...}` bodies on rejection.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use pos_commerce::prelude::*;
use pos_data::mock::{empty_response, json_response, MockTransport};
use pos_data::{ApiClient, ApiError, Method, Request, Response};
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://pos.test/api";

#[derive(Debug, Clone)]
pub struct StockedProduct {
    pub name: String,
    pub price: String,
    pub stock: u32,
    pub min_stock: u32,
    pub category: String,
}

#[derive(Default)]
struct State {
    products: BTreeMap<u64, StockedProduct>,
    sales: Vec<Value>,
    next_sale_id: u64,
    /// Product ids whose sale creation is refused.
    reject_sales_for: HashSet<u64>,
    /// Product ids whose sale creation never reaches the server.
    drop_sales_for: HashSet<u64>,
    /// Stock to apply on the next product list, simulating another till.
    pending_stock: Vec<(u64, u32)>,
    offline: bool,
    paginate: bool,
}

/// Shared handle to the simulated server.
#[derive(Clone, Default)]
pub struct Backend {
    state: Arc<Mutex<State>>,
}

impl Backend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.state.lock().next_sale_id = 100;
        backend
    }

    pub fn with_product(self, id: u64, name: &str, price: &str, stock: u32) -> Self {
        self.state.lock().products.insert(
            id,
            StockedProduct {
                name: name.to_string(),
                price: price.to_string(),
                stock,
                min_stock: 5,
                category: "General".to_string(),
            },
        );
        self
    }

    pub fn with_category(self, id: u64, category: &str) -> Self {
        if let Some(product) = self.state.lock().products.get_mut(&id) {
            product.category = category.to_string();
        }
        self
    }

    pub fn paginated(self) -> Self {
        self.state.lock().paginate = true;
        self
    }

    pub fn stock(&self, id: u64) -> u32 {
        self.state.lock().products.get(&id).map(|p| p.stock).unwrap_or(0)
    }

    /// Change stock the next time the product list is served.
    pub fn stock_changes_before_next_list(&self, id: u64, stock: u32) {
        self.state.lock().pending_stock.push((id, stock));
    }

    pub fn reject_sales_for(&self, id: u64) {
        self.state.lock().reject_sales_for.insert(id);
    }

    pub fn drop_sales_for(&self, id: u64) {
        self.state.lock().drop_sales_for.insert(id);
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn sales(&self) -> Vec<Value> {
        self.state.lock().sales.clone()
    }

    /// Build a transport that routes through this backend.
    pub fn transport(&self) -> Arc<MockTransport> {
        let backend = self.clone();
        Arc::new(MockTransport::new(move |req| backend.handle(req)))
    }

    fn handle(&self, req: &Request) -> Result<Response, ApiError> {
        let mut state = self.state.lock();
        if state.offline {
            return Err(ApiError::network("Failed to fetch"));
        }

        let path = req.path().trim_end_matches('/');
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

        match (req.method(), segments.as_slice()) {
            (Method::Get, ["products"]) => {
                let pending = std::mem::take(&mut state.pending_stock);
                for (id, stock) in pending {
                    if let Some(product) = state.products.get_mut(&id) {
                        product.stock = stock;
                    }
                }
                let needle = req.query_param("search").map(str::to_lowercase);
                let rows: Vec<Value> = state
                    .products
                    .iter()
                    .filter(|(_, p)| match &needle {
                        Some(n) => p.name.to_lowercase().contains(n),
                        None => true,
                    })
                    .map(|(id, p)| product_json(*id, p))
                    .collect();
                if state.paginate {
                    Ok(json_response(
                        200,
                        &json!({"count": rows.len(), "next": null, "previous": null, "results": rows}),
                    ))
                } else {
                    Ok(json_response(200, &rows))
                }
            }
            (Method::Get, ["products", id]) => match parse(id).and_then(|id| {
                state.products.get(&id).map(|p| product_json(id, p))
            }) {
                Some(body) => Ok(json_response(200, &body)),
                None => Ok(json_response(404, &json!({"detail": "Not found."}))),
            },
            (Method::Put, ["products", id]) => {
                let Some(id) = parse(id) else {
                    return Ok(empty_response(404));
                };
                let changes: Value = req
                    .json_body()
                    .unwrap_or(Ok(Value::Null))
                    .unwrap_or(Value::Null);
                let Some(product) = state.products.get_mut(&id) else {
                    return Ok(json_response(404, &json!({"detail": "Not found."})));
                };
                if let Some(stock) = changes.get("stock").and_then(Value::as_u64) {
                    product.stock = stock as u32;
                }
                if let Some(name) = changes.get("name").and_then(Value::as_str) {
                    product.name = name.to_string();
                }
                Ok(json_response(200, &product_json(id, product)))
            }
            (Method::Delete, ["products", id]) => {
                let removed = parse(id).and_then(|id| state.products.remove(&id));
                Ok(empty_response(if removed.is_some() { 204 } else { 404 }))
            }
            (Method::Post, ["products"]) => {
                let body: Value = req
                    .json_body()
                    .unwrap_or(Ok(Value::Null))
                    .unwrap_or(Value::Null);
                let Some(name) = body.get("name").and_then(Value::as_str) else {
                    return Ok(json_response(400, &json!({"name": ["This field is required."]})));
                };
                let id = state.products.keys().max().copied().unwrap_or(0) + 1;
                let product = StockedProduct {
                    name: name.to_string(),
                    price: body["price"].to_string(),
                    stock: body["stock"].as_u64().unwrap_or(0) as u32,
                    min_stock: body["min_stock"].as_u64().unwrap_or(0) as u32,
                    category: body["category"].as_str().unwrap_or("").to_string(),
                };
                let row = product_json(id, &product);
                state.products.insert(id, product);
                Ok(json_response(201, &row))
            }
            (Method::Post, ["sales"]) => {
                let body: Value = req
                    .json_body()
                    .unwrap_or(Ok(Value::Null))
                    .unwrap_or(Value::Null);
                let product_id = body["product"].as_u64().unwrap_or(0);
                let quantity = body["quantity"].as_u64().unwrap_or(0) as u32;

                if state.drop_sales_for.contains(&product_id) {
                    return Err(ApiError::network("connection reset"));
                }
                if state.reject_sales_for.contains(&product_id) {
                    return Ok(json_response(
                        400,
                        &json!({"error": "Payment processing failed. Insufficient stock or other error."}),
                    ));
                }
                let Some(product) = state.products.get_mut(&product_id) else {
                    return Ok(json_response(
                        400,
                        &json!({"product": ["Invalid pk - object does not exist."]}),
                    ));
                };
                if product.stock < quantity {
                    return Ok(json_response(
                        400,
                        &json!({"error": "Payment processing failed. Insufficient stock or other error."}),
                    ));
                }
                product.stock -= quantity;

                let id = state.next_sale_id;
                state.next_sale_id += 1;
                let sale = json!({
                    "id": id,
                    "customer": body["customer"],
                    "product": product_id,
                    "quantity": quantity,
                    "total_price": format!("{:.2}", body["total_price"].as_f64().unwrap_or(0.0)),
                    "sale_date": "2024-05-02T10:00:00Z",
                    "payment_status": "completed",
                    "payment_method": body["payment_method"]
                });
                state.sales.push(sale.clone());
                Ok(json_response(201, &sale))
            }
            _ => Ok(json_response(404, &json!({"detail": "Not found."}))),
        }
    }
}

fn parse(id: &str) -> Option<u64> {
    id.parse().ok()
}

fn product_json(id: u64, p: &StockedProduct) -> Value {
    json!({
        "id": id,
        "name": p.name,
        "price": p.price,
        "stock": p.stock.to_string(),
        "min_stock": p.min_stock,
        "category": p.category,
        "sku": format!("SKU-{}", id),
        "supplier": "",
        "image": "",
        "description": "",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub fn api(transport: Arc<MockTransport>) -> PosApi {
    PosApi::new(ApiClient::new(BASE_URL, transport))
}

pub fn walk_in() -> CustomerId {
    CustomerId::new(1).unwrap()
}

pub fn pid(id: u64) -> ProductId {
    ProductId::new(id).unwrap()
}

/// A started session over `backend`, plus the transport for assertions.
pub async fn session(backend: &Backend) -> (CheckoutSession, Arc<MockTransport>) {
    let transport = backend.transport();
    let mut session = CheckoutSession::new(api(transport.clone()), walk_in(), Currency::PHP);
    session.start().await.unwrap();
    (session, transport)
}
