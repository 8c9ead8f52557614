//! Point-of-sale domain types and logic.
//!
//! This crate sits on top of [`pos_data`] and provides:
//!
//! - **Resources**: typed CRUD clients for every backend collection
//! - **Stores**: local mirrors of those collections
//! - **Cart**: lines bounded by mirrored stock, exact totals with tax
//! - **Checkout**: stock re-validation, per-line sale creation, receipts
//!
//! # Example
//!
//! ```rust,ignore
//! use pos_commerce::prelude::*;
//! use pos_data::ApiClient;
//! use std::time::Duration;
//!
//! let client = ApiClient::http("http://localhost:8000/api", Duration::from_secs(10))?;
//! let walk_in = CustomerId::new(1).unwrap();
//! let mut session = CheckoutSession::new(PosApi::new(client), walk_in, Currency::PHP);
//!
//! session.start().await?;
//! session.add_product(ProductId::new(7).unwrap())?;
//!
//! let totals = session.compute_totals()?;
//! println!("Total: {}", totals.total.display());
//!
//! let receipt = session.commit(PaymentMethod::Cash).await?;
//! println!("{receipt}");
//! session.reset_after_receipt();
//! ```

pub mod api;
pub mod error;
pub mod ids;
pub mod money;
pub mod normalize;
pub mod resource;
pub mod store;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod directory;
pub mod sales;

pub use api::PosApi;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::PosApi;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::resource::{Entity, Related, ResourceClient};
    pub use crate::store::{
        CustomerStore, EntityStore, PaymentStore, ProductStore, StaffStore, SupplierStore,
        ALL_CATEGORIES,
    };

    // Catalog
    pub use crate::catalog::{LowStockItem, Product, ProductCreate, ProductUpdate, StockShortage};

    // Directory
    pub use crate::directory::{
        Customer, CustomerCreate, CustomerUpdate, Staff, StaffCreate, StaffRole, StaffStatus,
        StaffUpdate, Supplier, SupplierCreate, SupplierStatus, SupplierUpdate,
    };

    // Sales
    pub use crate::sales::{
        DashboardData, Payment, PaymentCreate, PaymentMethod, PaymentStatus, PaymentUpdate,
        ReportsData, Sale, SaleCreate, SaleUpdate,
    };

    // Cart
    pub use crate::cart::{Cart, CartLine, CartTotals, LineChange, TAX_RATE};

    // Checkout
    pub use crate::checkout::{
        CartRejection, CheckoutError, CheckoutSession, CheckoutState, LineFailure, Notice,
        NoticeLevel, Receipt, ReceiptLine,
    };
}
