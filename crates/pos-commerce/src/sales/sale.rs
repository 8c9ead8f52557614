//! Sale records and the payment action on them.

use chrono::{DateTime, Utc};
use pos_data::ApiError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::{CustomerId, ProductId, SaleId};
use crate::normalize;
use crate::resource::{Entity, Related, ResourceClient};
use crate::sales::{CustomerRef, PaymentMethod, PaymentStatus};

/// Product foreign key as sent by the server.
pub type ProductRef = Related<ProductId, Product>;

/// One product sold to one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub customer: CustomerRef,
    pub product: ProductRef,
    #[serde(with = "normalize::count")]
    pub quantity: u32,
    #[serde(with = "normalize::decimal")]
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, deserialize_with = "normalize::blank_as_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl Entity for Sale {
    type Id = SaleId;
    type Create = SaleCreate;
    type Update = SaleUpdate;

    const PATH: &'static str = "/sales/";
    const PLURAL: &'static str = "sales";

    fn id(&self) -> SaleId {
        self.id
    }
}

/// Body for `POST /sales/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleCreate {
    pub customer: CustomerId,
    pub product: ProductId,
    pub quantity: u32,
    /// Line total (unit price times quantity), unrounded.
    #[serde(with = "normalize::decimal")]
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
}

/// Partial body for `PUT /sales/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductId>,
}

#[derive(Serialize)]
struct ProcessPayment {
    payment_method: PaymentMethod,
}

impl ResourceClient<Sale> {
    /// Settle a pending sale. The server deducts stock and records a payment.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn process_payment(
        &self,
        id: SaleId,
        method: PaymentMethod,
    ) -> Result<Sale, ApiError> {
        let path = format!("{}process_payment/", Self::item_path(id));
        let response = self
            .client()
            .post(path)
            .json(&ProcessPayment {
                payment_method: method,
            })?
            .send()
            .await?;
        response.json()
    }
}
