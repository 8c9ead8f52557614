//! The checkout session: one cart, its product mirror and its commit.

use chrono::Utc;
use futures::future::join_all;
use pos_data::ApiError;

use crate::api::PosApi;
use crate::cart::{Cart, CartTotals, LineChange};
use crate::catalog::{Product, StockShortage};
use crate::checkout::{
    CartRejection, CheckoutError, CheckoutState, LineFailure, Receipt, ReceiptLine,
};
use crate::error::CommerceError;
use crate::ids::{CustomerId, ProductId};
use crate::money::Currency;
use crate::sales::{PaymentMethod, SaleCreate};
use crate::store::ProductStore;

/// A point-of-sale session.
///
/// Owns the cart and the product mirror the cart is checked against.
/// Mutations are synchronous and run against the mirror as it was last
/// fetched; [`commit`](Self::commit) re-fetches stock before anything is
/// sent.
#[derive(Debug)]
pub struct CheckoutSession {
    api: PosApi,
    catalog: ProductStore,
    cart: Cart,
    state: CheckoutState,
    receipt: Option<Receipt>,
    customer: CustomerId,
}

impl CheckoutSession {
    /// Create a session that records sales against `customer`.
    pub fn new(api: PosApi, customer: CustomerId, currency: Currency) -> Self {
        let catalog = ProductStore::new(api.products());
        Self {
            api,
            catalog,
            cart: Cart::new(currency),
            state: CheckoutState::Empty,
            receipt: None,
            customer,
        }
    }

    /// Load the product mirror.
    pub async fn start(&mut self) -> Result<(), ApiError> {
        self.catalog.refresh().await
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &ProductStore {
        &self.catalog
    }

    /// The product mirror, for store operations (stock edits, refresh).
    pub fn catalog_mut(&mut self) -> &mut ProductStore {
        &mut self.catalog
    }

    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    /// The settled receipt, until it is dismissed.
    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    fn enter(&mut self, next: CheckoutState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid checkout transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = self.state.as_str(), to = next.as_str(), "checkout state");
        self.state = next;
    }

    /// Empty or Building, depending on whether the cart has lines.
    fn settle_editing_state(&mut self) {
        let next = if self.cart.is_empty() {
            CheckoutState::Empty
        } else {
            CheckoutState::Building
        };
        self.enter(next);
    }

    fn ensure_editable(&self) -> Result<(), CartRejection> {
        if self.state.accepts_cart_changes() {
            Ok(())
        } else {
            Err(CartRejection::ReceiptOpen)
        }
    }

    /// Add one unit of `product`, bounded by its mirrored stock.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<u32, CartRejection> {
        self.ensure_editable()?;
        let available = self.catalog.stock_of(product.id);
        let quantity = self
            .cart
            .add_one(product, available)
            .inspect_err(log_rejection)?;
        self.settle_editing_state();
        Ok(quantity)
    }

    /// Look up `id` in the mirror and add one unit of it.
    pub fn add_product(&mut self, id: ProductId) -> Result<u32, CartRejection> {
        let product = match self.catalog.find(id) {
            Some(product) => product.clone(),
            None => {
                return Err(CartRejection::InsufficientStock(StockShortage {
                    product_id: id,
                    product_name: format!("#{}", id),
                    requested: 1,
                    available: 0,
                }))
            }
        };
        self.add_to_cart(&product)
    }

    /// Move a line's quantity by `delta`, bounded by mirrored stock.
    pub fn change_quantity(
        &mut self,
        id: ProductId,
        delta: i64,
    ) -> Result<LineChange, CartRejection> {
        self.ensure_editable()?;
        let available = self.catalog.stock_of(id);
        let change = self
            .cart
            .change_quantity(id, delta, available)
            .inspect_err(log_rejection)?;
        self.settle_editing_state();
        Ok(change)
    }

    /// Delete a line. Returns whether one was there.
    pub fn remove_line(&mut self, id: ProductId) -> Result<bool, CartRejection> {
        self.ensure_editable()?;
        let removed = self.cart.remove_line(id);
        self.settle_editing_state();
        Ok(removed)
    }

    /// Empty the cart, dismissing any open receipt.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.receipt = None;
        self.state = CheckoutState::Empty;
    }

    /// Subtotal, tax and total of the current cart.
    pub fn compute_totals(&self) -> Result<CartTotals, CommerceError> {
        self.cart.totals()
    }

    /// Validate stock against the server and record one sale per line.
    ///
    /// Nothing is sent unless a fresh product list covers every line. Sale
    /// creations run concurrently and all of them finish before the outcome
    /// is decided; sales that succeeded are kept even when others fail
    /// (see [`CheckoutError::inventory_may_be_reduced`]).
    #[tracing::instrument(skip(self), fields(lines = self.cart.lines().len()))]
    pub async fn commit(&mut self, method: PaymentMethod) -> Result<Receipt, CheckoutError> {
        if self.state == CheckoutState::Settled {
            return Err(CheckoutError::ReceiptOpen);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let currency = self.cart.currency();
        let totals = self.cart.totals()?;
        let mut lines = self
            .cart
            .lines()
            .iter()
            .map(|line| ReceiptLine::from_cart_line(line, currency))
            .collect::<Result<Vec<_>, _>>()?;

        self.enter(CheckoutState::Validating);
        if let Err(err) = self.catalog.refresh().await {
            self.enter(CheckoutState::Building);
            return Err(CheckoutError::Refresh(err));
        }

        let shortages = self.shortages();
        if !shortages.is_empty() {
            tracing::warn!(count = shortages.len(), "stock changed since lines were added");
            self.enter(CheckoutState::Building);
            return Err(CheckoutError::StockValidationFailed { shortages });
        }
        for line in &mut lines {
            line.stock_before = self.catalog.find(line.product_id).map(|p| p.stock);
        }

        self.enter(CheckoutState::Committing);
        let requests: Vec<SaleCreate> = lines
            .iter()
            .map(|line| SaleCreate {
                customer: self.customer,
                product: line.product_id,
                quantity: line.quantity,
                total_price: line.line_total.amount,
                payment_method: method,
            })
            .collect();

        let sales = self.api.sales();
        let results = join_all(requests.iter().map(|body| sales.create(body))).await;

        let mut committed = Vec::new();
        let mut failed = Vec::new();
        for (line, result) in lines.iter().zip(results) {
            match result {
                Ok(sale) => committed.push(sale),
                Err(error) => failed.push(LineFailure {
                    product_id: line.product_id,
                    product_name: line.name.clone(),
                    quantity: line.quantity,
                    error,
                }),
            }
        }

        if !failed.is_empty() {
            if committed.is_empty() {
                tracing::warn!(failed = failed.len(), "no sales were created");
            } else {
                tracing::warn!(
                    committed = committed.len(),
                    failed = failed.len(),
                    "partial commit; created sales are not rolled back"
                );
            }
            self.enter(CheckoutState::Building);
            return Err(CheckoutError::CommitFailed { committed, failed });
        }

        match self.catalog.refresh().await {
            Ok(()) => {
                for line in &mut lines {
                    line.stock_after = self.catalog.find(line.product_id).map(|p| p.stock);
                }
            }
            Err(err) => tracing::warn!(error = %err, "stock refresh after commit failed"),
        }

        let receipt = Receipt {
            order_number: Receipt::order_number_for(&committed),
            customer: self.customer,
            lines,
            totals,
            payment_method: method,
            sales: committed,
            issued_at: Utc::now(),
        };

        tracing::info!(
            order = %receipt.order_number,
            total = %receipt.totals.total.rounded().amount,
            method = method.as_str(),
            "checkout settled"
        );
        self.receipt = Some(receipt.clone());
        self.enter(CheckoutState::Settled);
        Ok(receipt)
    }

    /// Dismiss the receipt and start over with an empty cart.
    pub fn reset_after_receipt(&mut self) -> Option<Receipt> {
        let receipt = self.receipt.take();
        self.cart.clear();
        self.state = CheckoutState::Empty;
        receipt
    }

    /// Lines the freshly fetched mirror cannot cover.
    ///
    /// A product missing from the fresh list is not a shortage; its sale is
    /// sent and the server decides.
    fn shortages(&self) -> Vec<StockShortage> {
        self.cart
            .lines()
            .iter()
            .filter_map(|line| {
                let current = self.catalog.find(line.product_id())?;
                if current.can_fulfill(line.quantity) {
                    None
                } else {
                    StockShortage::check(&line.product, line.quantity, current.stock).err()
                }
            })
            .collect()
    }
}

fn log_rejection(shortage: &StockShortage) {
    tracing::warn!(
        product = %shortage.product_id,
        requested = shortage.requested,
        available = shortage.available,
        "cart change rejected"
    );
}
