//! Local mirrors of server collections.
//!
//! An [`EntityStore`] holds the last list the server returned for one
//! collection, a loading flag and the last error message. Every mutation
//! goes to the server first; the mirror only changes once the server has
//! answered with the new record.

use pos_data::ApiError;

use crate::catalog::{Product, ProductUpdate};
use crate::directory::{Customer, Staff, Supplier};
use crate::ids::ProductId;
use crate::resource::{Entity, ResourceClient};
use crate::sales::Payment;

/// Category filter value that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Clears the loading flag on drop, including when the future holding it
/// is dropped mid-request.
struct Loading<'a>(&'a mut bool);

impl<'a> Loading<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Mirror of one server collection.
#[derive(Debug)]
pub struct EntityStore<E: Entity> {
    client: ResourceClient<E>,
    items: Vec<E>,
    loading: bool,
    error: Option<String>,
}

pub type ProductStore = EntityStore<Product>;
pub type CustomerStore = EntityStore<Customer>;
pub type StaffStore = EntityStore<Staff>;
pub type SupplierStore = EntityStore<Supplier>;
pub type PaymentStore = EntityStore<Payment>;

impl<E: Entity> EntityStore<E> {
    /// An empty store. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(client: ResourceClient<E>) -> Self {
        Self {
            client,
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn client(&self) -> &ResourceClient<E> {
        &self.client
    }

    /// Mirrored records in server order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed operation, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Look up a mirrored record.
    pub fn find(&self, id: E::Id) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn record_failure(&mut self, action: &str, err: &ApiError) {
        tracing::error!(
            collection = E::PLURAL,
            status = err.status,
            error = %err,
            "failed to {}",
            action
        );
        self.error = Some(err.message.clone());
    }

    /// Replace the mirror with the server's list. On failure the mirror is
    /// left as it was.
    #[tracing::instrument(level = "debug", skip(self), fields(collection = E::PLURAL))]
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let result = {
            let _loading = Loading::start(&mut self.loading);
            self.client.list_all().await
        };

        match result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "mirror refreshed");
                self.items = items;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.record_failure("fetch", &err);
                Err(err)
            }
        }
    }

    /// Create a record and append the server's copy.
    #[tracing::instrument(level = "debug", skip(self, payload), fields(collection = E::PLURAL))]
    pub async fn add(&mut self, payload: &E::Create) -> Result<E, ApiError> {
        let result = {
            let _loading = Loading::start(&mut self.loading);
            self.client.create(payload).await
        };

        match result {
            Ok(created) => {
                self.items.push(created.clone());
                self.error = None;
                Ok(created)
            }
            Err(err) => {
                self.record_failure("create", &err);
                Err(err)
            }
        }
    }

    /// Update a record and swap in the server's copy.
    #[tracing::instrument(level = "debug", skip(self, changes), fields(collection = E::PLURAL))]
    pub async fn update(&mut self, id: E::Id, changes: &E::Update) -> Result<E, ApiError> {
        let result = {
            let _loading = Loading::start(&mut self.loading);
            self.client.update(id, changes).await
        };

        match result {
            Ok(updated) => {
                if let Some(slot) = self.items.iter_mut().find(|item| item.id() == id) {
                    *slot = updated.clone();
                }
                self.error = None;
                Ok(updated)
            }
            Err(err) => {
                self.record_failure("update", &err);
                Err(err)
            }
        }
    }

    /// Delete a record and drop it from the mirror.
    #[tracing::instrument(level = "debug", skip(self), fields(collection = E::PLURAL))]
    pub async fn remove(&mut self, id: E::Id) -> Result<(), ApiError> {
        let result = {
            let _loading = Loading::start(&mut self.loading);
            self.client.delete(id).await
        };

        match result {
            Ok(()) => {
                self.items.retain(|item| item.id() != id);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.record_failure("delete", &err);
                Err(err)
            }
        }
    }

    /// Server-side search. The mirror is not touched.
    #[tracing::instrument(level = "debug", skip(self), fields(collection = E::PLURAL))]
    pub async fn search(&mut self, query: &str) -> Result<Vec<E>, ApiError> {
        let result = {
            let _loading = Loading::start(&mut self.loading);
            self.client.search(query).await
        };

        match result {
            Ok(hits) => {
                self.error = None;
                Ok(hits)
            }
            Err(err) => {
                self.record_failure("search", &err);
                Err(err)
            }
        }
    }
}

impl EntityStore<Product> {
    /// Mirrored stock for a product; zero when it is not in the mirror.
    pub fn stock_of(&self, id: ProductId) -> u32 {
        self.find(id).map(|p| p.stock).unwrap_or(0)
    }

    /// Set a product's stock on the server.
    pub async fn update_stock(&mut self, id: ProductId, stock: u32) -> Result<Product, ApiError> {
        self.update(id, &ProductUpdate::stock(stock)).await
    }

    /// Products whose stock is below their reorder threshold.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.items.iter().filter(|p| p.is_low_stock()).collect()
    }

    /// Distinct non-empty categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.items {
            let category = product.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Products whose name contains `query` (case-insensitive) within
    /// `category`. [`ALL_CATEGORIES`] or an empty category matches any.
    pub fn filter(&self, query: &str, category: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        let any_category = category.is_empty() || category == ALL_CATEGORIES;
        self.items
            .iter()
            .filter(|p| any_category || p.category == category)
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect()
    }
}
