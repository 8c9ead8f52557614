//! Entry point to the backend's REST API.

use pos_data::{ApiClient, ApiError};

use crate::catalog::Product;
use crate::directory::{Customer, Staff, Supplier};
use crate::resource::ResourceClient;
use crate::sales::{DashboardData, Payment, ReportsData, Sale};

/// Typed access to every collection the backend exposes.
///
/// Cheap to clone; all collections share one [`ApiClient`].
#[derive(Debug, Clone)]
pub struct PosApi {
    client: ApiClient,
}

impl PosApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn products(&self) -> ResourceClient<Product> {
        ResourceClient::new(self.client.clone())
    }

    pub fn customers(&self) -> ResourceClient<Customer> {
        ResourceClient::new(self.client.clone())
    }

    pub fn staff(&self) -> ResourceClient<Staff> {
        ResourceClient::new(self.client.clone())
    }

    pub fn suppliers(&self) -> ResourceClient<Supplier> {
        ResourceClient::new(self.client.clone())
    }

    pub fn payments(&self) -> ResourceClient<Payment> {
        ResourceClient::new(self.client.clone())
    }

    pub fn sales(&self) -> ResourceClient<Sale> {
        ResourceClient::new(self.client.clone())
    }

    /// Today's figures for the dashboard.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardData, ApiError> {
        self.client.get("/sales/dashboard/").send().await?.json()
    }

    /// Revenue, order and customer reports.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn reports(&self) -> Result<ReportsData, ApiError> {
        self.client.get("/sales/reports/").send().await?.json()
    }
}
