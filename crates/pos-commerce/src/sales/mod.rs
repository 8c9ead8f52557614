//! Sales, payments and the server's sales reports.

mod payment;
mod report;
mod sale;

pub use payment::{
    CustomerRef, Payment, PaymentCreate, PaymentMethod, PaymentStatus, PaymentUpdate,
};
pub use report::{
    CustomerMetrics, DashboardData, OrderMetrics, PaymentMethodShare, ReportEntry,
    ReportMetrics, ReportsData, RevenueMetrics, TopProduct,
};
pub use sale::{ProductRef, Sale, SaleCreate, SaleUpdate};
