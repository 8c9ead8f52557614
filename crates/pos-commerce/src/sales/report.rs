//! Dashboard and report payloads.
//!
//! Both endpoints return aggregates computed by the server. Sums come back
//! as decimal strings or as bare `0` when nothing matched, so every figure
//! goes through [`crate::normalize`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::LowStockItem;
use crate::normalize;
use crate::sales::Sale;

/// `GET /sales/dashboard/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Revenue from today's completed sales.
    #[serde(with = "normalize::decimal")]
    pub today_sales: Decimal,
    /// Number of today's completed sales.
    #[serde(with = "normalize::count")]
    pub transactions: u64,
    /// Units on hand across all products.
    #[serde(with = "normalize::count")]
    pub products_in_stock: u64,
    #[serde(with = "normalize::count")]
    pub low_stock_count: u64,
    #[serde(with = "normalize::count")]
    pub active_customers: u64,
    #[serde(default)]
    pub recent_sales: Vec<Sale>,
    #[serde(default)]
    pub low_stock_items: Vec<LowStockItem>,
    /// Percentage of today's payments that completed.
    #[serde(default, with = "normalize::float")]
    pub payment_success_rate: f64,
    #[serde(default, with = "normalize::decimal")]
    pub avg_transaction_value: Decimal,
    /// Minutes.
    #[serde(default, with = "normalize::float")]
    pub avg_checkout_time: f64,
}

/// Totals over today, the last 7 days, the last 30 days and all time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    #[serde(with = "normalize::decimal")]
    pub total: Decimal,
    #[serde(with = "normalize::decimal")]
    pub today: Decimal,
    #[serde(with = "normalize::decimal")]
    pub week: Decimal,
    #[serde(with = "normalize::decimal")]
    pub month: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMetrics {
    #[serde(with = "normalize::count")]
    pub total: u64,
    #[serde(with = "normalize::count")]
    pub today: u64,
    #[serde(with = "normalize::count")]
    pub week: u64,
    #[serde(with = "normalize::count")]
    pub month: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    #[serde(with = "normalize::count")]
    pub total: u64,
    #[serde(with = "normalize::count")]
    pub new_today: u64,
    #[serde(with = "normalize::count")]
    pub new_week: u64,
    #[serde(with = "normalize::count")]
    pub new_month: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub revenue: RevenueMetrics,
    pub orders: OrderMetrics,
    #[serde(with = "normalize::decimal")]
    pub avg_order_value: Decimal,
    pub customers: CustomerMetrics,
}

/// Best sellers by units sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(rename = "product__name")]
    pub name: String,
    #[serde(rename = "product__category", default)]
    pub category: String,
    #[serde(with = "normalize::count")]
    pub total_sold: u64,
    #[serde(with = "normalize::decimal")]
    pub total_revenue: Decimal,
}

/// Completed sales grouped by payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodShare {
    /// Raw method tag; blank for sales recorded without one.
    #[serde(default)]
    pub payment_method: String,
    #[serde(with = "normalize::count")]
    pub count: u64,
    #[serde(default, with = "normalize::decimal")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub date: String,
}

/// `GET /sales/reports/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsData {
    pub metrics: ReportMetrics,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethodShare>,
    #[serde(default)]
    pub recent_reports: Vec<ReportEntry>,
}

impl ReportsData {
    /// Share of completed-sale revenue taken by each payment method, in
    /// percent. Empty when there is no revenue.
    pub fn payment_method_percentages(&self) -> Vec<(String, Decimal)> {
        let total: Decimal = self.payment_methods.iter().map(|m| m.total).sum();
        if total.is_zero() {
            return Vec::new();
        }
        self.payment_methods
            .iter()
            .map(|m| {
                let share = (m.total * Decimal::ONE_HUNDRED / total).round_dp(1);
                (m.payment_method.clone(), share)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_dashboard_normalizes_numbers() {
        let dashboard: DashboardData = serde_json::from_value(json!({
            "today_sales": "1520.50",
            "transactions": 4,
            "products_in_stock": "310",
            "low_stock_count": 2,
            "active_customers": 18,
            "recent_sales": [{
                "id": 1, "customer": 1, "product": 2, "quantity": 1,
                "total_price": "80.00", "payment_status": "completed",
                "payment_method": "cash"
            }],
            "low_stock_items": [
                {"name": "Eggs", "stock": 3, "min_stock": 12, "category": "Dairy"}
            ],
            "payment_success_rate": 100.0,
            "avg_transaction_value": "380.125",
            "avg_checkout_time": 4.2
        }))
        .unwrap();

        assert_eq!(dashboard.today_sales, dec!(1520.50));
        assert_eq!(dashboard.products_in_stock, 310);
        assert_eq!(dashboard.recent_sales.len(), 1);
        assert_eq!(dashboard.low_stock_items[0].shortfall(), 9);
        assert_eq!(dashboard.avg_transaction_value, dec!(380.125));
    }

    #[test]
    fn test_dashboard_empty_day() {
        let dashboard: DashboardData = serde_json::from_value(json!({
            "today_sales": 0,
            "transactions": 0,
            "products_in_stock": 0,
            "low_stock_count": 0,
            "active_customers": 0,
            "recent_sales": [],
            "low_stock_items": [],
            "payment_success_rate": 0,
            "avg_transaction_value": 0,
            "avg_checkout_time": 4.2
        }))
        .unwrap();

        assert!(dashboard.today_sales.is_zero());
        assert_eq!(dashboard.payment_success_rate, 0.0);
    }

    fn reports_json() -> serde_json::Value {
        json!({
            "metrics": {
                "revenue": {"total": "1000.00", "today": 0, "week": "250.00", "month": "1000.00"},
                "orders": {"total": 8, "today": 0, "week": 2, "month": 8},
                "avg_order_value": "125.00",
                "customers": {"total": 5, "new_today": 0, "new_week": 1, "new_month": 5}
            },
            "top_products": [
                {"product__name": "Rice", "product__category": "Groceries",
                 "total_sold": 12, "total_revenue": "600.00"}
            ],
            "payment_methods": [
                {"payment_method": "cash", "count": 6, "total": "750.00"},
                {"payment_method": "card", "count": 2, "total": "250.00"}
            ],
            "recent_reports": [
                {"name": "Daily Sales Summary - 2024-05-02", "type": "Sales",
                 "size": "245 KB", "date": "2024-05-02"}
            ]
        })
    }

    #[test]
    fn test_reports_normalize_numbers() {
        let reports: ReportsData = serde_json::from_value(reports_json()).unwrap();
        assert_eq!(reports.metrics.revenue.total, dec!(1000.00));
        assert!(reports.metrics.revenue.today.is_zero());
        assert_eq!(reports.metrics.orders.month, 8);
        assert_eq!(reports.top_products[0].name, "Rice");
        assert_eq!(reports.recent_reports[0].kind, "Sales");
    }

    #[test]
    fn test_payment_method_percentages() {
        let reports: ReportsData = serde_json::from_value(reports_json()).unwrap();
        let shares = reports.payment_method_percentages();
        assert_eq!(shares[0], ("cash".to_string(), dec!(75.0)));
        assert_eq!(shares[1], ("card".to_string(), dec!(25.0)));
    }
}
