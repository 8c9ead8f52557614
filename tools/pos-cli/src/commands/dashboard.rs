//! Dashboard and report summaries.

use anyhow::{Context as _, Result};
use pos_commerce::prelude::*;
use rust_decimal::Decimal;

use super::sales::print_sales;
use crate::context::Context;
use crate::output::truncate;

fn money(amount: Decimal, ctx: &Context) -> String {
    let currency = ctx.currency().unwrap_or_default();
    Money::new(amount, currency).rounded().display()
}

/// Run the dashboard command.
pub async fn run_dashboard(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading dashboard...");
    let result = api.dashboard().await;
    spinner.finish_and_clear();
    let data = result.context("Failed to load dashboard")?;

    if ctx.output.is_json() {
        ctx.output.json(&data);
        return Ok(());
    }

    ctx.output.header("Today");
    ctx.output.kv("Sales", &money(data.today_sales, ctx));
    ctx.output.kv("Transactions", &data.transactions.to_string());
    ctx.output
        .kv("Average transaction", &money(data.avg_transaction_value, ctx));
    ctx.output.kv(
        "Payment success rate",
        &format!("{:.1}%", data.payment_success_rate),
    );
    ctx.output
        .kv("Average checkout time", &format!("{:.1} min", data.avg_checkout_time));

    ctx.output.header("Inventory");
    ctx.output.kv("Products in stock", &data.products_in_stock.to_string());
    ctx.output.kv("Low stock", &data.low_stock_count.to_string());
    for item in &data.low_stock_items {
        ctx.output.list_item(&format!(
            "{} ({} left, minimum {})",
            item.name, item.stock, item.min_stock
        ));
    }
    ctx.output.kv("Active customers", &data.active_customers.to_string());

    if !data.recent_sales.is_empty() {
        ctx.output.header("Recent sales");
        print_sales(&data.recent_sales, ctx);
    }

    Ok(())
}

/// Run the reports command.
pub async fn run_reports(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading reports...");
    let result = api.reports().await;
    spinner.finish_and_clear();
    let data = result.context("Failed to load reports")?;

    if ctx.output.is_json() {
        ctx.output.json(&data);
        return Ok(());
    }

    let metrics = &data.metrics;
    let widths = [12, 14, 14, 14, 14];
    ctx.output.header("Summary");
    ctx.output
        .table_row(&["", "TOTAL", "TODAY", "WEEK", "MONTH"], &widths);
    ctx.output.table_row(
        &[
            "Revenue",
            &money(metrics.revenue.total, ctx),
            &money(metrics.revenue.today, ctx),
            &money(metrics.revenue.week, ctx),
            &money(metrics.revenue.month, ctx),
        ],
        &widths,
    );
    ctx.output.table_row(
        &[
            "Orders",
            &metrics.orders.total.to_string(),
            &metrics.orders.today.to_string(),
            &metrics.orders.week.to_string(),
            &metrics.orders.month.to_string(),
        ],
        &widths,
    );
    ctx.output.table_row(
        &[
            "Customers",
            &metrics.customers.total.to_string(),
            &metrics.customers.new_today.to_string(),
            &metrics.customers.new_week.to_string(),
            &metrics.customers.new_month.to_string(),
        ],
        &widths,
    );
    ctx.output
        .kv("Average order value", &money(metrics.avg_order_value, ctx));

    if !data.top_products.is_empty() {
        ctx.output.header("Top products");
        for product in &data.top_products {
            ctx.output.table_row(
                &[
                    &truncate(&product.name, 28),
                    &format!("{} sold", product.total_sold),
                    &money(product.total_revenue, ctx),
                ],
                &[28, 12, 14],
            );
        }
    }

    let shares = data.payment_method_percentages();
    if !shares.is_empty() {
        ctx.output.header("Payment methods");
        for (method, share) in shares {
            let label = method
                .parse::<PaymentMethod>()
                .map(|m| m.display_name().to_string())
                .unwrap_or_else(|_| "Unspecified".to_string());
            ctx.output.kv(&label, &format!("{}%", share));
        }
    }

    Ok(())
}
