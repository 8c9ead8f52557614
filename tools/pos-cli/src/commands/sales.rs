//! Sale history and pending-sale payment.

use anyhow::{Context as _, Result};
use pos_commerce::prelude::*;

use super::{SalesArgs, SalesCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the sales command.
pub async fn run(args: SalesArgs, ctx: &Context) -> Result<()> {
    let sales = ctx.api()?.sales();

    match args.command.unwrap_or(SalesCommand::List { limit: None }) {
        SalesCommand::List { limit } => {
            let spinner = ctx.output.spinner("Loading sales...");
            let result = sales.list_all().await;
            spinner.finish_and_clear();
            let mut records = result.context("Failed to load sales")?;

            records.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            print_sales(&records, ctx);
        }
        SalesCommand::Pay { id, method } => {
            let spinner = ctx.output.spinner("Processing payment...");
            let result = sales.process_payment(id, method).await;
            spinner.finish_and_clear();
            let sale = result.with_context(|| format!("Failed to process payment for sale #{}", id))?;

            if ctx.output.is_json() {
                ctx.output.json(&sale);
            } else {
                ctx.output.success(&format!(
                    "Sale #{} is {} ({})",
                    sale.id,
                    sale.payment_status.as_str(),
                    method.display_name()
                ));
            }
        }
    }

    Ok(())
}

/// Customer name when embedded, otherwise the id.
fn customer_label(sale: &Sale) -> String {
    match sale.customer.embedded() {
        Some(customer) => customer.name.clone(),
        None => format!("#{}", sale.customer.id()),
    }
}

fn product_label(sale: &Sale) -> String {
    match sale.product.embedded() {
        Some(product) => product.name.clone(),
        None => format!("#{}", sale.product.id()),
    }
}

/// Print sales as a table, or as JSON.
pub fn print_sales(sales: &[Sale], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&sales);
        return;
    }
    if sales.is_empty() {
        ctx.output.info("No sales found.");
        return;
    }

    let widths = [6, 18, 20, 20, 5, 12, 10];
    ctx.output.table_row(
        &["ID", "DATE", "CUSTOMER", "PRODUCT", "QTY", "TOTAL", "STATUS"],
        &widths,
    );
    for sale in sales {
        let date = sale
            .sale_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                &sale.id.to_string(),
                &date,
                &truncate(&customer_label(sale), 20),
                &truncate(&product_label(sale), 20),
                &sale.quantity.to_string(),
                &Money::new(sale.total_price, Currency::default()).rounded().display(),
                &status_badge(sale.payment_status.as_str()),
            ],
            &widths,
        );
    }
}
