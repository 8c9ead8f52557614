//! Product catalog commands.

use anyhow::{Context as _, Result};
use pos_commerce::prelude::*;

use super::directory::{confirm, print_details, print_table, Record};
use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let mut store = ProductStore::new(ctx.api()?.products());

    match args.command.unwrap_or(ProductsCommand::List {
        query: None,
        category: None,
    }) {
        ProductsCommand::List { query, category } => {
            load(&mut store, ctx).await?;
            let query = query.unwrap_or_default();
            let category = category.unwrap_or_else(|| ALL_CATEGORIES.to_string());
            let matches: Vec<Product> = store
                .filter(&query, &category)
                .into_iter()
                .cloned()
                .collect();
            print_table(&matches, &ctx.output);
            if !ctx.output.is_json() && !store.is_empty() {
                ctx.output.info(&format!("Categories: {}", store.categories().join(", ")));
            }
        }
        ProductsCommand::Show { id } => {
            let product = store
                .client()
                .get_by_id(id)
                .await
                .with_context(|| format!("Failed to load product #{}", id))?;
            print_details(&product, &ctx.output);
        }
        ProductsCommand::Search { query } => {
            let spinner = ctx.output.spinner("Searching products...");
            let result = store.search(&query).await;
            spinner.finish_and_clear();
            print_table(&result.context("Search failed")?, &ctx.output);
        }
        ProductsCommand::LowStock => {
            load(&mut store, ctx).await?;
            let low: Vec<LowStockItem> = store.low_stock().into_iter().map(LowStockItem::from).collect();
            if ctx.output.is_json() {
                ctx.output.json(&low);
            } else if low.is_empty() {
                ctx.output.success("All products are above their reorder threshold.");
            } else {
                ctx.output.header("Low stock");
                ctx.output
                    .table_row(&["PRODUCT", "STOCK", "MIN", "SHORT", "CATEGORY"], &[28, 6, 6, 6, 16]);
                for item in &low {
                    ctx.output.table_row(
                        &[
                            &truncate(&item.name, 28),
                            &item.stock.to_string(),
                            &item.min_stock.to_string(),
                            &item.shortfall().to_string(),
                            &item.category,
                        ],
                        &[28, 6, 6, 6, 16],
                    );
                }
            }
        }
        ProductsCommand::SetStock { id, stock } => {
            let product = store
                .update_stock(id, stock)
                .await
                .with_context(|| format!("Failed to update stock for product #{}", id))?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
            } else {
                ctx.output
                    .success(&format!("{} now has {} in stock", product.name, product.stock));
            }
        }
        ProductsCommand::Delete { id, yes } => {
            if !confirm(&format!("Delete product #{}?", id), yes, &ctx.output)? {
                ctx.output.info("Cancelled.");
                return Ok(());
            }
            store
                .remove(id)
                .await
                .with_context(|| format!("Failed to delete product #{}", id))?;
            ctx.output.success(&format!("Deleted product #{}", id));
        }
    }

    Ok(())
}

async fn load(store: &mut ProductStore, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading products...");
    let result = store.refresh().await;
    spinner.finish_and_clear();
    result.context("Failed to load products")
}

/// "out of stock", "low stock" or "in stock".
pub fn stock_label(product: &Product) -> &'static str {
    if product.is_out_of_stock() {
        "out of stock"
    } else if product.is_low_stock() {
        "low stock"
    } else {
        "in stock"
    }
}

impl Record for Product {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("ID", 6),
        ("NAME", 28),
        ("PRICE", 12),
        ("STOCK", 6),
        ("CATEGORY", 16),
        ("STATUS", 12),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.name, 28),
            Money::new(self.price, Currency::default()).display(),
            self.stock.to_string(),
            truncate(&self.category, 16),
            status_badge(stock_label(self)),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        vec![
            ("name", self.name.clone()),
            ("price", Money::new(self.price, Currency::default()).display()),
            ("stock", self.stock.to_string()),
            (
                "min_stock",
                self.min_stock
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("status", status_badge(stock_label(self))),
            ("category", self.category.clone()),
            ("sku", text(&self.sku)),
            ("supplier", text(&self.supplier)),
            ("description", text(&self.description)),
        ]
    }
}
