//! Ring up a sale from the command line.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use pos_commerce::prelude::*;

use super::CheckoutArgs;
use crate::context::Context;
use crate::output::truncate;

/// One `--item` argument: a product id and how many to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemArg {
    pub product: ProductId,
    pub quantity: u32,
}

impl std::str::FromStr for ItemArg {
    type Err = anyhow::Error;

    /// Parse `ID` or `IDxQTY`, e.g. `7`, `#7` or `7x3`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (id, quantity) = match s.split_once(|c: char| c == 'x' || c == 'X') {
            Some((id, qty)) => {
                let quantity: u32 = qty
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid quantity in item '{}'", s))?;
                (id, quantity)
            }
            None => (s, 1),
        };
        if quantity == 0 {
            bail!("Quantity must be at least 1 in item '{}'", s);
        }
        let product = id
            .trim()
            .parse::<ProductId>()
            .with_context(|| format!("Invalid product id in item '{}'", s))?;
        Ok(Self { product, quantity })
    }
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let items = args
        .items
        .iter()
        .map(|raw| raw.parse::<ItemArg>())
        .collect::<Result<Vec<_>>>()?;

    let mut session = CheckoutSession::new(ctx.api()?, ctx.walk_in_customer()?, ctx.currency()?);

    let spinner = ctx.output.spinner("Loading products...");
    let started = session.start().await;
    spinner.finish_and_clear();
    started.context("Failed to load products")?;

    for item in &items {
        if let Err(rejection) = add_item(&mut session, item) {
            ctx.output.notice(&Notice::from(&rejection));
            bail!("Cannot add {} x product #{} to the cart", item.quantity, item.product);
        }
    }

    let totals = session.compute_totals()?.rounded();
    print_cart(&session, ctx);

    if ctx.config.checkout.confirm && !args.yes && !ctx.output.is_json() {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Charge {} by {}?",
                totals.total.display(),
                args.pay.display_name()
            ))
            .default(true)
            .interact()
            .context("Failed to read confirmation")?;
        if !proceed {
            ctx.output.info("Checkout cancelled. Nothing was sent.");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Processing payment...");
    let outcome = session.commit(args.pay).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(receipt) => {
            if ctx.output.is_json() {
                ctx.output.json(&receipt);
            } else {
                ctx.output.text("");
                ctx.output.text(&receipt.to_string());
                ctx.output.text("");
                ctx.output.notice(&Notice::payment_successful(&receipt));
            }
            session.reset_after_receipt();
            Ok(())
        }
        Err(err) => {
            ctx.output.notice(&Notice::from(&err));
            match &err {
                CheckoutError::StockValidationFailed { shortages } => {
                    for shortage in shortages {
                        ctx.output.list_item(&shortage.to_string());
                    }
                }
                CheckoutError::CommitFailed { committed, failed } => {
                    for sale in committed {
                        ctx.output.list_item(&format!(
                            "recorded sale #{} for product #{}",
                            sale.id,
                            sale.product.id()
                        ));
                    }
                    for failure in failed {
                        ctx.output.list_item(&format!(
                            "{} x{}: {}",
                            failure.product_name, failure.quantity, failure.error
                        ));
                    }
                }
                _ => {}
            }
            Err(err).context("Checkout failed")
        }
    }
}

/// Add the first unit, then raise the line to the full quantity in one step.
fn add_item(session: &mut CheckoutSession, item: &ItemArg) -> Result<(), CartRejection> {
    session.add_product(item.product)?;
    if item.quantity > 1 {
        session.change_quantity(item.product, i64::from(item.quantity - 1))?;
    }
    Ok(())
}

fn print_cart(session: &CheckoutSession, ctx: &Context) {
    let cart = session.cart();
    let currency = cart.currency();
    ctx.output.header(&format!("Cart ({} items)", cart.item_count()));

    let widths = [28, 5, 12, 12];
    ctx.output.table_row(&["PRODUCT", "QTY", "PRICE", "TOTAL"], &widths);
    for line in cart.lines() {
        let line_total = line
            .line_total(currency)
            .map(|m| m.rounded().display())
            .unwrap_or_else(|_| "-".to_string());
        ctx.output.table_row(
            &[
                &truncate(&line.product.name, 28),
                &line.quantity.to_string(),
                &line.unit_price(currency).display(),
                &line_total,
            ],
            &widths,
        );
    }

    if let Ok(totals) = cart.totals() {
        let totals = totals.rounded();
        ctx.output.kv("Subtotal", &totals.subtotal.display());
        ctx.output.kv("Tax (12%)", &totals.tax.display());
        ctx.output.kv("Total", &totals.total.display());
    }
}
