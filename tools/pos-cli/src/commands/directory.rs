//! Customer, staff, supplier and payment commands.
//!
//! Each collection implements [`Record`] so the same list, show, search
//! and delete flows render every entity.

use std::str::FromStr;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use pos_commerce::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{DirectoryArgs, DirectoryCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate, Output};

/// How a collection renders in tables and detail views.
pub trait Record: Entity + Serialize {
    /// Column headers and widths.
    const COLUMNS: &'static [(&'static str, usize)];

    /// Whether the server accepts `?search=` on this collection.
    const SEARCHABLE: bool = true;

    fn row(&self) -> Vec<String>;

    fn details(&self) -> Vec<(&'static str, String)>;
}

/// Print records as a table, or as JSON.
pub fn print_table<E: Record>(records: &[E], output: &Output) {
    if output.is_json() {
        output.json(&records);
        return;
    }
    if records.is_empty() {
        output.info(&format!("No {} found.", E::PLURAL));
        return;
    }

    let headers: Vec<&str> = E::COLUMNS.iter().map(|(name, _)| *name).collect();
    let widths: Vec<usize> = E::COLUMNS.iter().map(|(_, width)| *width).collect();
    output.table_row(&headers, &widths);
    output.text(&format!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len())));

    for record in records {
        let row = record.row();
        let cols: Vec<&str> = row.iter().map(String::as_str).collect();
        output.table_row(&cols, &widths);
    }

    output.info("");
    output.info(&format!("Total: {} {}", records.len(), E::PLURAL));
}

/// Print one record as key-value lines, or as JSON.
pub fn print_details<E: Record>(record: &E, output: &Output) {
    if output.is_json() {
        output.json(record);
        return;
    }
    output.header(&format!("{} #{}", E::PLURAL, record.id()));
    for (key, value) in record.details() {
        output.kv(key, &value);
    }
}

/// Ask before a destructive action unless `yes` is set.
pub fn confirm(prompt: &str, yes: bool, output: &Output) -> Result<bool> {
    if yes || output.is_json() {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn parse_id<E: Entity>(raw: &str) -> Result<E::Id>
where
    E::Id: FromStr<Err = CommerceError>,
{
    raw.parse::<E::Id>()
        .with_context(|| format!("Invalid {} id: {}", E::PLURAL, raw))
}

/// Run one of the directory commands against collection `E`.
pub async fn run<E: Record>(args: DirectoryArgs, ctx: &Context) -> Result<()>
where
    E::Id: FromStr<Err = CommerceError>,
{
    let api = ctx.api()?;
    let mut store = EntityStore::new(ResourceClient::<E>::new(api.client().clone()));

    match args.command.unwrap_or(DirectoryCommand::List) {
        DirectoryCommand::List => {
            let spinner = ctx.output.spinner(&format!("Loading {}...", E::PLURAL));
            let result = store.refresh().await;
            spinner.finish_and_clear();
            result.with_context(|| format!("Failed to load {}", E::PLURAL))?;
            print_table(store.items(), &ctx.output);
        }
        DirectoryCommand::Show { id } => {
            let id = parse_id::<E>(&id)?;
            let record = store
                .client()
                .get_by_id(id)
                .await
                .with_context(|| format!("Failed to load {} #{}", E::PLURAL, id))?;
            print_details(&record, &ctx.output);
        }
        DirectoryCommand::Search { query } => {
            if !E::SEARCHABLE {
                bail!("{} cannot be searched; use `pos {} list`", E::PLURAL, E::PLURAL);
            }
            let spinner = ctx.output.spinner(&format!("Searching {}...", E::PLURAL));
            let result = store.search(&query).await;
            spinner.finish_and_clear();
            let hits = result.context("Search failed")?;
            print_table(&hits, &ctx.output);
        }
        DirectoryCommand::Delete { id, yes } => {
            let id = parse_id::<E>(&id)?;
            if !confirm(&format!("Delete {} #{}?", E::PLURAL, id), yes, &ctx.output)? {
                ctx.output.info("Cancelled.");
                return Ok(());
            }
            store
                .remove(id)
                .await
                .with_context(|| format!("Failed to delete {} #{}", E::PLURAL, id))?;
            ctx.output.success(&format!("Deleted {} #{}", E::PLURAL, id));
        }
    }

    Ok(())
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn amount(value: Decimal, currency: Currency) -> String {
    Money::new(value, currency).rounded().display()
}

impl Record for Customer {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("ID", 6),
        ("NAME", 24),
        ("EMAIL", 28),
        ("PURCHASES", 10),
        ("SPENT", 14),
        ("STATUS", 10),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.name, 24),
            truncate(&self.email, 28),
            self.total_purchases.to_string(),
            amount(self.total_spent, Currency::default()),
            status_badge(&self.status),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", optional(&self.phone)),
            ("address", optional(&self.address)),
            ("status", status_badge(&self.status)),
            ("total_purchases", self.total_purchases.to_string()),
            ("total_spent", amount(self.total_spent, Currency::default())),
            (
                "last_visit",
                self.last_visit
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }
}

impl Record for Staff {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("ID", 6),
        ("NAME", 24),
        ("EMAIL", 28),
        ("ROLE", 12),
        ("DEPARTMENT", 16),
        ("STATUS", 10),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.name, 24),
            truncate(&self.email, 28),
            self.role.as_str().to_string(),
            truncate(self.department.as_deref().unwrap_or("-"), 16),
            status_badge(self.status.as_str()),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("phone", optional(&self.phone)),
            ("role", self.role.as_str().to_string()),
            ("department", optional(&self.department)),
            ("status", status_badge(self.status.as_str())),
            (
                "last_login",
                self.last_login
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string()),
            ),
        ]
    }
}

impl Record for Supplier {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("ID", 6),
        ("NAME", 24),
        ("CONTACT", 20),
        ("EMAIL", 28),
        ("STATUS", 10),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.name, 24),
            truncate(&self.contact_person, 20),
            truncate(&self.email, 28),
            status_badge(&self.status.to_string()),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("contact_person", self.contact_person.clone()),
            ("email", self.email.clone()),
            ("phone", optional(&self.phone)),
            ("address", optional(&self.address)),
            ("status", status_badge(&self.status.to_string())),
        ]
    }
}

impl Record for Payment {
    const COLUMNS: &'static [(&'static str, usize)] = &[
        ("ID", 6),
        ("TRANSACTION", 16),
        ("CUSTOMER", 20),
        ("AMOUNT", 14),
        ("METHOD", 16),
        ("STATUS", 10),
    ];

    const SEARCHABLE: bool = false;

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.transaction_id, 16),
            truncate(&self.customer_label(), 20),
            amount(self.amount, Currency::default()),
            self.method.display_name().to_string(),
            status_badge(self.status.as_str()),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("transaction_id", self.transaction_id.clone()),
            ("order_id", self.order_id.clone()),
            ("customer", self.customer_label()),
            ("amount", amount(self.amount, Currency::default())),
            ("method", self.method.display_name().to_string()),
            ("status", status_badge(self.status.as_str())),
            (
                "payment_date",
                self.payment_date
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]
    }
}
