//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use pos_commerce::prelude::{Currency, CustomerId};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, API_URL_ENV};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    if std::env::var_os(API_URL_ENV).is_some() {
        ctx.output.kv("override", API_URL_ENV);
    }

    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("timeout_secs", &ctx.config.api.timeout_secs.to_string());
    if ctx.config.api.token.is_some() {
        ctx.output.kv("token", "(set)");
    }

    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output.kv("currency", &ctx.config.checkout.currency);
    ctx.output.kv(
        "walk_in_customer",
        &ctx.config.checkout.walk_in_customer.to_string(),
    );
    ctx.output.kv("confirm", &ctx.config.checkout.confirm.to_string());

    ctx.output.info("");
    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level);

    if !ctx.config.environments.is_empty() {
        ctx.output.info("");
        ctx.output.info("Environments:");
        for env in ctx.config.environments.keys() {
            ctx.output.list_item(env);
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("pos.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

/// Problems that make the config unusable, and ones worth a warning.
pub fn check(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let url = &config.api.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("api.base_url '{}' must start with http:// or https://", url));
    }
    if url.ends_with('/') {
        warnings.push("api.base_url should not end with '/'".to_string());
    }
    if config.api.timeout_secs == 0 {
        errors.push("api.timeout_secs must be at least 1".to_string());
    }

    if Currency::from_code(&config.checkout.currency).is_none() {
        errors.push(format!(
            "checkout.currency '{}' is not a supported currency",
            config.checkout.currency
        ));
    }
    if CustomerId::new(config.checkout.walk_in_customer).is_none() {
        errors.push("checkout.walk_in_customer must be a positive id".to_string());
    }

    for (name, env) in &config.environments {
        if env.api.is_none() {
            warnings.push(format!("environments.{} overrides nothing", name));
        }
    }

    (errors, warnings)
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
