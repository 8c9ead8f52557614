//! CLI execution context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use pos_commerce::{Currency, CustomerId, PosApi};
use pos_data::ApiClient;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: CliConfig,
    /// Where the config came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match find_config_file(&cwd) {
                Some(path) => {
                    let config = CliConfig::load(&path.to_string_lossy())?;
                    (config, Some(path))
                }
                None => (CliConfig::default(), None),
            }
        };

        if let Some(env) = env {
            config = config.for_environment(env)?;
        }
        config.apply_env_overrides();

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Build an API facade from the `[api]` section.
    pub fn api(&self) -> Result<PosApi> {
        let api = &self.config.api;
        let mut client = ApiClient::http(&api.base_url, Duration::from_secs(api.timeout_secs))
            .context("Failed to build HTTP client")?;
        if let Some(ref token) = api.token {
            client = client.with_bearer_token(token);
        }
        self.output.debug(&format!("API: {}", api.base_url));
        Ok(PosApi::new(client))
    }

    /// Checkout currency.
    pub fn currency(&self) -> Result<Currency> {
        let code = &self.config.checkout.currency;
        code.parse::<Currency>()
            .with_context(|| format!("Invalid checkout.currency: {}", code))
    }

    /// Customer id sales are recorded against.
    pub fn walk_in_customer(&self) -> Result<CustomerId> {
        CustomerId::try_from(self.config.checkout.walk_in_customer)
            .context("Invalid checkout.walk_in_customer")
    }
}

/// Find a config file in the directory tree.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
