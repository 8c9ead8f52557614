//! CLI configuration.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file names searched from the working directory upward.
pub const CONFIG_NAMES: [&str; 3] = ["pos.toml", ".pos.toml", "pos.json"];

/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "POS_API_URL";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Checkout defaults.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Logging.
    #[serde(default)]
    pub log: LogConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content).with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Config with the named environment's overrides applied.
    pub fn for_environment(&self, env: &str) -> Result<CliConfig> {
        let mut config = self.clone();
        let env_config = self
            .environments
            .get(env)
            .with_context(|| format!("Unknown environment: {}", env))?;
        if let Some(ref api) = env_config.api {
            config.api = api.clone();
        }
        Ok(config)
    }

    /// Apply `POS_API_URL` when it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent as `Authorization: Bearer <token>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

/// Checkout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// ISO currency code for totals.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Customer id sales are recorded against.
    #[serde(default = "default_walk_in")]
    pub walk_in_customer: u64,

    /// Ask before committing.
    #[serde(default = "default_true")]
    pub confirm: bool,
}

fn default_currency() -> String {
    "PHP".to_string()
}

fn default_walk_in() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            walk_in_customer: default_walk_in(),
            confirm: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// API override.
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

/// Generate a default pos.toml config file.
pub fn generate_default_config() -> String {
    r#"# Point-of-sale client configuration

[api]
base_url = "http://localhost:8000/api"
timeout_secs = 10
# token = "..."

[checkout]
currency = "PHP"
walk_in_customer = 1
confirm = true

[log]
level = "info"

[environments.staging]
[environments.staging.api]
base_url = "https://staging.example.com/api"
"#
    .to_string()
}
