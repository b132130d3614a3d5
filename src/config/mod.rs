//! Configuration management for the portfolio data client.
//!
//! Loads settings from environment variables and config files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hyperliquid API client settings
    #[serde(default)]
    pub hyperliquid: HyperliquidConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperliquidConfig {
    /// Info endpoint URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request budget shared by all clients in the process.
    /// The API enforces the ceiling per account/IP, so this must cover
    /// every concurrent fetch, not each one individually.
    #[serde(default = "default_calls_per_second")]
    pub calls_per_second: u32,
    /// Attempts per request before a failure is propagated
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Timeout for a single HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

// Default value functions
fn default_api_url() -> String {
    "https://api.hyperliquid.xyz/info".to_string()
}

fn default_calls_per_second() -> u32 {
    4 // Conservative: the documented ceiling is higher, headroom for bursts
}

fn default_max_retries() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default().separator("__").prefix("HLP"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.hyperliquid.calls_per_second > 0,
            "calls_per_second must be at least 1"
        );

        anyhow::ensure!(
            self.hyperliquid.max_retries > 0,
            "max_retries must be at least 1"
        );

        anyhow::ensure!(
            !self.hyperliquid.api_url.is_empty(),
            "api_url must not be empty"
        );

        Ok(())
    }
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            calls_per_second: default_calls_per_second(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}
