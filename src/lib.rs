//! # HL Portfolio
//!
//! Data-access layer for Hyperliquid portfolio dashboards: fetches a wallet's
//! complete trade history and portfolio summaries through the public info
//! endpoint, which caps every response at 2,000 records and enforces an
//! account-wide request-rate ceiling.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `exchange`: Hyperliquid API client (rate limiting, retry, pagination)
//!
//! The UI layer that consumes this crate may fetch many wallets concurrently;
//! all clients share one [`exchange::RateLimiter`] so concurrency never
//! multiplies effective request throughput.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use hl_portfolio::exchange::{HyperliquidClient, RateLimiter};
//! use hl_portfolio::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! config.validate()?;
//!
//! // One limiter for the whole process, shared by every client.
//! let limiter = Arc::new(RateLimiter::per_second(config.hyperliquid.calls_per_second));
//! let client = HyperliquidClient::new(&config.hyperliquid, Arc::clone(&limiter))?;
//!
//! let start = chrono::Utc::now() - chrono::Duration::days(30);
//! let fills = client.fetch_fills("0xabc...", start, None, 10_000).await?;
//! println!("{} fills", fills.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod exchange;

pub use config::Config;
