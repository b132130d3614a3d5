//! Hyperliquid API integration.
//!
//! Read-only access to the Hyperliquid info endpoint for:
//! - Trade history (paginated, rate limited, retried)
//! - Portfolio summaries (account value, PnL, volume)
//!
//! The endpoint caps fill responses at 2,000 records and offers no cursor,
//! only a time-window filter; `HyperliquidClient` hides the resulting
//! sliding-window pagination. All clients must share one [`RateLimiter`]
//! because the upstream rate ceiling applies per account/IP, not per client.

mod error;
pub mod hyperliquid;
mod rate_limit;
mod retry;

pub use error::RequestError;
pub use hyperliquid::{
    HyperliquidClient, Period, PortfolioBreakdown, PortfolioMetrics, TradeFill,
};
pub use rate_limit::RateLimiter;
pub use retry::{AttemptOutcome, RetryDecision, RetryPolicy};
