//! Hyperliquid info endpoint integration.

mod client;
mod types;

pub use client::HyperliquidClient;
pub use types::{
    HistoryPoint, InfoRequest, Period, PeriodData, PortfolioBreakdown, PortfolioMetrics, RawFill,
    TradeFill,
};
