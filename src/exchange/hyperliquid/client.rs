//! Hyperliquid info endpoint client.
//!
//! Every outbound request goes through the shared [`RateLimiter`] and a
//! retry loop driven by [`RetryPolicy`]. Trade history is fetched with
//! time-sliding-window pagination: the endpoint returns at most
//! [`PAGE_LIMIT`] fills per call, newest first, with no cursor, so the
//! client walks backward in time using each page's oldest timestamp as the
//! next window's end.

use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::HyperliquidConfig;
use crate::exchange::error::RequestError;
use crate::exchange::rate_limit::RateLimiter;
use crate::exchange::retry::{RetryDecision, RetryPolicy};

use super::types::{
    parse_fills, InfoRequest, Period, PeriodData, PortfolioBreakdown, PortfolioMetrics, TradeFill,
};

/// The info endpoint caps every fills response at this many records.
const PAGE_LIMIT: usize = 2000;

/// Client for the Hyperliquid info endpoint.
///
/// Cheap to clone; clones share the HTTP connection pool and the rate
/// limiter. Construct the limiter once at startup and pass the same `Arc`
/// to every client so concurrent fetches stay inside one request budget.
#[derive(Debug, Clone)]
pub struct HyperliquidClient {
    http: Client,
    api_url: String,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl HyperliquidClient {
    /// Create a client from configuration and the process-wide rate limiter.
    pub fn new(config: &HyperliquidConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            limiter,
            policy: RetryPolicy {
                max_attempts: config.max_retries,
                ..RetryPolicy::default()
            },
        })
    }

    /// Replace the retry policy (shortened backoff for tests, mostly).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send one info request through the rate limiter and retry loop.
    ///
    /// Returns the decoded JSON body, or an error once the policy gives up.
    /// A failure here discards nothing by itself; callers accumulating
    /// pages decide what to do with the whole fetch.
    async fn request(&self, payload: &InfoRequest) -> Result<Value> {
        let mut attempt = 0u32;
        loop {
            self.limiter.acquire().await;
            let err = match self.attempt(payload).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let Some(outcome) = err.retry_class() else {
                return Err(err.into());
            };
            match self.policy.decide(attempt, outcome) {
                RetryDecision::Retry(wait) => {
                    warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "Hyperliquid request failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => {
                    return Err(err).with_context(|| {
                        format!("Hyperliquid request failed after {} attempts", attempt + 1)
                    });
                }
            }
        }
    }

    /// A single HTTP attempt, classified for the retry loop.
    async fn attempt(&self, payload: &InfoRequest) -> Result<Value, RequestError> {
        let response = self.http.post(&self.api_url).json(payload).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RequestError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(RequestError::Decode)
    }

    /// Fetch up to `max_fills` fills for `user` in `[start_time, end_time]`,
    /// newest first, deduplicated, with no gaps.
    ///
    /// `end_time` defaults to now. See [`Self::fetch_fills_with_progress`]
    /// for the paging strategy.
    #[instrument(skip(self), fields(api_url = %self.api_url))]
    pub async fn fetch_fills(
        &self,
        user: &str,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        max_fills: usize,
    ) -> Result<Vec<TradeFill>> {
        self.fetch_fills_with_progress(user, start_time, end_time, max_fills, |_, _| {})
            .await
    }

    /// [`Self::fetch_fills`] with a progress side-channel: `on_progress` is
    /// invoked with `(collected, max_fills)` after each page, for UI
    /// progress bars. It does not influence the fetch.
    pub async fn fetch_fills_with_progress<F>(
        &self,
        user: &str,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        max_fills: usize,
        mut on_progress: F,
    ) -> Result<Vec<TradeFill>>
    where
        F: FnMut(usize, usize),
    {
        let start_ms = start_time.timestamp_millis();
        let mut current_end_ms = end_time.unwrap_or_else(Utc::now).timestamp_millis();
        let mut collected: Vec<TradeFill> = Vec::new();

        // A full walk needs ceil(max_fills / PAGE_LIMIT) pages; one extra
        // covers the overlap introduced by the window stepping. Anything
        // beyond that means the walk is not making progress.
        let max_pages = max_fills / PAGE_LIMIT + 1;
        let mut page = 0usize;

        while collected.len() < max_fills && page < max_pages {
            let payload = InfoRequest::UserFillsByTime {
                user: user.to_string(),
                start_time: start_ms,
                end_time: Some(current_end_ms),
            };
            let body = self.request(&payload).await?;
            let raw: Vec<Value> =
                serde_json::from_value(body).context("Expected a JSON array of fills")?;

            if raw.is_empty() {
                break; // no more data in range
            }

            let raw_len = raw.len();
            let oldest_ms = raw.last().and_then(|r| r.get("time")).and_then(Value::as_i64);

            let fills = parse_fills(raw);
            debug!(page, fetched = raw_len, parsed = fills.len(), "fetched fills page");
            collected.extend(fills);
            on_progress(collected.len(), max_fills);

            if raw_len < PAGE_LIMIT {
                break; // short page: this was the last one
            }

            // Pages are newest-first, so the last raw record is the oldest.
            // Step the window back 1ms so that record is not fetched again.
            // Assumes at most one fill per millisecond per address; a second
            // fill in the same millisecond would be dropped by the dedup
            // below anyway.
            match oldest_ms {
                Some(t) => current_end_ms = t - 1,
                None => break,
            }
            page += 1;
        }

        let fills = dedup_fills(collected, max_fills);
        info!(user, fills = fills.len(), pages = page + 1, "fetched fill history");
        Ok(fills)
    }

    /// Fetch the user's most recent fills without a time window.
    ///
    /// Single request against the non-windowed history endpoint; the
    /// upstream cap of 2,000 records applies before `limit`.
    #[instrument(skip(self))]
    pub async fn fetch_fills_unbounded(&self, user: &str, limit: usize) -> Result<Vec<TradeFill>> {
        let body = self
            .request(&InfoRequest::UserFills {
                user: user.to_string(),
            })
            .await?;
        let raw: Vec<Value> =
            serde_json::from_value(body).context("Expected a JSON array of fills")?;

        let mut fills = parse_fills(raw);
        fills.truncate(limit);
        debug!(user, fills = fills.len(), "fetched recent fills");
        Ok(fills)
    }

    /// Fetch the raw portfolio summary: a list of `(period name, data)`
    /// pairs, e.g. `("day", ...)`, `("perpDay", ...)`.
    #[instrument(skip(self))]
    pub async fn get_portfolio(&self, user: &str) -> Result<Vec<(String, PeriodData)>> {
        let body = self
            .request(&InfoRequest::Portfolio {
                user: user.to_string(),
            })
            .await?;
        serde_json::from_value(body).context("Failed to parse portfolio response")
    }

    /// Portfolio metrics for one period, split into total / perp / spot.
    ///
    /// Spot is derived as the residual of total minus perp. A response
    /// without the requested period is an error; a missing perp entry is
    /// treated as an all-spot portfolio.
    #[instrument(skip(self))]
    pub async fn get_portfolio_breakdown(
        &self,
        user: &str,
        period: Period,
    ) -> Result<PortfolioBreakdown> {
        let entries = self.get_portfolio(user).await?;

        let find = |key: &str| {
            entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, data)| PortfolioMetrics::from_period(data))
        };

        let total = find(period.key())
            .with_context(|| format!("Portfolio response missing period {period}"))?;
        let perp = find(period.perp_key()).unwrap_or_default();

        Ok(PortfolioBreakdown::from_parts(total, perp))
    }
}

/// Sort descending by timestamp, keep the first occurrence per distinct
/// millisecond, truncate to `max_fills`.
///
/// The millisecond timestamp is the only dedup key the API gives us; there
/// is no exchange-assigned fill id in this response. Two genuine fills in
/// the same millisecond for the same address collapse to one.
fn dedup_fills(mut fills: Vec<TradeFill>, max_fills: usize) -> Vec<TradeFill> {
    fills.sort_by_key(|f| Reverse(f.timestamp.timestamp_millis()));
    fills.dedup_by_key(|f| f.timestamp.timestamp_millis());
    fills.truncate(max_fills);
    fills
}
