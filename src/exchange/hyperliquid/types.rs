//! Type definitions for Hyperliquid info endpoint requests and responses.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Request body for the info endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum InfoRequest {
    /// Portfolio summary (account value, PnL, volume per period).
    #[serde(rename = "portfolio")]
    Portfolio { user: String },

    /// Most recent fills for a user (capped at 2,000 upstream).
    #[serde(rename = "userFills")]
    UserFills { user: String },

    /// Fills within an inclusive time window, newest first.
    #[serde(rename = "userFillsByTime")]
    UserFillsByTime {
        user: String,
        #[serde(rename = "startTime")]
        start_time: i64,
        #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
        end_time: Option<i64>,
    },
}

/// Raw fill record as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFill {
    /// Instrument symbol (e.g., "BTC")
    pub coin: String,
    /// Exchange side code ("B" = buy, "A" = sell)
    pub side: String,
    /// Semantic direction ("Open Long", "Close Short", ...)
    pub dir: String,
    /// Trade quantity
    #[serde(deserialize_with = "deserialize_decimal_str")]
    pub sz: Decimal,
    /// Execution price
    #[serde(deserialize_with = "deserialize_decimal_str")]
    pub px: Decimal,
    /// Realized PnL attributed to this fill
    #[serde(deserialize_with = "deserialize_decimal_str")]
    pub closed_pnl: Decimal,
    /// Execution time, milliseconds since Unix epoch
    pub time: i64,
    /// Fee paid
    #[serde(deserialize_with = "deserialize_decimal_str")]
    pub fee: Decimal,
}

/// A single executed trade, parsed and immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeFill {
    /// Instrument symbol
    pub coin: String,
    /// Exchange side code ("B" = buy, "A" = sell)
    pub side: String,
    /// Semantic direction ("Open Long", "Close Short", ...)
    pub direction: String,
    /// Trade quantity (non-negative)
    pub size: Decimal,
    /// Execution price
    pub price: Decimal,
    /// Realized PnL (may be negative)
    pub pnl: Decimal,
    /// Execution instant, millisecond precision
    pub timestamp: DateTime<Utc>,
    /// Fee paid for this fill
    pub fee: Decimal,
}

impl TradeFill {
    /// Convert a raw record. Returns `None` if the millisecond epoch is out
    /// of the representable range.
    pub fn from_raw(raw: RawFill) -> Option<Self> {
        let timestamp = DateTime::from_timestamp_millis(raw.time)?;
        Some(Self {
            coin: raw.coin,
            side: raw.side,
            direction: raw.dir,
            size: raw.sz,
            price: raw.px,
            pnl: raw.closed_pnl,
            timestamp,
            fee: raw.fee,
        })
    }

    /// Notional value of this fill (price * size).
    pub fn notional_value(&self) -> Decimal {
        self.price * self.size
    }

    /// Net PnL contribution (pnl - fee).
    pub fn net_pnl(&self) -> Decimal {
        self.pnl - self.fee
    }
}

/// Parse a page of raw fill records, dropping any record that fails to
/// decode. Malformed entries are tolerated at record granularity; a bad
/// `sz` on one fill must not discard the other 1,999 on the page.
pub fn parse_fills(raw: Vec<Value>) -> Vec<TradeFill> {
    let total = raw.len();
    let fills: Vec<TradeFill> = raw
        .into_iter()
        .filter_map(|record| serde_json::from_value::<RawFill>(record).ok())
        .filter_map(TradeFill::from_raw)
        .collect();
    if fills.len() < total {
        debug!(dropped = total - fills.len(), "dropped malformed fill records");
    }
    fills
}

/// Portfolio reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    AllTime,
}

impl Period {
    /// Key of the combined (perp + spot) entry in the portfolio response.
    pub fn key(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::AllTime => "allTime",
        }
    }

    /// Key of the perp-only entry for the same period.
    pub fn perp_key(&self) -> &'static str {
        match self {
            Period::Day => "perpDay",
            Period::Week => "perpWeek",
            Period::Month => "perpMonth",
            Period::AllTime => "perpAllTime",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One `[timestamp_ms, "value"]` sample from a portfolio history series.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPoint(
    pub i64,
    #[serde(deserialize_with = "deserialize_decimal_str")] pub Decimal,
);

/// Per-period data inside the portfolio response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodData {
    #[serde(default)]
    pub account_value_history: Vec<HistoryPoint>,
    #[serde(default)]
    pub pnl_history: Vec<HistoryPoint>,
    /// Traded volume over the period
    #[serde(default, deserialize_with = "deserialize_decimal_str_option_null")]
    pub vlm: Option<Decimal>,
}

/// Portfolio metrics for one period: latest samples of the history series
/// plus the period volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioMetrics {
    pub account_value: Decimal,
    pub pnl: Decimal,
    pub volume: Decimal,
}

impl PortfolioMetrics {
    pub fn from_period(data: &PeriodData) -> Self {
        Self {
            account_value: data
                .account_value_history
                .last()
                .map(|p| p.1)
                .unwrap_or_default(),
            pnl: data.pnl_history.last().map(|p| p.1).unwrap_or_default(),
            volume: data.vlm.unwrap_or_default(),
        }
    }
}

/// Breakdown of a portfolio into perp and spot components.
///
/// The API reports combined and perp-only figures; spot is derived as the
/// residual, with account value and volume clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioBreakdown {
    pub total: PortfolioMetrics,
    pub perp: PortfolioMetrics,
    pub spot: PortfolioMetrics,
}

impl PortfolioBreakdown {
    pub fn from_parts(total: PortfolioMetrics, perp: PortfolioMetrics) -> Self {
        let spot = PortfolioMetrics {
            account_value: (total.account_value - perp.account_value).max(Decimal::ZERO),
            pnl: total.pnl - perp.pnl,
            volume: (total.volume - perp.volume).max(Decimal::ZERO),
        };
        Self { total, perp, spot }
    }
}

// Custom deserializers for Hyperliquid's string-encoded decimals

fn deserialize_decimal_str<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse::<Decimal>().map_err(serde::de::Error::custom)
}

/// Deserializer that handles both null JSON values and missing fields.
fn deserialize_decimal_str_option_null<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<Option<String>> = Option::deserialize(deserializer)?;
    match opt {
        Some(Some(s)) if !s.is_empty() => s
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw_fill(time: i64) -> Value {
        json!({
            "coin": "ETH",
            "side": "B",
            "dir": "Open Long",
            "sz": "1.5",
            "px": "3000.25",
            "closedPnl": "-12.5",
            "time": time,
            "fee": "0.45"
        })
    }

    #[test]
    fn test_parse_raw_fill() {
        let fills = parse_fills(vec![raw_fill(1704067200000)]);
        assert_eq!(fills.len(), 1);

        let fill = &fills[0];
        assert_eq!(fill.coin, "ETH");
        assert_eq!(fill.direction, "Open Long");
        assert_eq!(fill.size, dec!(1.5));
        assert_eq!(fill.pnl, dec!(-12.5));
        assert_eq!(fill.timestamp.timestamp_millis(), 1704067200000);
        assert_eq!(fill.notional_value(), dec!(4500.375));
        assert_eq!(fill.net_pnl(), dec!(-12.95));
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let mut page: Vec<Value> = (0..9).map(|i| raw_fill(1704067200000 + i)).collect();
        let mut bad = raw_fill(1704067209000);
        bad["sz"] = json!("not-a-number");
        page.push(bad);

        let fills = parse_fills(page);
        assert_eq!(fills.len(), 9);
    }

    #[test]
    fn test_info_request_serialization() {
        let req = InfoRequest::UserFillsByTime {
            user: "0xabc".to_string(),
            start_time: 1700000000000,
            end_time: Some(1700000500000),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""type":"userFillsByTime""#));
        assert!(json.contains(r#""startTime":1700000000000"#));
        assert!(json.contains(r#""endTime":1700000500000"#));

        let req = InfoRequest::UserFillsByTime {
            user: "0xabc".to_string(),
            start_time: 1700000000000,
            end_time: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("endTime"));

        let req = InfoRequest::Portfolio {
            user: "0xabc".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"type":"portfolio","user":"0xabc"}"#
        );
    }

    #[test]
    fn test_period_keys() {
        assert_eq!(Period::Day.key(), "day");
        assert_eq!(Period::Day.perp_key(), "perpDay");
        assert_eq!(Period::AllTime.key(), "allTime");
        assert_eq!(Period::AllTime.perp_key(), "perpAllTime");
    }

    #[test]
    fn test_period_data_deserialization() {
        let json = r#"{
            "accountValueHistory": [[1700000000000, "1000.5"], [1700000100000, "1010.0"]],
            "pnlHistory": [[1700000000000, "0"], [1700000100000, "9.5"]],
            "vlm": "50000.0"
        }"#;

        let data: PeriodData = serde_json::from_str(json).unwrap();
        let metrics = PortfolioMetrics::from_period(&data);
        assert_eq!(metrics.account_value, dec!(1010.0));
        assert_eq!(metrics.pnl, dec!(9.5));
        assert_eq!(metrics.volume, dec!(50000.0));
    }

    #[test]
    fn test_empty_period_data_yields_zero_metrics() {
        let data: PeriodData = serde_json::from_str("{}").unwrap();
        assert_eq!(PortfolioMetrics::from_period(&data), PortfolioMetrics::default());
    }

    #[test]
    fn test_spot_residual_clamped_at_zero() {
        let total = PortfolioMetrics {
            account_value: dec!(100),
            pnl: dec!(10),
            volume: dec!(1000),
        };
        let perp = PortfolioMetrics {
            account_value: dec!(120),
            pnl: dec!(15),
            volume: dec!(1000),
        };

        let breakdown = PortfolioBreakdown::from_parts(total, perp);
        assert_eq!(breakdown.spot.account_value, Decimal::ZERO);
        assert_eq!(breakdown.spot.pnl, dec!(-5)); // PnL residual keeps its sign
        assert_eq!(breakdown.spot.volume, Decimal::ZERO);
    }
}
