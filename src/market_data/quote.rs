use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::PriceBar;

/// Headline quote for an instrument, derived from the last two bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub volume: u64,
    pub timestamp: DateTime<Utc>,
    /// True when the series was rescaled to a live price.
    pub live: bool,
}

impl PriceQuote {
    /// Build the quote from `bars`; `None` for an empty series.
    ///
    /// With a single bar the change is zero.
    pub fn from_bars(symbol: &str, bars: &[PriceBar], live: bool) -> Option<Self> {
        let last = bars.last()?;
        let prev_close = bars
            .len()
            .checked_sub(2)
            .map(|i| bars[i].close)
            .unwrap_or(last.close);

        let change = last.close - prev_close;
        let change_percent = if prev_close != 0.0 {
            change / prev_close * 100.0
        } else {
            0.0
        };

        Some(Self {
            symbol: symbol.to_string(),
            price: last.close,
            change,
            change_percent,
            high: last.high,
            low: last.low,
            open: last.open,
            volume: last.volume,
            timestamp: last.timestamp,
            live,
        })
    }
}
