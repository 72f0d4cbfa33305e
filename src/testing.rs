// Test fixtures shared by the unit tests of several modules.

use chrono::{Duration, TimeZone, Utc};

use crate::types::PriceBar;

/// A bar with fixed timestamp and volume; only OHLC matter to the engine.
pub fn bar(open: f64, high: f64, low: f64, close: f64) -> PriceBar {
    PriceBar {
        timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        open,
        high,
        low,
        close,
        volume: 100_000,
    }
}

/// Daily bars whose close follows `closes`, with a ±1 range around it.
pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar {
            timestamp: start + Duration::days(i as i64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: 100_000,
        })
        .collect()
}

/// `n` identical bars with no range at all.
pub fn flat_bars(price: f64, n: usize) -> Vec<PriceBar> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| PriceBar {
            timestamp: start + Duration::days(i as i64),
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 100_000,
        })
        .collect()
}
