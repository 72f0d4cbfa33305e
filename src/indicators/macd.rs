// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(12) - EMA(26)
//   Signal line = EMA(9) of the MACD history
//   Histogram   = MACD line - Signal line
//
// The MACD history is rebuilt by recomputing EMA(12) and EMA(26) from scratch
// on every prefix `prices[..i]`, `i` in `26..=len`.  This is O(n²) but it is
// the reference numerical lineage; an incremental EMA would drift in the last
// bits and break exact comparisons.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::calculate_ema;

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdResult {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Compute MACD (12, 26, 9) for `prices`.
pub fn calculate_macd(prices: &[f64]) -> MacdResult {
    let macd_line = calculate_ema(prices, FAST_PERIOD) - calculate_ema(prices, SLOW_PERIOD);

    let history = macd_history(prices);
    let signal_line = calculate_ema(&history, SIGNAL_PERIOD);

    MacdResult {
        macd_line,
        signal_line,
        histogram: macd_line - signal_line,
    }
}

/// MACD values for every prefix of at least `SLOW_PERIOD` prices.
fn macd_history(prices: &[f64]) -> Vec<f64> {
    if prices.len() < SLOW_PERIOD {
        return Vec::new();
    }

    (SLOW_PERIOD..=prices.len())
        .map(|end| {
            let prefix = &prices[..end];
            calculate_ema(prefix, FAST_PERIOD) - calculate_ema(prefix, SLOW_PERIOD)
        })
        .collect()
}
