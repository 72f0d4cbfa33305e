// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ).  σ is the population standard deviation
// (divide by `period`, not `period - 1`) of the last `period` closes.
//
// With fewer than `period` closes the middle band inherits the SMA fallback
// (last close) and the variance is still divided by `period`.

use serde::{Deserialize, Serialize};

use super::sma::calculate_sma;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands for the given closing prices.
pub fn calculate_bollinger(prices: &[f64], period: usize, num_std: f64) -> BollingerBands {
    debug_assert!(period > 0, "Bollinger period must be positive");

    let middle = calculate_sma(prices, period);
    let window = &prices[prices.len().saturating_sub(period)..];

    let variance = window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    BollingerBands {
        upper: middle + num_std * std_dev,
        middle,
        lower: middle - num_std * std_dev,
    }
}
