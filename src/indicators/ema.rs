// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The first EMA value is seeded with the SMA of the first `period` closes.
// The recurrence is written in the "delta" form above on purpose: the MACD
// signal line is compared bit-for-bit against this exact lineage.
// =============================================================================

use super::sma::calculate_sma;

/// Compute the most recent EMA of `prices` for look-back `period`.
///
/// # Edge cases
/// - empty input => `0.0`
/// - `prices.len() < period` => mean of everything available
pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    debug_assert!(period > 0, "EMA period must be positive");

    if prices.is_empty() {
        return 0.0;
    }
    if prices.len() < period {
        return calculate_sma(prices, prices.len());
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let mut ema = calculate_sma(&prices[..period], period);
    for &price in &prices[period..] {
        ema = (price - ema) * multiplier + ema;
    }

    ema
}
