// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the last `period` prices.
//
// Fallback: when fewer than `period` prices are available the most recent
// price is returned as-is (not the mean of what is available).  An empty
// slice yields 0.
// =============================================================================

/// Mean of the last `period` values of `prices`.
pub fn calculate_sma(prices: &[f64], period: usize) -> f64 {
    debug_assert!(period > 0, "SMA period must be positive");

    if prices.len() < period {
        return prices.last().copied().unwrap_or(0.0);
    }

    let window = &prices[prices.len() - period..];
    window.iter().sum::<f64>() / period as f64
}
