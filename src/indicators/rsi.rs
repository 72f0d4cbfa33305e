// =============================================================================
// Relative Strength Index (RSI) — simple-average variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an instrument is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) over the whole input.
// Step 2 — Keep the last `period` deltas; sum the gains and the absolute
//          losses and divide each by `period` (no Wilder smoothing).
// Step 3 — avg_loss == 0  => RSI = 100
//          otherwise RS = avg_gain / avg_loss, RSI = 100 - 100 / (1 + RS)
//
// Thresholds used downstream:  RSI > 70 overbought,  RSI < 30 oversold.
// =============================================================================

/// Neutral reading returned when fewer than `period + 1` prices exist.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the current RSI of `prices` over `period` deltas.
///
/// # Edge cases
/// - `prices.len() < period + 1` => [`NEUTRAL_RSI`]
/// - no losses in the window => `100.0` (flat windows included)
pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    debug_assert!(period > 0, "RSI period must be positive");

    if prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &deltas[deltas.len() - period..];

    let (gains, losses) = recent.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let avg_gain = gains / period_f;
    let avg_loss = losses / period_f;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_insufficient_data() {
        // Need period+1 closes. 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&closes, 14), 50.0);
        assert_eq!(calculate_rsi(&[], 14), 50.0);
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending 30-bar series => avg_loss == 0 => exactly 100.
        let closes: Vec<f64> = (1..=30).map(|x| 2000.0 + x as f64 * 3.5).collect();
        assert_eq!(calculate_rsi(&closes, 14), 100.0);
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).abs() < 1e-10);
    }

    #[test]
    fn rsi_flat_market_hits_zero_loss_branch() {
        // No change at all => no losses => 100, not 50.
        let closes = vec![100.0; 30];
        assert_eq!(calculate_rsi(&closes, 14), 100.0);
    }

    #[test]
    fn rsi_only_uses_last_period_deltas() {
        // A crash early in the series is outside the 14-delta window.
        let mut closes = vec![200.0, 100.0];
        closes.extend((0..20).map(|i| 100.0 + i as f64));
        assert_eq!(calculate_rsi(&closes, 14), 100.0);
    }

    #[test]
    fn rsi_known_value() {
        // 3 deltas window: +2, -1, +1 => gains 3, losses 1 => RS 3 => RSI 75.
        let closes = [10.0, 12.0, 11.0, 12.0];
        assert!((calculate_rsi(&closes, 3) - 75.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let v = calculate_rsi(&closes, 14);
        assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
    }
}
