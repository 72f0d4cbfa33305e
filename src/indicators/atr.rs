// =============================================================================
// Average True Range (ATR) — simple average of recent true ranges
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar after the first:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the SMA of the last `period` TR values.  It shares the SMA fallback:
// with fewer than `period` true ranges the most recent TR is returned.
//
// Default period: 14
// =============================================================================

use super::sma::calculate_sma;
use crate::types::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

/// True range of every bar that has a predecessor (`bars.len() - 1` values).
pub fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            let (prev, cur) = (&w[0], &w[1]);
            let hl = cur.high - cur.low;
            let hc = (cur.high - prev.close).abs();
            let lc = (cur.low - prev.close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// Compute the most recent ATR value from a slice of bars (oldest first).
///
/// Returns `0.0` when fewer than 2 bars are supplied.
pub fn calculate_atr(bars: &[PriceBar], period: usize) -> f64 {
    debug_assert!(period > 0, "ATR period must be positive");

    if bars.len() < 2 {
        return 0.0;
    }

    let trs = true_ranges(bars);
    let recent = &trs[trs.len().saturating_sub(period)..];
    calculate_sma(recent, period)
}
