// =============================================================================
// Average Directional Index (ADX) — simplified single-pass variant
// =============================================================================
//
// This is NOT Wilder's ADX.  The signal thresholds were tuned against the
// reduced formula below, so it must not be swapped for the canonical one.
//
// Calculation:
//   1. Sum +DM and -DM over the first `period` bar transitions of the series
//      (raw sums, no per-bar averaging, no smoothing).
//   2. ATR over the last `period + 1` bars.
//   3. +DI = +DM / ATR * 100,  -DI = -DM / ATR * 100
//   4. ADX = |+DI - -DI| / (+DI + -DI) * 100
//
// Fallback value 25 (the trending / ranging boundary) is returned when:
//   - fewer than `period + 1` bars are available
//   - ATR is zero
//   - +DI + -DI is zero
//
// Interpretation:
//   ADX > 25  => trending market
//   otherwise => weak trend / consolidation
// =============================================================================

use super::atr::calculate_atr;
use crate::types::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

/// Value returned whenever the directional reading is undefined.
pub const FALLBACK_ADX: f64 = 25.0;

/// Compute the simplified ADX of `bars` (oldest first).
pub fn calculate_adx(bars: &[PriceBar], period: usize) -> f64 {
    debug_assert!(period > 0, "ADX period must be positive");

    if bars.len() < period + 1 {
        return FALLBACK_ADX;
    }

    let (plus_dm, minus_dm) = directional_movement(bars, period);

    let atr = calculate_atr(&bars[bars.len() - (period + 1)..], period);
    if atr == 0.0 {
        return FALLBACK_ADX;
    }

    let plus_di = (plus_dm / atr) * 100.0;
    let minus_di = (minus_dm / atr) * 100.0;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return FALLBACK_ADX;
    }

    (plus_di - minus_di).abs() / di_sum * 100.0
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Raw +DM / -DM totals over transitions `1..min(period + 1, len)`.
fn directional_movement(bars: &[PriceBar], period: usize) -> (f64, f64) {
    let end = (period + 1).min(bars.len());
    let mut plus_dm = 0.0;
    let mut minus_dm = 0.0;

    for i in 1..end {
        let up_move = bars[i].high - bars[i - 1].high;
        let down_move = bars[i - 1].low - bars[i].low;

        if up_move > down_move && up_move > 0.0 {
            plus_dm += up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm += down_move;
        }
    }

    (plus_dm, minus_dm)
}
