// =============================================================================
// Key Levels — support / resistance from local extrema
// =============================================================================
//
// A bar is a swing high when its high is strictly greater than the highs of
// the two bars on each side; a swing low mirrors that on lows.  Swing highs
// above the current close become resistance candidates, swing lows below it
// become support candidates.
//
// Resistance is ordered ascending and support descending, i.e. nearest to the
// current price first, and each side is truncated to three levels.  A side
// with fewer than two genuine levels is padded with synthetic levels at
// ±2% / ±5% of the current close.  Series shorter than ten bars skip the scan
// and return the synthetic levels only.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::PriceBar;

/// Minimum series length for the extrema scan.
pub const MIN_BARS: usize = 10;
const MAX_LEVELS: usize = 3;
/// Reference price used when no usable close exists.
const DEFAULT_REFERENCE_PRICE: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    /// Below the current price, nearest first.
    pub support: Vec<f64>,
    /// Above the current price, nearest first.
    pub resistance: Vec<f64>,
}

/// Propose up to three support and three resistance levels for `bars`.
pub fn calculate_key_levels(bars: &[PriceBar]) -> KeyLevels {
    if bars.len() < MIN_BARS {
        let current = bars
            .last()
            .map(|b| b.close)
            .filter(|c| *c != 0.0)
            .unwrap_or(DEFAULT_REFERENCE_PRICE);
        return KeyLevels {
            support: synthetic_support(current).to_vec(),
            resistance: synthetic_resistance(current).to_vec(),
        };
    }

    let current = bars[bars.len() - 1].close;
    let (swing_highs, swing_lows) = swing_points(bars);

    let mut resistance: Vec<f64> = swing_highs.into_iter().filter(|&h| h > current).collect();
    resistance.sort_by(|a, b| a.total_cmp(b));
    resistance.dedup();
    resistance.truncate(MAX_LEVELS);

    let mut support: Vec<f64> = swing_lows.into_iter().filter(|&l| l < current).collect();
    support.sort_by(|a, b| b.total_cmp(a));
    support.dedup();
    support.truncate(MAX_LEVELS);

    if resistance.len() < 2 {
        resistance.extend(synthetic_resistance(current));
        resistance.truncate(MAX_LEVELS);
    }
    if support.len() < 2 {
        support.extend(synthetic_support(current));
        support.truncate(MAX_LEVELS);
    }

    KeyLevels {
        support,
        resistance,
    }
}

fn synthetic_support(current: f64) -> [f64; 2] {
    [current * 0.98, current * 0.95]
}

fn synthetic_resistance(current: f64) -> [f64; 2] {
    [current * 1.02, current * 1.05]
}

/// Swing highs and swing lows over indices `2..len-2`, in series order.
fn swing_points(bars: &[PriceBar]) -> (Vec<f64>, Vec<f64>) {
    let mut highs = Vec::new();
    let mut lows = Vec::new();

    for i in 2..bars.len().saturating_sub(2) {
        let neighbours = [i - 2, i - 1, i + 1, i + 2];

        let h = bars[i].high;
        if neighbours.iter().all(|&j| h > bars[j].high) {
            highs.push(h);
        }

        let l = bars[i].low;
        if neighbours.iter().all(|&j| l < bars[j].low) {
            lows.push(l);
        }
    }

    (highs, lows)
}
