// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators behind the
// desk's analysis report.  Every function is total over well-typed input: a
// series that is too short for the requested look-back resolves to a fixed
// fallback value instead of an error.
//
// Preconditions (`period > 0`) are programmer errors and are checked with
// `debug_assert!` only.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod bundle;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use adx::calculate_adx;
pub use atr::{calculate_atr, true_ranges};
pub use bollinger::{calculate_bollinger, BollingerBands};
pub use bundle::{calculate_all_indicators, IndicatorBundle};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdResult};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

/// Extract the close prices of a bar series (oldest first).
pub fn closes(bars: &[crate::types::PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
