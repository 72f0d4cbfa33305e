// =============================================================================
// Indicator Bundle — every indicator evaluated at the last bar of a series
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{
    adx, atr, bollinger, calculate_adx, calculate_atr, calculate_bollinger, calculate_ema,
    calculate_macd, calculate_rsi, calculate_sma, closes, BollingerBands, MacdResult,
};
use crate::types::PriceBar;

pub const RSI_PERIOD: usize = 14;

/// Snapshot of all technical indicators for one evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    /// 0..=100
    pub rsi: f64,
    pub macd: MacdResult,
    pub sma20: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub bollinger: BollingerBands,
    pub atr: f64,
    /// Simplified ADX; see `indicators::adx`.
    pub adx: f64,
}

/// Run the full indicator set over `bars`.
pub fn calculate_all_indicators(bars: &[PriceBar]) -> IndicatorBundle {
    let closes = closes(bars);

    IndicatorBundle {
        rsi: calculate_rsi(&closes, RSI_PERIOD),
        macd: calculate_macd(&closes),
        sma20: calculate_sma(&closes, 20),
        sma50: calculate_sma(&closes, 50),
        sma200: calculate_sma(&closes, 200),
        ema12: calculate_ema(&closes, 12),
        ema26: calculate_ema(&closes, 26),
        bollinger: calculate_bollinger(
            &closes,
            bollinger::DEFAULT_PERIOD,
            bollinger::DEFAULT_NUM_STD,
        ),
        atr: calculate_atr(bars, atr::DEFAULT_PERIOD),
        adx: calculate_adx(bars, adx::DEFAULT_PERIOD),
    }
}
