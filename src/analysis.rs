// =============================================================================
// Analysis Report — one pass over a series for the dashboard
// =============================================================================
//
// Bundles everything the presentation layer renders for one instrument:
// headline quote, indicator bundle, signal, key levels, a recent-close strip
// and chart overlay points.  Also builds the payload handed to the external
// prediction service (the service itself is not called from here).
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::{calculate_all_indicators, IndicatorBundle};
use crate::key_levels::{calculate_key_levels, KeyLevels};
use crate::market_data::PriceQuote;
use crate::signals::{generate_signal, SignalResult};
use crate::types::{PriceBar, Timeframe};

/// One point of the price chart with its rolling moving-average overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// `None` until 20 closes are available up to this bar.
    pub sma20: Option<f64>,
    /// `None` until 50 closes are available up to this bar.
    pub sma50: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub quote: PriceQuote,
    pub indicators: IndicatorBundle,
    pub signal: SignalResult,
    pub key_levels: KeyLevels,
    pub recent_prices: Vec<f64>,
    pub chart: Vec<ChartPoint>,
}

/// Macro backdrop passed along with prediction requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalIndicators {
    /// DXY; inversely correlated with gold.
    pub usd_index: f64,
    pub usd_index_change: f64,
    pub fed_funds_rate: f64,
    /// 10Y treasury minus inflation.
    pub real_yield: f64,
    pub inflation: f64,
    pub gold_silver_ratio: f64,
    pub vix: f64,
}

impl Default for FundamentalIndicators {
    fn default() -> Self {
        Self {
            usd_index: 103.45,
            usd_index_change: -0.32,
            fed_funds_rate: 4.50,
            real_yield: 1.85,
            inflation: 2.9,
            gold_silver_ratio: 87.5,
            vix: 18.75,
        }
    }
}

/// Request payload for the external prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub instrument: String,
    pub current_price: f64,
    pub technical_data: IndicatorBundle,
    pub fundamental_data: FundamentalIndicators,
    pub recent_prices: Vec<f64>,
    pub timeframe: Timeframe,
}

/// Run the full analysis over `bars`.
///
/// Returns `None` for an empty series: there is no current price to score
/// against.
pub fn analyze(
    symbol: &str,
    bars: &[PriceBar],
    live: bool,
    chart_window: usize,
    recent_window: usize,
) -> Option<AnalysisReport> {
    let quote = PriceQuote::from_bars(symbol, bars, live)?;
    let indicators = calculate_all_indicators(bars);
    let signal = generate_signal(&indicators, quote.price);

    Some(AnalysisReport {
        quote,
        indicators,
        signal,
        key_levels: calculate_key_levels(bars),
        recent_prices: recent_closes(bars, recent_window),
        chart: chart_points(bars, chart_window),
    })
}

/// Build the prediction-service payload for `bars`.
pub fn build_prediction_request(
    symbol: &str,
    timeframe: Timeframe,
    bars: &[PriceBar],
    fundamentals: &FundamentalIndicators,
    recent_window: usize,
) -> Option<PredictionRequest> {
    let current_price = bars.last()?.close;

    Some(PredictionRequest {
        instrument: symbol.to_string(),
        current_price,
        technical_data: calculate_all_indicators(bars),
        fundamental_data: fundamentals.clone(),
        recent_prices: recent_closes(bars, recent_window),
        timeframe,
    })
}

/// The last `window` closes, oldest first.
pub fn recent_closes(bars: &[PriceBar], window: usize) -> Vec<f64> {
    bars[bars.len().saturating_sub(window)..]
        .iter()
        .map(|b| b.close)
        .collect()
}

/// Chart points for the last `window` bars.
///
/// Each overlay is the mean of the closes ending at that bar; unlike the
/// engine SMA there is no last-price fallback, a short prefix is `None`.
pub fn chart_points(bars: &[PriceBar], window: usize) -> Vec<ChartPoint> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let start = bars.len().saturating_sub(window);

    bars.iter()
        .enumerate()
        .skip(start)
        .map(|(i, b)| {
            let prefix = &closes[..=i];
            ChartPoint {
                timestamp: b.timestamp,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
                sma20: trailing_mean(prefix, 20),
                sma50: trailing_mean(prefix, 50),
            }
        })
        .collect()
}

fn trailing_mean(prefix: &[f64], period: usize) -> Option<f64> {
    if prefix.len() < period {
        return None;
    }
    let window = &prefix[prefix.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
