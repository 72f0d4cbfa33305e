// =============================================================================
// Rule-based Signal Generator
// =============================================================================
//
// Additive point system seeded at 50.  Each rule inspects the bundle and the
// current price and may contribute a score delta and a reason.  Rules run in
// a fixed order and reasons are kept in that order, unsorted and not
// deduplicated (consumers usually show the first three or four).
//
//   1. RSI          <30 +15 | >70 -15 | <45 +5 | >55 -5   (first match)
//   2. MACD         bullish crossover +10 | bearish crossover -10
//   3. SMA20/SMA50  price above both +10 | below both -10
//   4. SMA50/SMA200 golden cross +5 | death cross -5
//   5. Bollinger    price <= lower +10 | price >= upper -10
//   6. ADX          reason only, no score effect
//
// The score is clamped to [0, 100] and mapped onto the signal ladder:
//   >=70 Strong Buy, >=55 Buy, >=45 Neutral, >=30 Sell, else Strong Sell.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorBundle;
use crate::types::Signal;

const BASE_SCORE: i32 = 50;

/// Outcome of one signal evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub signal: Signal,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// A single rule's contribution.
struct Adjustment {
    delta: i32,
    reason: String,
}

impl Adjustment {
    fn new(delta: i32, reason: impl Into<String>) -> Self {
        Self {
            delta,
            reason: reason.into(),
        }
    }
}

type Rule = fn(&IndicatorBundle, f64) -> Option<Adjustment>;

/// Evaluation order matters: it is the order of the reasons list.
const RULES: [Rule; 6] = [
    rsi_rule,
    macd_rule,
    moving_average_rule,
    cross_rule,
    bollinger_rule,
    trend_strength_rule,
];

/// Score `bundle` against `current_price` and derive the trading signal.
pub fn generate_signal(bundle: &IndicatorBundle, current_price: f64) -> SignalResult {
    let (raw, reasons) = RULES
        .iter()
        .filter_map(|rule| rule(bundle, current_price))
        .fold((BASE_SCORE, Vec::new()), |(score, mut reasons), adj| {
            reasons.push(adj.reason);
            (score + adj.delta, reasons)
        });

    let score = raw.clamp(0, 100) as u8;

    SignalResult {
        signal: signal_for_score(score),
        score,
        reasons,
    }
}

/// Map a clamped score onto the signal ladder (thresholds inclusive).
pub fn signal_for_score(score: u8) -> Signal {
    match score {
        70.. => Signal::StrongBuy,
        55..=69 => Signal::Buy,
        45..=54 => Signal::Neutral,
        30..=44 => Signal::Sell,
        _ => Signal::StrongSell,
    }
}

// =============================================================================
// Rules
// =============================================================================

fn rsi_rule(b: &IndicatorBundle, _price: f64) -> Option<Adjustment> {
    if b.rsi < 30.0 {
        Some(Adjustment::new(15, "RSI oversold (<30) - bullish reversal potential"))
    } else if b.rsi > 70.0 {
        Some(Adjustment::new(-15, "RSI overbought (>70) - bearish reversal potential"))
    } else if b.rsi < 45.0 {
        Some(Adjustment::new(5, "RSI in lower range - mild bullish"))
    } else if b.rsi > 55.0 {
        Some(Adjustment::new(-5, "RSI in upper range - mild bearish"))
    } else {
        None
    }
}

fn macd_rule(b: &IndicatorBundle, _price: f64) -> Option<Adjustment> {
    let m = &b.macd;
    if m.histogram > 0.0 && m.macd_line > m.signal_line {
        Some(Adjustment::new(10, "MACD bullish crossover"))
    } else if m.histogram < 0.0 && m.macd_line < m.signal_line {
        Some(Adjustment::new(-10, "MACD bearish crossover"))
    } else {
        None
    }
}

fn moving_average_rule(b: &IndicatorBundle, price: f64) -> Option<Adjustment> {
    if price > b.sma20 && price > b.sma50 {
        Some(Adjustment::new(10, "Price above SMA20 & SMA50 - uptrend"))
    } else if price < b.sma20 && price < b.sma50 {
        Some(Adjustment::new(-10, "Price below SMA20 & SMA50 - downtrend"))
    } else {
        None
    }
}

fn cross_rule(b: &IndicatorBundle, _price: f64) -> Option<Adjustment> {
    if b.sma50 > b.sma200 {
        Some(Adjustment::new(5, "Golden cross (SMA50 > SMA200) - long-term bullish"))
    } else if b.sma50 < b.sma200 {
        Some(Adjustment::new(-5, "Death cross (SMA50 < SMA200) - long-term bearish"))
    } else {
        None
    }
}

fn bollinger_rule(b: &IndicatorBundle, price: f64) -> Option<Adjustment> {
    if price <= b.bollinger.lower {
        Some(Adjustment::new(10, "Price at lower Bollinger Band - oversold"))
    } else if price >= b.bollinger.upper {
        Some(Adjustment::new(-10, "Price at upper Bollinger Band - overbought"))
    } else {
        None
    }
}

fn trend_strength_rule(b: &IndicatorBundle, _price: f64) -> Option<Adjustment> {
    if b.adx > 25.0 {
        Some(Adjustment::new(
            0,
            format!("Strong trend detected (ADX: {:.1})", round_half_up_1dp(b.adx)),
        ))
    } else {
        Some(Adjustment::new(0, "Weak trend / consolidation phase"))
    }
}

/// Round to one decimal with ties away from zero; `{:.1}` alone rounds exact
/// binary ties to even (31.25 -> "31.2").
fn round_half_up_1dp(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
