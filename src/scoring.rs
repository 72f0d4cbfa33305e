// =============================================================================
// Stock Scorer — weighted fundamental / technical scoring for equities
// =============================================================================
//
// Each metric is min-max normalised against a benchmark range (inverted where
// lower is better), scaled by user weight multipliers and combined into 0..=100
// scores:
//
//   fundamental = DER·safety·0.25 + ROE·growth·0.35 + avg(PBV, PE)·value·0.40
//   technical   = avg(volatility, beta)·safety·0.50
//               + avg(volume ratio, change %)·momentum·0.50
//   overall     = round(fundamental·0.6 + technical·0.4)
//
// Multipliers are `1 + weight / 100`, so a weight of 0..=100 boosts a factor
// by 1x..2x.

use serde::{Deserialize, Serialize};

/// Raw inputs for one listed stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMetrics {
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: String,
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub market_cap: f64,
    /// Debt to equity.
    pub der: f64,
    /// Return on equity, percent.
    pub roe: f64,
    /// Price to book value.
    pub pbv: f64,
    /// Price to earnings; negative for loss-making companies.
    pub pe: f64,
    #[serde(default)]
    pub eps: f64,
    pub beta: f64,
    pub volatility: f64,
    #[serde(default)]
    pub avg_volume: f64,
    #[serde(default)]
    pub historical_prices: Vec<f64>,
}

/// User weights, each nominally 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub safety: f64,
    pub growth: f64,
    pub value: f64,
    pub momentum: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            safety: 25.0,
            growth: 30.0,
            value: 25.0,
            momentum: 20.0,
        }
    }
}

/// Normalisation ranges `(min, max)` per metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmarks {
    pub der_range: (f64, f64),
    pub roe_range: (f64, f64),
    pub pbv_range: (f64, f64),
    pub pe_range: (f64, f64),
    pub volatility_range: (f64, f64),
    pub beta_range: (f64, f64),
    pub volume_range: (f64, f64),
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            der_range: (0.0, 3.0),
            roe_range: (-20.0, 50.0),
            pbv_range: (0.0, 10.0),
            pe_range: (-15.0, 40.0),
            volatility_range: (0.0, 6.0),
            beta_range: (0.5, 2.0),
            volume_range: (1_000_000.0, 100_000_000.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationLabel {
    Cheap,
    Fair,
    Expensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentCategory {
    #[serde(rename = "Long-term")]
    LongTerm,
    #[serde(rename = "Swing Trade")]
    SwingTrade,
    #[serde(rename = "Daily Trade")]
    DailyTrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Metrics plus every derived score and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredStock {
    #[serde(flatten)]
    pub metrics: StockMetrics,
    pub fundamental_score: u8,
    pub technical_score: u8,
    pub overall_score: u8,
    pub valuation_label: ValuationLabel,
    pub investment_category: InvestmentCategory,
    pub risk_level: RiskLevel,
}

// =============================================================================
// Normalisation
// =============================================================================

/// Position of `value` inside `[min, max]`, clamped to 0..=1; 0.5 if the
/// range is degenerate.
pub fn normalize_min_max(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

pub fn normalize_inverse(value: f64, min: f64, max: f64) -> f64 {
    1.0 - normalize_min_max(value, min, max)
}

fn multiplier(weight: f64) -> f64 {
    1.0 + weight / 100.0
}

fn to_score(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}

// =============================================================================
// Scores
// =============================================================================

pub fn fundamental_score(stock: &StockMetrics, weights: &WeightConfig, bench: &Benchmarks) -> u8 {
    let der_score = normalize_inverse(stock.der, bench.der_range.0, bench.der_range.1) * 100.0;
    let roe_score = normalize_min_max(stock.roe.max(0.0), 0.0, bench.roe_range.1) * 100.0;
    let pbv_score = normalize_inverse(stock.pbv, bench.pbv_range.0, bench.pbv_range.1) * 100.0;
    // Loss-making companies get a flat low value score.
    let pe_score = if stock.pe > 0.0 {
        normalize_inverse(stock.pe, 0.0, bench.pe_range.1) * 100.0
    } else {
        20.0
    };

    let safety = der_score * multiplier(weights.safety) * 0.25;
    let growth = roe_score * multiplier(weights.growth) * 0.35;
    let value = ((pbv_score + pe_score) / 2.0) * multiplier(weights.value) * 0.40;

    to_score(safety + growth + value)
}

pub fn technical_score(stock: &StockMetrics, weights: &WeightConfig, bench: &Benchmarks) -> u8 {
    let volatility_score = normalize_inverse(
        stock.volatility,
        bench.volatility_range.0,
        bench.volatility_range.1,
    ) * 100.0;
    let beta_score = normalize_inverse(stock.beta, bench.beta_range.0, bench.beta_range.1) * 100.0;

    let volume_ratio = if stock.avg_volume > 0.0 {
        stock.volume / stock.avg_volume
    } else {
        1.0
    };
    let volume_score = normalize_min_max(volume_ratio, 0.5, 2.0) * 100.0;
    let momentum_score = normalize_min_max(stock.change_percent, -5.0, 5.0) * 100.0;

    let stability = ((volatility_score + beta_score) / 2.0) * multiplier(weights.safety) * 0.50;
    let momentum = ((volume_score + momentum_score) / 2.0) * multiplier(weights.momentum) * 0.50;

    to_score(stability + momentum)
}

// =============================================================================
// Labels
// =============================================================================

pub fn valuation_label(pbv: f64, pe: f64) -> ValuationLabel {
    let mut cheap = 0;
    let mut expensive = 0;

    if pbv < 1.0 {
        cheap += 1;
    } else if pbv > 3.0 {
        expensive += 1;
    }

    if pe > 0.0 && pe < 10.0 {
        cheap += 1;
    } else if pe > 25.0 {
        expensive += 1;
    }

    match (cheap, expensive) {
        (c, 0) if c >= 1 => ValuationLabel::Cheap,
        (0, e) if e >= 1 => ValuationLabel::Expensive,
        _ => ValuationLabel::Fair,
    }
}

pub fn investment_category(volatility: f64, avg_volume: f64, beta: f64) -> InvestmentCategory {
    if volatility > 3.0 && avg_volume > 10_000_000.0 {
        InvestmentCategory::DailyTrade
    } else if volatility > 1.5 || beta > 1.3 {
        InvestmentCategory::SwingTrade
    } else {
        InvestmentCategory::LongTerm
    }
}

pub fn risk_level(der: f64, volatility: f64, beta: f64) -> RiskLevel {
    let tier = |v: f64, mid: f64, high: f64| -> u32 {
        if v > high {
            2
        } else if v > mid {
            1
        } else {
            0
        }
    };

    let points = tier(der, 0.8, 1.5) + tier(volatility, 1.5, 3.0) + tier(beta, 1.2, 1.5);
    match points {
        4.. => RiskLevel::High,
        2..=3 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Score one stock and attach its labels.
pub fn score_stock(stock: StockMetrics, weights: &WeightConfig, bench: &Benchmarks) -> ScoredStock {
    let fundamental = fundamental_score(&stock, weights, bench);
    let technical = technical_score(&stock, weights, bench);
    let overall = to_score(fundamental as f64 * 0.6 + technical as f64 * 0.4);

    ScoredStock {
        fundamental_score: fundamental,
        technical_score: technical,
        overall_score: overall,
        valuation_label: valuation_label(stock.pbv, stock.pe),
        investment_category: investment_category(stock.volatility, stock.avg_volume, stock.beta),
        risk_level: risk_level(stock.der, stock.volatility, stock.beta),
        metrics: stock,
    }
}
