use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Instrument, PriceBar};

// ---------------------------------------------------------------------------
// PriceSource -- where bar series come from
// ---------------------------------------------------------------------------

/// Supplies a bar series for an instrument, oldest bar first.
///
/// Implementations are injected into [`crate::app_state::AppState`] so the
/// analysis path can run against fixed fixtures in tests and against the
/// synthetic generator in the service.
pub trait PriceSource: Send + Sync {
    fn bars(&self, instrument: &Instrument) -> Vec<PriceBar>;
}

// ---------------------------------------------------------------------------
// RandomWalkSource -- seeded synthetic daily bars
// ---------------------------------------------------------------------------

/// Deterministic random walk with a slow sinusoidal drift.
///
/// For each day `i` counting down from `days` to 0:
///
/// ```text
/// trend  = sin(i / 10) * 0.002
/// change = (u - 0.5) * 2 * volatility + trend
/// price  = price * (1 + change)
/// open   = price * (1 + (u - 0.5) * 0.005)
/// high   = max(open, close) * (1 + u * 0.008)
/// low    = min(open, close) * (1 - u * 0.008)
/// volume = 50_000 + floor(u * 100_000)
/// ```
///
/// Every `u` is a fresh uniform draw.  The same seed, instrument and end date
/// always produce the same `days + 1` bars.
#[derive(Debug, Clone)]
pub struct RandomWalkSource {
    seed: u64,
    days: u32,
    end: DateTime<Utc>,
}

impl RandomWalkSource {
    pub fn new(seed: u64, days: u32, end: DateTime<Utc>) -> Self {
        Self { seed, days, end }
    }

    /// Per-instrument stream seed so instruments do not share a path.
    fn stream_seed(&self, symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(self.seed ^ 0xcbf2_9ce4_8422_2325, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
            })
    }
}

impl PriceSource for RandomWalkSource {
    fn bars(&self, instrument: &Instrument) -> Vec<PriceBar> {
        let mut rng = StdRng::seed_from_u64(self.stream_seed(&instrument.symbol));
        let volatility = instrument.volatility;
        let mut price = instrument.base_price;
        let mut bars = Vec::with_capacity(self.days as usize + 1);

        for i in (0..=self.days).rev() {
            let trend = (i as f64 / 10.0).sin() * 0.002;
            let change = (rng.gen::<f64>() - 0.5) * 2.0 * volatility + trend;
            price *= 1.0 + change;

            let open = price * (1.0 + (rng.gen::<f64>() - 0.5) * 0.005);
            let close = price;
            let high = open.max(close) * (1.0 + rng.gen::<f64>() * 0.008);
            let low = open.min(close) * (1.0 - rng.gen::<f64>() * 0.008);
            let volume = 50_000 + (rng.gen::<f64>() * 100_000.0).floor() as u64;

            bars.push(PriceBar {
                timestamp: self.end - Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars
    }
}

// ---------------------------------------------------------------------------
// StaticSource -- fixed fixtures keyed by symbol
// ---------------------------------------------------------------------------

/// Serves pre-built series; unknown symbols yield an empty series.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    series: HashMap<String, Vec<PriceBar>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        self.series.insert(symbol.into(), bars);
        self
    }
}

impl PriceSource for StaticSource {
    fn bars(&self, instrument: &Instrument) -> Vec<PriceBar> {
        self.series
            .get(&instrument.symbol)
            .cloned()
            .unwrap_or_default()
    }
}
