// =============================================================================
// Central Application State — Aurum Desk
// =============================================================================
//
// Ties the configured instruments to their price series and memoises the
// analysis computed from them.  Shared across handlers as `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared collections.
//
// Series lifecycle:
//   base series  -- pulled once from the injected `PriceSource`, then kept
//   live price   -- optional override; the served series is the base series
//                   rescaled so its last close equals the live price
//   analysis     -- cached per symbol, dropped whenever the live price moves
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::analysis::{analyze, build_prediction_request, AnalysisReport, PredictionRequest};
use crate::market_data::{rescale_to_live, PriceSource};
use crate::runtime_config::RuntimeConfig;
use crate::types::{Instrument, PriceBar, Timeframe};

pub struct AppState {
    // ── Version tracking ────────────────────────────────────────────────
    /// Monotonically increasing version counter, bumped whenever a live
    /// price is set or cleared.
    pub state_version: AtomicU64,

    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    // ── Market Data ─────────────────────────────────────────────────────
    source: Box<dyn PriceSource>,
    base_series: RwLock<HashMap<String, Arc<Vec<PriceBar>>>>,
    live_prices: RwLock<HashMap<String, f64>>,

    // ── Derived ─────────────────────────────────────────────────────────
    analysis_cache: RwLock<HashMap<String, Arc<AnalysisReport>>>,

    // ── Timing ──────────────────────────────────────────────────────────
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, source: Box<dyn PriceSource>) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: Arc::new(RwLock::new(config)),
            source,
            base_series: RwLock::new(HashMap::new()),
            live_prices: RwLock::new(HashMap::new()),
            analysis_cache: RwLock::new(HashMap::new()),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    /// Atomically increment the state version; returns the previous value.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Instruments ─────────────────────────────────────────────────────

    pub fn instruments(&self) -> Vec<Instrument> {
        self.runtime_config.read().instruments.clone()
    }

    pub fn instrument(&self, symbol: &str) -> Option<Instrument> {
        self.runtime_config.read().instrument(symbol).cloned()
    }

    // ── Series ──────────────────────────────────────────────────────────

    /// The unscaled series for `symbol`, loaded from the source on first use.
    pub fn base_series(&self, symbol: &str) -> Option<Arc<Vec<PriceBar>>> {
        if let Some(bars) = self.base_series.read().get(symbol) {
            return Some(Arc::clone(bars));
        }

        let instrument = self.instrument(symbol)?;
        let mut series = self.base_series.write();
        let bars = series.entry(instrument.symbol.clone()).or_insert_with(|| {
            let bars = self.source.bars(&instrument);
            info!(symbol = %instrument.symbol, bars = bars.len(), "series loaded");
            Arc::new(bars)
        });
        Some(Arc::clone(bars))
    }

    /// The served series: the base series, rescaled when a live price is set.
    pub fn series(&self, symbol: &str) -> Option<Vec<PriceBar>> {
        self.series_at(symbol, self.live_price(symbol))
    }

    fn series_at(&self, symbol: &str, live_price: Option<f64>) -> Option<Vec<PriceBar>> {
        let base = self.base_series(symbol)?;
        Some(match live_price {
            Some(price) => rescale_to_live(&base, price),
            None => base.as_ref().clone(),
        })
    }

    pub fn live_price(&self, symbol: &str) -> Option<f64> {
        self.live_prices.read().get(symbol).copied()
    }

    /// Override the current price of `symbol`.
    ///
    /// Fails for an unknown instrument or a price that is not a positive
    /// finite number.
    pub fn set_live_price(&self, symbol: &str, price: f64) -> Result<()> {
        if self.instrument(symbol).is_none() {
            bail!("unknown instrument {symbol}");
        }
        if !price.is_finite() || price <= 0.0 {
            bail!("invalid live price {price} for {symbol}");
        }

        // Cache lock is held across the write and the version bump so that
        // `store_analysis` never keeps a report computed on the old price.
        let mut cache = self.analysis_cache.write();
        self.live_prices.write().insert(symbol.to_string(), price);
        cache.remove(symbol);
        self.increment_version();
        drop(cache);

        info!(symbol = %symbol, price, "live price applied");
        Ok(())
    }

    /// Drop the override for `symbol`; returns whether one was set.
    pub fn clear_live_price(&self, symbol: &str) -> bool {
        let mut cache = self.analysis_cache.write();
        let removed = self.live_prices.write().remove(symbol).is_some();
        if removed {
            cache.remove(symbol);
            self.increment_version();
        }
        drop(cache);

        if removed {
            info!(symbol = %symbol, "live price cleared");
        }
        removed
    }

    // ── Analysis ────────────────────────────────────────────────────────

    /// Analysis for `symbol`, served from cache when the inputs are unchanged.
    ///
    /// `None` for an unknown instrument or an empty series.
    pub fn analysis(&self, symbol: &str) -> Option<Arc<AnalysisReport>> {
        if let Some(report) = self.analysis_cache.read().get(symbol) {
            return Some(Arc::clone(report));
        }

        debug!(symbol = %symbol, "analysis cache miss");
        let version = self.current_state_version();
        let live_price = self.live_price(symbol);
        let bars = self.series_at(symbol, live_price)?;
        let (chart_window, recent_window) = {
            let cfg = self.runtime_config.read();
            (cfg.chart_window, cfg.recent_window)
        };

        let report = Arc::new(analyze(
            symbol,
            &bars,
            live_price.is_some(),
            chart_window,
            recent_window,
        )?);
        self.store_analysis(symbol, version, &report);
        Some(report)
    }

    /// Cache `report` unless the state moved past `version` while it was
    /// being computed; returns whether it was stored.
    fn store_analysis(&self, symbol: &str, version: u64, report: &Arc<AnalysisReport>) -> bool {
        let mut cache = self.analysis_cache.write();
        if self.current_state_version() != version {
            debug!(symbol = %symbol, version, "discarding analysis computed on stale state");
            return false;
        }
        cache.insert(symbol.to_string(), Arc::clone(report));
        true
    }

    pub fn prediction_request(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Option<PredictionRequest> {
        let bars = self.series(symbol)?;
        let cfg = self.runtime_config.read();
        build_prediction_request(symbol, timeframe, &bars, &cfg.fundamentals, cfg.recent_window)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::StaticSource;
    use crate::testing::bars_from_closes;

    fn state() -> AppState {
        let closes: Vec<f64> = (0..60).map(|i| 2600.0 + i as f64).collect();
        let source = StaticSource::new().with_series("XAU/USD", bars_from_closes(&closes));
        AppState::new(RuntimeConfig::default(), Box::new(source))
    }

    #[test]
    fn series_for_known_and_unknown_symbols() {
        let s = state();
        assert_eq!(s.series("XAU/USD").unwrap().len(), 60);
        // Configured but without fixtures: empty series.
        assert!(s.series("ANTAM").unwrap().is_empty());
        assert!(s.series("BTCUSDT").is_none());
    }

    #[test]
    fn live_price_rescales_series_and_bumps_version() {
        let s = state();
        let v0 = s.current_state_version();

        s.set_live_price("XAU/USD", 3000.0).unwrap();
        let bars = s.series("XAU/USD").unwrap();
        assert!((bars.last().unwrap().close - 3000.0).abs() < 1e-9);
        assert_eq!(s.current_state_version(), v0 + 1);

        // Base series stays untouched.
        assert_eq!(s.base_series("XAU/USD").unwrap().last().unwrap().close, 2659.0);

        assert!(s.clear_live_price("XAU/USD"));
        assert!(!s.clear_live_price("XAU/USD"));
        assert_eq!(s.series("XAU/USD").unwrap().last().unwrap().close, 2659.0);
        assert_eq!(s.current_state_version(), v0 + 2);
    }

    #[test]
    fn invalid_live_prices_are_rejected() {
        let s = state();
        assert!(s.set_live_price("BTCUSDT", 100.0).is_err());
        assert!(s.set_live_price("XAU/USD", 0.0).is_err());
        assert!(s.set_live_price("XAU/USD", f64::INFINITY).is_err());
        assert!(s.live_price("XAU/USD").is_none());
    }

    #[test]
    fn analysis_is_cached_until_live_price_changes() {
        let s = state();
        let a = s.analysis("XAU/USD").unwrap();
        let b = s.analysis("XAU/USD").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.quote.live);

        s.set_live_price("XAU/USD", 2800.0).unwrap();
        let c = s.analysis("XAU/USD").unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert!(c.quote.live);
        assert!((c.quote.price - 2800.0).abs() < 1e-9);
    }

    #[test]
    fn stale_analysis_is_not_cached() {
        let s = state();
        let version = s.current_state_version();
        let bars = s.series("XAU/USD").unwrap();
        let stale = Arc::new(analyze("XAU/USD", &bars, false, 60, 30).unwrap());

        s.set_live_price("XAU/USD", 3000.0).unwrap();
        assert!(!s.store_analysis("XAU/USD", version, &stale));

        let fresh = s.analysis("XAU/USD").unwrap();
        assert!(fresh.quote.live);
        assert!((fresh.quote.price - 3000.0).abs() < 1e-9);
        assert!(s.store_analysis("XAU/USD", s.current_state_version(), &fresh));
    }

    #[test]
    fn concurrent_live_price_write_invalidates_analysis() {
        let closes: Vec<f64> = (0..400).map(|i| 2600.0 + (i % 13) as f64).collect();
        let bars = bars_from_closes(&closes);

        for delay_us in 0..40u64 {
            let source = StaticSource::new().with_series("XAU/USD", bars.clone());
            let s = AppState::new(RuntimeConfig::default(), Box::new(source));
            // Warm the base series so only the analysis races the write.
            s.base_series("XAU/USD").unwrap();

            std::thread::scope(|scope| {
                scope.spawn(|| s.analysis("XAU/USD"));
                std::thread::sleep(std::time::Duration::from_micros(delay_us * 25));
                s.set_live_price("XAU/USD", 3000.0).unwrap();
            });

            let report = s.analysis("XAU/USD").unwrap();
            assert!(report.quote.live, "delay {delay_us}");
            assert!((report.quote.price - 3000.0).abs() < 1e-9, "delay {delay_us}");
        }
    }

    #[test]
    fn analysis_absent_for_empty_series() {
        let s = state();
        assert!(s.analysis("ANTAM").is_none());
        assert!(s.analysis("BTCUSDT").is_none());
    }

    #[test]
    fn prediction_request_uses_config() {
        let s = state();
        let req = s.prediction_request("XAU/USD", Timeframe::ThreeMonths).unwrap();
        assert_eq!(req.recent_prices.len(), 30);
        assert_eq!(req.timeframe, Timeframe::ThreeMonths);
        assert!((req.fundamental_data.usd_index - 103.45).abs() < f64::EPSILON);
    }
}
