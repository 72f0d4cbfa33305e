// =============================================================================
// Runtime Configuration — desk settings with atomic save
// =============================================================================
//
// Everything the service needs to boot: bind address, the instrument list the
// synthetic source generates, history length, RNG seed, response windows and
// the macro backdrop attached to prediction requests.
//
// Persistence uses an atomic tmp + rename pattern.  All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::FundamentalIndicators;
use crate::types::Instrument;

pub const ENV_BIND_ADDR: &str = "DESK_BIND_ADDR";
pub const ENV_INSTRUMENTS: &str = "DESK_INSTRUMENTS";
pub const ENV_SEED: &str = "DESK_SEED";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_instruments() -> Vec<Instrument> {
    vec![
        Instrument::new("XAU/USD", "Spot Gold", 2650.0, 0.012),
        Instrument::new("GOLD_FUTURES", "Gold Futures", 2670.0, 0.013),
        Instrument::new("ANTAM", "Antam Gold (IDR/g)", 1_350_000.0, 0.008),
    ]
}

fn default_history_days() -> u32 {
    90
}

fn default_seed() -> u64 {
    2650
}

fn default_recent_window() -> usize {
    30
}

fn default_chart_window() -> usize {
    60
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the desk service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Socket address the REST API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Instruments served by the desk, in display order.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,

    /// Days of synthetic history per instrument (series has `days + 1` bars).
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of trailing closes returned as `recentPrices`.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,

    /// Number of trailing bars returned as chart points.
    #[serde(default = "default_chart_window")]
    pub chart_window: usize,

    #[serde(default)]
    pub fundamentals: FundamentalIndicators,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            instruments: default_instruments(),
            history_days: default_history_days(),
            seed: default_seed(),
            recent_window: default_recent_window(),
            chart_window: default_chart_window(),
            fundamentals: FundamentalIndicators::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            instruments = config.instruments.len(),
            bind_addr = %config.bind_addr,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply `DESK_*` overrides read through `lookup` (normally
    /// `std::env::var(..).ok()`).
    ///
    /// `DESK_INSTRUMENTS` is a comma-separated symbol list that narrows the
    /// configured instruments; unknown symbols are skipped with a warning.
    /// An unparsable `DESK_SEED` is ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            info!(bind_addr = %addr, "bind address overridden from environment");
            self.bind_addr = addr;
        }

        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = seed,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid {}", ENV_SEED),
            }
        }

        if let Some(raw) = lookup(ENV_INSTRUMENTS) {
            let wanted: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();

            for symbol in &wanted {
                if !self.instruments.iter().any(|i| i.symbol == *symbol) {
                    warn!(symbol = %symbol, "unknown instrument in {}", ENV_INSTRUMENTS);
                }
            }

            self.instruments
                .retain(|i| wanted.contains(&i.symbol.as_str()));
        }
    }

    /// Look up a configured instrument by symbol.
    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.symbol == symbol)
    }
}
