// =============================================================================
// Aurum Desk — technical analysis engine for gold instruments
// =============================================================================
//
// Pure engine:   indicators -> signals + key_levels -> analysis
// Service layer: market_data sources, app_state cache, REST api
// =============================================================================

pub mod analysis;
pub mod api;
pub mod app_state;
pub mod indicators;
pub mod key_levels;
pub mod market_data;
pub mod runtime_config;
pub mod scoring;
pub mod signals;
pub mod types;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod testing;
