// =============================================================================
// Signals Module
// =============================================================================
//
// Turns an indicator bundle plus the current price into a discrete trading
// signal, a 0..=100 score and the ordered list of reasons behind it.

pub mod generator;

pub use generator::{generate_signal, signal_for_score, SignalResult};
