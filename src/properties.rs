// Property tests for invariants that hold across every series.

use proptest::prelude::*;

use crate::indicators::{
    calculate_all_indicators, calculate_bollinger, calculate_macd, calculate_rsi, calculate_sma,
    closes,
};
use crate::key_levels::calculate_key_levels;
use crate::market_data::rescale_to_live;
use crate::scoring::{normalize_inverse, normalize_min_max};
use crate::signals::{generate_signal, signal_for_score};
use crate::testing::bars_from_closes;

fn prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0f64..5000.0, 0..max_len)
}

proptest! {
    #[test]
    fn sma_short_series_is_last_price(p in prices(20), extra in 1usize..10) {
        let period = p.len() + extra;
        let expected = p.last().copied().unwrap_or(0.0);
        prop_assert_eq!(calculate_sma(&p, period), expected);
    }

    #[test]
    fn macd_histogram_is_exact_difference(p in prices(80)) {
        let m = calculate_macd(&p);
        prop_assert_eq!(m.histogram, m.macd_line - m.signal_line);
    }

    #[test]
    fn bollinger_bands_are_ordered(p in prices(60), period in 1usize..30) {
        let b = calculate_bollinger(&p, period, 2.0);
        prop_assert!(b.upper >= b.middle);
        prop_assert!(b.middle >= b.lower);
    }

    #[test]
    fn rsi_stays_in_range(p in prices(60)) {
        let rsi = calculate_rsi(&p, 14);
        prop_assert!((0.0..=100.0).contains(&rsi));
    }

    #[test]
    fn signal_matches_its_score(p in prices(120)) {
        let bars = bars_from_closes(&p);
        let bundle = calculate_all_indicators(&bars);
        let price = p.last().copied().unwrap_or(0.0);
        let result = generate_signal(&bundle, price);
        prop_assert!(result.score <= 100);
        prop_assert_eq!(result.signal, signal_for_score(result.score));
        prop_assert!(!result.reasons.is_empty());
    }

    #[test]
    fn indicators_are_deterministic(p in prices(120)) {
        let bars = bars_from_closes(&p);
        prop_assert_eq!(calculate_all_indicators(&bars), calculate_all_indicators(&bars));
        prop_assert_eq!(closes(&bars), p);
    }

    #[test]
    fn key_levels_sit_on_the_correct_side(p in prices(120)) {
        let bars = bars_from_closes(&p);
        let levels = calculate_key_levels(&bars);
        let current = p.last().copied().unwrap_or(2000.0);

        prop_assert!((2..=3).contains(&levels.support.len()));
        prop_assert!((2..=3).contains(&levels.resistance.len()));
        prop_assert!(levels.support.iter().all(|&s| s < current));
        prop_assert!(levels.resistance.iter().all(|&r| r > current));
    }

    #[test]
    fn rescaled_series_ends_at_live_price(p in prices(50), live in 1.0f64..100_000.0) {
        let bars = bars_from_closes(&p);
        let scaled = rescale_to_live(&bars, live);
        prop_assert_eq!(scaled.len(), bars.len());
        if let Some(last) = scaled.last() {
            prop_assert!((last.close - live).abs() <= live * 1e-12);
        }
    }

    #[test]
    fn normalisation_is_bounded(v in -1e6f64..1e6, lo in -1e3f64..1e3, width in 0.0f64..1e3) {
        let hi = lo + width;
        let n = normalize_min_max(v, lo, hi);
        prop_assert!((0.0..=1.0).contains(&n));
        prop_assert!((0.0..=1.0).contains(&normalize_inverse(v, lo, hi)));
    }
}
