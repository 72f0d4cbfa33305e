use crate::types::PriceBar;

/// Rescale a whole series by `live_price / last_close` so that its final close
/// equals the live quote while the shape of the history is preserved.
///
/// Returns the series unchanged when it is empty, when the last close is zero,
/// or when `live_price` is not a positive finite number.
pub fn rescale_to_live(bars: &[PriceBar], live_price: f64) -> Vec<PriceBar> {
    let last_close = match bars.last() {
        Some(b) if b.close != 0.0 => b.close,
        _ => return bars.to_vec(),
    };
    if !live_price.is_finite() || live_price <= 0.0 {
        return bars.to_vec();
    }

    let ratio = live_price / last_close;
    bars.iter()
        .map(|b| PriceBar {
            open: b.open * ratio,
            high: b.high * ratio,
            low: b.low * ratio,
            close: b.close * ratio,
            ..*b
        })
        .collect()
}
