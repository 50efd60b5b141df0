//! Zero-line crossing rule, for centered oscillators such as a MACD
//! histogram or ROC.
//!
//! series crosses above 0 ⇒ BUY, crosses below 0 ⇒ SELL, else HOLD.
//! Index 0 is always HOLD.

use crate::domain::error::ComputationError;
use crate::domain::registry::{Params, SeriesBindings};
use crate::domain::signal::Signal;

pub fn zero_cross(
    refs: &SeriesBindings,
    _params: &Params,
) -> Result<Vec<Signal>, ComputationError> {
    let series = refs.get("series")?;

    let mut signals = vec![Signal::Hold; series.len()];
    for i in 1..series.len() {
        let (prev, cur) = (series[i - 1], series[i]);
        if prev.is_nan() || cur.is_nan() {
            continue;
        }
        if prev <= 0.0 && cur > 0.0 {
            signals[i] = Signal::Buy;
        } else if prev >= 0.0 && cur < 0.0 {
            signals[i] = Signal::Sell;
        }
    }
    Ok(signals)
}
