//! Band breakout rule.
//!
//! price crosses above the upper band ⇒ BUY, price crosses below the lower
//! band ⇒ SELL, else HOLD. Momentum convention: a breakout is entered in
//! its own direction. Index 0 is always HOLD.

use crate::domain::error::ComputationError;
use crate::domain::registry::{Params, SeriesBindings};
use crate::domain::signal::Signal;

pub fn band_breakout(
    refs: &SeriesBindings,
    _params: &Params,
) -> Result<Vec<Signal>, ComputationError> {
    let price = refs.get("price")?;
    let upper = refs.get("upper")?;
    let lower = refs.get("lower")?;
    let len = price.len().min(upper.len()).min(lower.len());

    let mut signals = vec![Signal::Hold; len];
    for i in 1..len {
        let window = [price[i - 1], price[i], upper[i - 1], upper[i], lower[i - 1], lower[i]];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        if price[i - 1] <= upper[i - 1] && price[i] > upper[i] {
            signals[i] = Signal::Buy;
        } else if price[i - 1] >= lower[i - 1] && price[i] < lower[i] {
            signals[i] = Signal::Sell;
        }
    }
    Ok(signals)
}
