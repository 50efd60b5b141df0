//! Level rule for oscillators.
//!
//! series > upper ⇒ SELL (overbought), series < lower ⇒ BUY (oversold),
//! else HOLD. Defaults upper=70, lower=30 (RSI convention).

use crate::domain::error::ComputationError;
use crate::domain::indicator::param;
use crate::domain::registry::{Params, SeriesBindings};
use crate::domain::signal::Signal;

pub const DEFAULT_UPPER: f64 = 70.0;
pub const DEFAULT_LOWER: f64 = 30.0;

pub fn threshold(refs: &SeriesBindings, params: &Params) -> Result<Vec<Signal>, ComputationError> {
    let series = refs.get("series")?;
    let upper = param(params, "upper", DEFAULT_UPPER);
    let lower = param(params, "lower", DEFAULT_LOWER);
    if upper < lower {
        return Err(ComputationError::Failed {
            reason: format!("upper bound {} is below lower bound {}", upper, lower),
        });
    }

    let signals = series
        .iter()
        .map(|&v| {
            if v.is_nan() {
                Signal::Hold
            } else if v > upper {
                Signal::Sell
            } else if v < lower {
                Signal::Buy
            } else {
                Signal::Hold
            }
        })
        .collect();
    Ok(signals)
}
