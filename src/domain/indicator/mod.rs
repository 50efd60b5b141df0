//! Builtin indicator functions.
//!
//! Every indicator has the uniform signature `fn(&Channels, &Params) ->
//! Result<IndicatorOutput, ComputationError>`. Outputs are aligned 1:1 with
//! the bar window; bars inside the warm-up prefix carry `f64::NAN`.
//! Parameter problems (zero or fractional periods, non-finite values) fail
//! the computation rather than silently truncating.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod price;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod wma;

pub use atr::atr;
pub use bollinger::bollinger;
pub use ema::ema;
pub use macd::macd;
pub use obv::obv;
pub use price::price;
pub use roc::roc;
pub use rsi::rsi;
pub use sma::sma;
pub use stddev::stddev;
pub use wma::wma;

use crate::domain::error::ComputationError;
use crate::domain::registry::Params;

/// Numeric parameter with a default.
pub(crate) fn param(params: &Params, name: &str, default: f64) -> f64 {
    params.get(name).copied().unwrap_or(default)
}

/// Window-length parameter: must be a positive whole number.
pub(crate) fn period(
    params: &Params,
    name: &str,
    default: usize,
) -> Result<usize, ComputationError> {
    let value = match params.get(name) {
        Some(v) => *v,
        None => return Ok(default),
    };
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
        return Err(ComputationError::Failed {
            reason: format!("parameter '{}' must be a positive integer, got {}", name, value),
        });
    }
    Ok(value as usize)
}
