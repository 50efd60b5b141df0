//! Bollinger Bands.
//!
//! middle_band = SMA(period); upper/lower = middle ± multiplier * stddev,
//! where stddev is the rolling population form.
//! Defaults: period=20, multiplier=2.0.
//! Warm-up: first (period-1) bars are NaN on all three bands.

use crate::domain::error::ComputationError;
use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::stddev::stddev_values;
use crate::domain::indicator::{param, period};
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

pub fn bollinger(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    let mult = param(params, "multiplier", DEFAULT_MULTIPLIER);
    if !mult.is_finite() || mult < 0.0 {
        return Err(ComputationError::Failed {
            reason: format!("parameter 'multiplier' must be non-negative, got {}", mult),
        });
    }

    let middle = sma_values(channels.close, n);
    let deviation = stddev_values(channels.close, n);

    let mut upper = vec![f64::NAN; channels.len()];
    let mut lower = vec![f64::NAN; channels.len()];
    for i in 0..channels.len() {
        upper[i] = middle[i] + mult * deviation[i];
        lower[i] = middle[i] - mult * deviation[i];
    }

    Ok(IndicatorOutput::Named(vec![
        ("upper_band".to_string(), upper),
        ("middle_band".to_string(), middle),
        ("lower_band".to_string(), lower),
    ]))
}
