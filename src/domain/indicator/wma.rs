//! Weighted Moving Average.
//!
//! O(n) sliding window. WMA(n) = (1*C[i-n+1] + ... + n*C[i]) / (n*(n+1)/2).
//! Warm-up: first (n-1) bars are NaN. Default period: 20.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 20;

pub fn wma(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    let series = channels.close;

    let mut values = vec![f64::NAN; series.len()];
    // computed in floating point: n * (n + 1) can exceed usize
    let divisor = n as f64 * (n as f64 + 1.0) / 2.0;
    let mut weighted_sum: f64 = 0.0;
    let mut window_sum: f64 = 0.0;

    for (i, &close) in series.iter().enumerate() {
        if i < n {
            let weight = (i + 1) as f64;
            weighted_sum += weight * close;
            window_sum += close;
        } else {
            weighted_sum += n as f64 * close - window_sum;
            window_sum += close - series[i - n];
        }
        if i + 1 >= n {
            values[i] = weighted_sum / divisor;
        }
    }

    Ok(IndicatorOutput::Single(values))
}
