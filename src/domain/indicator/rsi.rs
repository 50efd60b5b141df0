//! RSI (Relative Strength Index).
//!
//! Wilder's smoothing for average gain/loss:
//! - first average: simple mean over the first n changes
//! - then: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); 100 when avg_loss == 0.
//! Warm-up: first n bars are NaN (n price changes are needed).
//! Default period: 14.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 14;

pub fn rsi(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    let series = channels.close;

    let mut values = vec![f64::NAN; series.len()];
    if series.len() < 2 {
        return Ok(IndicatorOutput::Single(values));
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..series.len() {
        let change = series[i] - series[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        let change_idx = i - 1;

        if change_idx < n - 1 {
            avg_gain += gain;
            avg_loss += loss;
        } else if change_idx == n - 1 {
            avg_gain = (avg_gain + gain) / n as f64;
            avg_loss = (avg_loss + loss) / n as f64;
            values[i] = rsi_from_averages(avg_gain, avg_loss);
        } else {
            avg_gain = (avg_gain * (n - 1) as f64 + gain) / n as f64;
            avg_loss = (avg_loss * (n - 1) as f64 + loss) / n as f64;
            values[i] = rsi_from_averages(avg_gain, avg_loss);
        }
    }

    Ok(IndicatorOutput::Single(values))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
