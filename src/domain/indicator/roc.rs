//! ROC (Rate of Change).
//!
//! ROC(n)[i] = ((C[i] - C[i-n]) / C[i-n]) * 100, 0 when C[i-n] == 0.
//! Warm-up: first n bars are NaN. Default period: 12.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 12;

pub fn roc(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    let series = channels.close;

    let mut values = vec![f64::NAN; series.len()];
    for i in n..series.len() {
        let prev = series[i - n];
        values[i] = if prev == 0.0 {
            0.0
        } else {
            ((series[i] - prev) / prev) * 100.0
        };
    }

    Ok(IndicatorOutput::Single(values))
}
