//! OBV (On-Balance Volume).
//!
//! OBV[0] = V[0]; then OBV[i] = OBV[i-1] + V[i] if close rose,
//! OBV[i-1] - V[i] if it fell, unchanged if flat.
//! No warm-up and no parameters.

use crate::domain::error::ComputationError;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub fn obv(channels: &Channels, _params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let mut values = Vec::with_capacity(channels.len());
    let mut obv: f64 = 0.0;
    let mut prev_close: f64 = 0.0;

    for i in 0..channels.len() {
        let close = channels.close[i];
        let volume = channels.volume[i];
        if i == 0 {
            obv = volume;
        } else if close > prev_close {
            obv += volume;
        } else if close < prev_close {
            obv -= volume;
        }
        prev_close = close;
        values.push(obv);
    }

    Ok(IndicatorOutput::Single(values))
}
