//! Simple Moving Average.
//!
//! SMA[i] = mean(C[i-n+1..=i]). Warm-up: first (n-1) bars are NaN.
//! Default period: 20.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 20;

pub fn sma(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    Ok(IndicatorOutput::Single(sma_values(channels.close, n)))
}

/// Rolling mean over `series`, NaN for the warm-up prefix.
pub(crate) fn sma_values(series: &[f64], n: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; series.len()];
    let mut sum = 0.0;
    for i in 0..series.len() {
        sum += series[i];
        if i >= n {
            sum -= series[i - n];
        }
        if i + 1 >= n {
            values[i] = sum / n as f64;
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_util::{params, OwnedChannels};
    use approx::assert_relative_eq;

    #[test]
    fn sma_warmup_is_nan() {
        let owned = OwnedChannels::from_closes(&[10.0, 20.0, 30.0, 40.0]);
        let out = sma(&owned.channels(), &params(&[("period", 3.0)])).unwrap();
        let IndicatorOutput::Single(values) = out else {
            panic!("expected single series");
        };
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_relative_eq!(values[2], 20.0);
        assert_relative_eq!(values[3], 30.0);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let out = sma_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn sma_rejects_zero_period() {
        let owned = OwnedChannels::from_closes(&[10.0, 20.0]);
        assert!(sma(&owned.channels(), &params(&[("period", 0.0)])).is_err());
    }

    #[test]
    fn sma_window_shorter_than_period() {
        let out = sma_values(&[10.0, 20.0], 5);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
