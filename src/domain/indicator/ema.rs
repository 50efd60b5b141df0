//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warm-up: first (n-1) bars are NaN. Default period: 20.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 20;

pub fn ema(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    Ok(IndicatorOutput::Single(ema_values(channels.close, n)))
}

/// Recursive EMA over `series`, NaN for the warm-up prefix.
pub(crate) fn ema_values(series: &[f64], n: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; series.len()];
    let k = 2.0 / (n as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (i, &value) in series.iter().enumerate() {
        if i < n - 1 {
            sum += value;
        } else if i == n - 1 {
            sum += value;
            ema = sum / n as f64;
            values[i] = ema;
        } else {
            ema = value * k + ema * (1.0 - k);
            values[i] = ema;
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
    fn ema_seed_is_sma() {
        let values = ema_values(&[10.0, 20.0, 30.0], 3);
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_relative_eq!(values[2], 20.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let values = ema_values(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        let k = 2.0 / 4.0;
        let seed = 20.0;
        let ema_3 = 40.0 * k + seed * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);
        assert_relative_eq!(values[3], ema_3);
        assert_relative_eq!(values[4], ema_4);
    }

    #[test]
    fn ema_equal_prices_stay_flat() {
        let values = ema_values(&[100.0; 6], 3);
        for v in &values[2..] {
            assert_relative_eq!(*v, 100.0);
        }
    }

    #[test]
    fn ema_period_1_is_identity() {
        let values = ema_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_default_period() {
        let owned = OwnedChannels::from_closes(&[100.0; 25]);
        let out = ema(&owned.channels(), &Params::new()).unwrap();
        let IndicatorOutput::Single(values) = out else {
            panic!("expected single series");
        };
        assert!(values[18].is_nan());
        assert_relative_eq!(values[19], 100.0);
    }

    #[test]
    fn ema_rejects_fractional_period() {
        let owned = OwnedChannels::from_closes(&[10.0, 20.0]);
        assert!(ema(&owned.channels(), &params(&[("period", 2.5)])).is_err());
    }
}
