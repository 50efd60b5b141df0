//! Rolling population standard deviation.
//!
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - mean)^2 for j in 0..n) / n)
//! Population form (divides by N, not N-1).
//! Warm-up: first (n-1) bars are NaN. Default period: 20.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 20;

pub fn stddev(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    Ok(IndicatorOutput::Single(stddev_values(channels.close, n)))
}

/// Rolling population stddev over `series`, NaN for the warm-up prefix.
pub(crate) fn stddev_values(series: &[f64], n: usize) -> Vec<f64> {
    let mut values = vec![f64::NAN; series.len()];
    for i in (n - 1)..series.len() {
        let window = &series[i + 1 - n..=i];
        let mean = window.iter().sum::<f64>() / n as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / n as f64;
        values[i] = variance.sqrt();
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stddev_flat_series_is_zero() {
        let values = stddev_values(&[100.0, 100.0, 100.0, 100.0], 3);
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_relative_eq!(values[2], 0.0);
        assert_relative_eq!(values[3], 0.0);
    }

    #[test]
    fn stddev_known_window() {
        // window [2, 4, 6]: mean 4, variance (4+0+4)/3, stddev sqrt(8/3)
        let values = stddev_values(&[2.0, 4.0, 6.0], 3);
        assert_relative_eq!(values[2], (8.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn stddev_is_population_form() {
        // [1, 3]: population stddev = 1.0 (sample form would be sqrt(2))
        let values = stddev_values(&[1.0, 3.0], 2);
        assert_relative_eq!(values[1], 1.0);
    }

    #[test]
    fn stddev_period_1_is_zero() {
        let values = stddev_values(&[5.0, 7.0], 1);
        assert_relative_eq!(values[0], 0.0);
        assert_relative_eq!(values[1], 0.0);
    }
}
