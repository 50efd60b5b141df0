//! MACD (Moving Average Convergence Divergence).
//!
//! macd_line = EMA(fast) - EMA(slow)
//! signal_line = EMA(signal) of macd_line, seeded with its first SMA once
//! the macd_line itself is warm
//! histogram = macd_line - signal_line
//!
//! Defaults: fast=12, slow=26, signal=9.
//! Warm-up: slow - 1 + signal - 1 bars are NaN on signal_line/histogram;
//! macd_line is warm after slow - 1 bars.

use crate::domain::error::ComputationError;
use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn macd(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let fast = period(params, "fast", DEFAULT_FAST)?;
    let slow = period(params, "slow", DEFAULT_SLOW)?;
    let signal = period(params, "signal", DEFAULT_SIGNAL)?;
    if fast >= slow {
        return Err(ComputationError::Failed {
            reason: format!("fast period {} must be less than slow period {}", fast, slow),
        });
    }

    let len = channels.len();
    let ema_fast = ema_values(channels.close, fast);
    let ema_slow = ema_values(channels.close, slow);

    let mut macd_line = vec![f64::NAN; len];
    for i in 0..len {
        macd_line[i] = ema_fast[i] - ema_slow[i];
    }

    let macd_warmup = slow - 1;
    let k = 2.0 / (signal as f64 + 1.0);
    let mut signal_line = vec![f64::NAN; len];

    if macd_warmup + signal <= len {
        let seed_end = macd_warmup + signal;
        let seed: f64 = macd_line[macd_warmup..seed_end].iter().sum::<f64>() / signal as f64;
        let mut signal_ema = seed;
        signal_line[seed_end - 1] = signal_ema;

        for i in seed_end..len {
            signal_ema = macd_line[i] * k + signal_ema * (1.0 - k);
            signal_line[i] = signal_ema;
        }
    }

    let mut histogram = vec![f64::NAN; len];
    for i in 0..len {
        histogram[i] = macd_line[i] - signal_line[i];
    }

    Ok(IndicatorOutput::Named(vec![
        ("macd_line".to_string(), macd_line),
        ("signal_line".to_string(), signal_line),
        ("histogram".to_string(), histogram),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_util::{params, OwnedChannels};
    use approx::assert_relative_eq;

    fn macd_components(
        closes: &[f64],
        fast: f64,
        slow: f64,
        signal: f64,
    ) -> Vec<(String, Vec<f64>)> {
        let owned = OwnedChannels::from_closes(closes);
        let p = params(&[("fast", fast), ("slow", slow), ("signal", signal)]);
        match macd(&owned.channels(), &p).unwrap() {
            IndicatorOutput::Named(components) => components,
            other => panic!("expected named components, got {:?}", other),
        }
    }

    #[test]
    fn macd_component_order_is_declared_order() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let components = macd_components(&closes, 3.0, 5.0, 2.0);
        let names: Vec<&str> = components.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["macd_line", "signal_line", "histogram"]);
    }

    #[test]
    fn macd_line_is_fast_ema_minus_slow_ema() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let components = macd_components(&closes, 3.0, 5.0, 2.0);
        let line = &components[0].1;

        let ema_fast = ema_values(&closes, 3);
        let ema_slow = ema_values(&closes, 5);
        for i in 4..closes.len() {
            assert_relative_eq!(line[i], ema_fast[i] - ema_slow[i]);
        }
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64).sin()).collect();
        let components = macd_components(&closes, 12.0, 26.0, 9.0);
        let line = &components[0].1;
        let signal = &components[1].1;
        let histogram = &components[2].1;

        let warmup = 26 - 1 + 9 - 1;
        for i in warmup..closes.len() {
            assert_relative_eq!(histogram[i], line[i] - signal[i]);
        }
    }

    #[test]
    fn macd_warmup_prefix_is_nan() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let components = macd_components(&closes, 12.0, 26.0, 9.0);
        let signal = &components[1].1;

        let warmup = 26 - 1 + 9 - 1;
        for v in &signal[..warmup] {
            assert!(v.is_nan());
        }
        assert!(!signal[warmup].is_nan());
    }

    #[test]
    fn macd_rejects_fast_not_less_than_slow() {
        let owned = OwnedChannels::from_closes(&[100.0; 40]);
        let p = params(&[("fast", 26.0), ("slow", 12.0)]);
        assert!(macd(&owned.channels(), &p).is_err());
    }
}
