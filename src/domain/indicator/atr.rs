//! ATR (Average True Range).
//!
//! TR[0] = high[0] - low[0]; TR[i] = max(H-L, |H-prev_close|, |L-prev_close|).
//! First ATR is the simple mean of the first n true ranges, then Wilder's
//! smoothing: ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n.
//! Warm-up: first (n-1) bars are NaN. Default period: 14.

use crate::domain::error::ComputationError;
use crate::domain::indicator::period;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub const DEFAULT_PERIOD: usize = 14;

pub fn atr(channels: &Channels, params: &Params) -> Result<IndicatorOutput, ComputationError> {
    let n = period(params, "period", DEFAULT_PERIOD)?;
    let len = channels.len();

    let mut values = vec![f64::NAN; len];
    let mut atr = 0.0;

    for i in 0..len {
        let tr = if i == 0 {
            channels.high[0] - channels.low[0]
        } else {
            let prev_close = channels.close[i - 1];
            let hl = channels.high[i] - channels.low[i];
            let hc = (channels.high[i] - prev_close).abs();
            let lc = (channels.low[i] - prev_close).abs();
            hl.max(hc).max(lc)
        };

        if i < n - 1 {
            atr += tr;
        } else if i == n - 1 {
            atr = (atr + tr) / n as f64;
            values[i] = atr;
        } else {
            atr = (atr * (n - 1) as f64 + tr) / n as f64;
            values[i] = atr;
        }
    }

    Ok(IndicatorOutput::Single(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_util::params;
    use crate::domain::registry::Channels;
    use approx::assert_relative_eq;

    fn atr_series(high: &[f64], low: &[f64], close: &[f64], n: f64) -> Vec<f64> {
        let volume = vec![1000.0; close.len()];
        let channels = Channels {
            open: close,
            high,
            low,
            close,
            volume: &volume,
        };
        match atr(&channels, &params(&[("period", n)])).unwrap() {
            IndicatorOutput::Single(values) => values,
            other => panic!("expected single series, got {:?}", other),
        }
    }

    #[test]
    fn atr_seed_is_mean_of_true_ranges() {
        // TRs: 2, 2, 2 (flat ranges, no gaps)
        let values = atr_series(
            &[11.0, 11.0, 11.0],
            &[9.0, 9.0, 9.0],
            &[10.0, 10.0, 10.0],
            3.0,
        );
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_relative_eq!(values[2], 2.0);
    }

    #[test]
    fn atr_gap_uses_prev_close() {
        // bar 1 gaps up: TR = |high - prev_close| = 20 - 10 = 10
        let values = atr_series(&[11.0, 20.0], &[9.0, 19.0], &[10.0, 19.5], 2.0);
        assert_relative_eq!(values[1], (2.0 + 10.0) / 2.0);
    }

    #[test]
    fn atr_wilder_smoothing() {
        // TRs: 2, 2, 2, 4
        let values = atr_series(
            &[11.0, 11.0, 11.0, 12.0],
            &[9.0, 9.0, 9.0, 8.0],
            &[10.0, 10.0, 10.0, 10.0],
            3.0,
        );
        let seed = 2.0;
        assert_relative_eq!(values[3], (seed * 2.0 + 4.0) / 3.0);
    }
}
