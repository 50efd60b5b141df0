//! Two-series crossing rule.
//!
//! fast crosses above slow ⇒ BUY, fast crosses below slow ⇒ SELL, else HOLD.
//! A crossing needs the previous bar, so index 0 is always HOLD.

use crate::domain::error::ComputationError;
use crate::domain::registry::{Params, SeriesBindings};
use crate::domain::signal::Signal;

pub fn cross_over(
    refs: &SeriesBindings,
    _params: &Params,
) -> Result<Vec<Signal>, ComputationError> {
    let fast = refs.get("fast")?;
    let slow = refs.get("slow")?;
    let len = fast.len().min(slow.len());

    let mut signals = vec![Signal::Hold; len];
    for i in 1..len {
        let window = [fast[i - 1], slow[i - 1], fast[i], slow[i]];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        if fast[i - 1] <= slow[i - 1] && fast[i] > slow[i] {
            signals[i] = Signal::Buy;
        } else if fast[i - 1] >= slow[i - 1] && fast[i] < slow[i] {
            signals[i] = Signal::Sell;
        }
    }
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal_rules::test_util::{bindings, params};

    #[test]
    fn cross_above_is_buy() {
        let fast = [1.0, 3.0];
        let slow = [2.0, 2.0];
        let out = cross_over(&bindings(&[("fast", &fast), ("slow", &slow)]), &params(&[])).unwrap();
        assert_eq!(out, vec![Signal::Hold, Signal::Buy]);
    }

    #[test]
    fn cross_below_is_sell() {
        let fast = [3.0, 1.0];
        let slow = [2.0, 2.0];
        let out = cross_over(&bindings(&[("fast", &fast), ("slow", &slow)]), &params(&[])).unwrap();
        assert_eq!(out, vec![Signal::Hold, Signal::Sell]);
    }

    #[test]
    fn staying_above_is_hold() {
        let fast = [3.0, 4.0, 5.0];
        let slow = [2.0, 2.0, 2.0];
        let out = cross_over(&bindings(&[("fast", &fast), ("slow", &slow)]), &params(&[])).unwrap();
        assert_eq!(out, vec![Signal::Hold; 3]);
    }

    #[test]
    fn touch_then_break_is_buy() {
        // equality on the previous bar still counts as "from below"
        let fast = [2.0, 3.0];
        let slow = [2.0, 2.0];
        let out = cross_over(&bindings(&[("fast", &fast), ("slow", &slow)]), &params(&[])).unwrap();
        assert_eq!(out, vec![Signal::Hold, Signal::Buy]);
    }

    #[test]
    fn nan_inputs_hold() {
        let fast = [f64::NAN, 3.0, 4.0];
        let slow = [2.0, 2.0, f64::NAN];
        let out = cross_over(&bindings(&[("fast", &fast), ("slow", &slow)]), &params(&[])).unwrap();
        assert_eq!(out, vec![Signal::Hold; 3]);
    }

    #[test]
    fn aligns_to_shortest_input() {
        let fast = [1.0, 3.0, 4.0, 5.0];
        let slow = [2.0, 2.0];
        let out = cross_over(&bindings(&[("fast", &fast), ("slow", &slow)]), &params(&[])).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn missing_reference_fails() {
        let fast = [1.0, 3.0];
        let err = cross_over(&bindings(&[("fast", &fast)]), &params(&[])).unwrap_err();
        assert!(matches!(
            err,
            ComputationError::MissingReference { name } if name == "slow"
        ));
    }
}
