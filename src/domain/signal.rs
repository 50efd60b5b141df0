//! Trade signals and the per-cycle decision produced by the evaluator.

use std::collections::BTreeMap;
use std::fmt;

/// A categorical trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Numeric encoding used by the weighted combination policy.
    pub fn score(self) -> f64 {
        match self {
            Signal::Buy => 1.0,
            Signal::Sell => -1.0,
            Signal::Hold => 0.0,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Which evaluation stage a recorded failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Indicator,
    SignalRule,
}

/// A recoverable failure absorbed during one evaluation cycle.
///
/// Recorded on the [`Decision`] for observability; never aborts the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationFailure {
    pub stage: FailureStage,
    pub name: String,
    pub reason: String,
}

impl EvaluationFailure {
    pub fn stage_label(&self) -> &'static str {
        match self.stage {
            FailureStage::Indicator => "indicator",
            FailureStage::SignalRule => "rule",
        }
    }
}

/// The outcome of one evaluation cycle for one symbol/timeframe pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub symbol: String,
    pub timeframe: String,
    pub value: Signal,
    /// Last-bar signal per rule, after degradation of failed rules to HOLD.
    pub per_rule_signals: BTreeMap<String, Signal>,
    pub failures: Vec<EvaluationFailure>,
}
