//! Observer port: evaluation events flow out through this interface
//! instead of ad-hoc printing, so fault handling is unit-testable and the
//! host application decides where diagnostics go.

use crate::domain::signal::Decision;

/// Event sink for one evaluation cycle. All methods have no-op defaults;
/// implementors override what they care about.
pub trait EvaluationObserver: Send + Sync {
    /// An indicator computation failed and was replaced by a placeholder.
    fn indicator_failed(&self, _indicator: &str, _reason: &str) {}

    /// A signal rule failed and was degraded to HOLD.
    fn rule_failed(&self, _rule: &str, _reason: &str) {}

    /// A decision was produced for one symbol/timeframe pair.
    fn decision_made(&self, _decision: &Decision) {}
}

/// Discards every event. The default when no observer is injected.
pub struct NullObserver;

impl EvaluationObserver for NullObserver {}
