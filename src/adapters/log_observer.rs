//! Observer adapter that routes evaluation events to the `log` facade.

use crate::domain::signal::Decision;
use crate::ports::observer_port::EvaluationObserver;

pub struct LogObserver;

impl EvaluationObserver for LogObserver {
    fn indicator_failed(&self, indicator: &str, reason: &str) {
        log::warn!("indicator '{}' failed: {}", indicator, reason);
    }

    fn rule_failed(&self, rule: &str, reason: &str) {
        log::warn!("signal rule '{}' degraded to HOLD: {}", rule, reason);
    }

    fn decision_made(&self, decision: &Decision) {
        log::info!(
            "{} {} -> {} ({} rule(s), {} failure(s))",
            decision.symbol,
            decision.timeframe,
            decision.value,
            decision.per_rule_signals.len(),
            decision.failures.len(),
        );
    }
}
