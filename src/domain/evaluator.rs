//! Runtime evaluation of a built strategy.
//!
//! `evaluate()` is a pure function of the definition and the bar window:
//! every indicator is recomputed per call into a transient cache keyed by
//! resolved reference target, so two calls with the same bars produce the
//! same decision. Fault containment is per block: a failing indicator is
//! replaced by a NaN-filled placeholder series, a failing rule degrades
//! to HOLD, and both are recorded on the decision and reported to the
//! observer. A cycle never aborts.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::bar::Bar;
use crate::domain::combine;
use crate::domain::definition::{ReferenceTarget, StrategyDefinition};
use crate::domain::registry::{
    Channels, IndicatorOutput, IndicatorRegistry, OutputShape, SeriesBindings, SignalRegistry,
};
use crate::domain::signal::{Decision, EvaluationFailure, FailureStage, Signal};
use crate::ports::observer_port::{EvaluationObserver, NullObserver};

pub struct RuntimeEvaluator {
    definition: StrategyDefinition,
    indicator_registry: Arc<IndicatorRegistry>,
    signal_registry: Arc<SignalRegistry>,
    observer: Arc<dyn EvaluationObserver>,
}

impl std::fmt::Debug for RuntimeEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeEvaluator")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl RuntimeEvaluator {
    pub(crate) fn new(
        definition: StrategyDefinition,
        indicator_registry: Arc<IndicatorRegistry>,
        signal_registry: Arc<SignalRegistry>,
    ) -> Self {
        Self {
            definition,
            indicator_registry,
            signal_registry,
            observer: Arc::new(NullObserver),
        }
    }

    /// Inject an event sink for evaluation failures and decisions.
    pub fn with_observer(mut self, observer: Arc<dyn EvaluationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn definition(&self) -> &StrategyDefinition {
        &self.definition
    }

    /// Run one evaluation cycle over a time-ascending bar window.
    pub fn evaluate(&self, symbol: &str, timeframe: &str, bars: &[Bar]) -> Decision {
        let mut failures = Vec::new();
        let series_cache = self.compute_indicators(bars, &mut failures);
        let per_rule_signals = self.run_rules(&series_cache, &mut failures);
        let value = combine::combine(&self.definition.policy, &per_rule_signals);

        let decision = Decision {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            value,
            per_rule_signals,
            failures,
        };
        self.observer.decision_made(&decision);
        decision
    }

    fn compute_indicators(
        &self,
        bars: &[Bar],
        failures: &mut Vec<EvaluationFailure>,
    ) -> BTreeMap<ReferenceTarget, Vec<f64>> {
        let open: Vec<f64> = bars.iter().map(|b| b.open).collect();
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volume: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let channels = Channels {
            open: &open,
            high: &high,
            low: &low,
            close: &close,
            volume: &volume,
        };

        let mut cache = BTreeMap::new();
        for spec in &self.definition.indicators {
            let Ok(entry) = self.indicator_registry.lookup(&spec.function) else {
                // cannot happen after validation; treated as a failure
                // rather than a panic to preserve containment
                self.record_indicator_failure(
                    failures,
                    &spec.name,
                    &format!("function '{}' disappeared from registry", spec.function),
                );
                continue;
            };

            match (entry.function)(&channels, &spec.params) {
                Ok(IndicatorOutput::Single(series)) if entry.output == OutputShape::Single => {
                    cache.insert(ReferenceTarget::Indicator(spec.name.clone()), series);
                }
                Ok(IndicatorOutput::Named(components)) => {
                    let declared = entry.output.components();
                    let produced: Vec<&String> = components.iter().map(|(n, _)| n).collect();
                    if declared.iter().collect::<Vec<_>>() != produced {
                        self.record_indicator_failure(
                            failures,
                            &spec.name,
                            &format!(
                                "output components [{}] do not match declared [{}]",
                                produced
                                    .iter()
                                    .map(|s| s.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", "),
                                declared.join(", "),
                            ),
                        );
                        self.insert_placeholders(&mut cache, spec, &entry.output, bars.len());
                        continue;
                    }
                    for (component, series) in components {
                        cache.insert(
                            ReferenceTarget::Component {
                                indicator: spec.name.clone(),
                                component,
                            },
                            series,
                        );
                    }
                }
                Ok(_) => {
                    self.record_indicator_failure(
                        failures,
                        &spec.name,
                        "output shape does not match declaration",
                    );
                    self.insert_placeholders(&mut cache, spec, &entry.output, bars.len());
                }
                Err(err) => {
                    self.record_indicator_failure(failures, &spec.name, &err.to_string());
                    self.insert_placeholders(&mut cache, spec, &entry.output, bars.len());
                }
            }
        }
        cache
    }

    fn record_indicator_failure(
        &self,
        failures: &mut Vec<EvaluationFailure>,
        name: &str,
        reason: &str,
    ) {
        self.observer.indicator_failed(name, reason);
        failures.push(EvaluationFailure {
            stage: FailureStage::Indicator,
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    /// NaN-filled stand-ins so downstream rules still receive a series of
    /// the bar-window length. NaN rather than a constant: every signal
    /// function treats NaN input as HOLD, while a constant reads as a real
    /// price level (e.g. deeply oversold to a threshold rule).
    fn insert_placeholders(
        &self,
        cache: &mut BTreeMap<ReferenceTarget, Vec<f64>>,
        spec: &crate::domain::definition::IndicatorSpec,
        shape: &OutputShape,
        len: usize,
    ) {
        match shape {
            OutputShape::Single => {
                cache.insert(
                    ReferenceTarget::Indicator(spec.name.clone()),
                    vec![f64::NAN; len],
                );
            }
            OutputShape::Named(components) => {
                for component in components {
                    cache.insert(
                        ReferenceTarget::Component {
                            indicator: spec.name.clone(),
                            component: component.clone(),
                        },
                        vec![f64::NAN; len],
                    );
                }
            }
        }
    }

    fn run_rules(
        &self,
        cache: &BTreeMap<ReferenceTarget, Vec<f64>>,
        failures: &mut Vec<EvaluationFailure>,
    ) -> BTreeMap<String, Signal> {
        let mut per_rule = BTreeMap::new();
        for rule in &self.definition.signal_rules {
            let signal = self.run_rule(rule, cache, failures);
            per_rule.insert(rule.name.clone(), signal);
        }
        per_rule
    }

    fn run_rule(
        &self,
        rule: &crate::domain::definition::SignalRuleSpec,
        cache: &BTreeMap<ReferenceTarget, Vec<f64>>,
        failures: &mut Vec<EvaluationFailure>,
    ) -> Signal {
        let fail = |reason: String, failures: &mut Vec<EvaluationFailure>| {
            self.observer.rule_failed(&rule.name, &reason);
            failures.push(EvaluationFailure {
                stage: FailureStage::SignalRule,
                name: rule.name.clone(),
                reason,
            });
            Signal::Hold
        };

        let entry = match self.signal_registry.lookup(&rule.function) {
            Ok(entry) => entry,
            Err(err) => return fail(err.to_string(), failures),
        };

        let mut bindings = SeriesBindings::new();
        if let Some(resolved) = self.definition.resolved_references.get(&rule.name) {
            for (param, target) in resolved {
                match cache.get(target) {
                    Some(series) => bindings.bind(param, series),
                    None => {
                        return fail(
                            format!("reference target '{}' produced no series", target),
                            failures,
                        );
                    }
                }
            }
        }

        match (entry.function)(&bindings, &rule.params) {
            // only the most recent bar decides; an empty output is HOLD
            Ok(signals) => signals.last().copied().unwrap_or(Signal::Hold),
            Err(err) => fail(err.to_string(), failures),
        }
    }
}
