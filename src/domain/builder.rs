//! Fluent strategy builder.
//!
//! The builder is the only mutable stage of the lifecycle: it accumulates
//! indicators, signal rules, universe and policy, then `build()` validates
//! everything at once and freezes the result into a `RuntimeEvaluator`.
//!
//! Two rules shape the API:
//! - Argument classification is by declared reference-parameter names of
//!   the signal function, decided once when the rule is added. A value is
//!   never inspected to guess whether it is a reference.
//! - Resolution of reference targets is deferred to `build()`, so
//!   indicators may be registered after the rules that mention them.
//!
//! Problems found while adding (unknown functions, non-numeric literals)
//! do not fail the call; they are deferred and reported together by
//! `build()`. Indicator overwrite is permitted but observable through the
//! warning channel and the log.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::definition::{
    CombinationPolicy, IndicatorSpec, ReferenceArg, SignalRuleSpec, StrategyMetadata,
};
use crate::domain::error::ConfigurationError;
use crate::domain::evaluator::RuntimeEvaluator;
use crate::domain::registry::{
    builtin_indicators, builtin_signals, IndicatorRegistry, Params, SignalRegistry,
};
use crate::domain::validate;

/// A signal-rule argument before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(f64),
    Name(String),
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(name: &str) -> Self {
        Arg::Name(name.to_string())
    }
}

impl From<String> for Arg {
    fn from(name: String) -> Self {
        Arg::Name(name)
    }
}

pub struct StrategyBuilder {
    indicator_registry: Arc<IndicatorRegistry>,
    signal_registry: Arc<SignalRegistry>,
    metadata: StrategyMetadata,
    symbols: Vec<String>,
    timeframes: Vec<String>,
    indicators: Vec<IndicatorSpec>,
    rules: Vec<SignalRuleSpec>,
    policy: CombinationPolicy,
    risk_rules: BTreeMap<String, Params>,
    /// Violations detected while adding, reported together at build.
    deferred: Vec<String>,
    warnings: Vec<String>,
}

impl std::fmt::Debug for StrategyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyBuilder")
            .field("metadata", &self.metadata)
            .field("symbols", &self.symbols)
            .field("timeframes", &self.timeframes)
            .field("indicators", &self.indicators)
            .field("rules", &self.rules)
            .field("policy", &self.policy)
            .field("deferred", &self.deferred)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl StrategyBuilder {
    /// Builder over the builtin registries.
    pub fn new() -> Self {
        Self::with_registries(builtin_indicators(), builtin_signals())
    }

    /// Builder over caller-supplied registries.
    pub fn with_registries(
        indicator_registry: Arc<IndicatorRegistry>,
        signal_registry: Arc<SignalRegistry>,
    ) -> Self {
        Self {
            indicator_registry,
            signal_registry,
            metadata: StrategyMetadata::default(),
            symbols: Vec::new(),
            timeframes: Vec::new(),
            indicators: Vec::new(),
            rules: Vec::new(),
            policy: CombinationPolicy::MajorityVote,
            risk_rules: BTreeMap::new(),
            deferred: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn set_metadata(&mut self, name: &str, version: &str) -> &mut Self {
        self.metadata = StrategyMetadata {
            name: name.to_string(),
            version: version.to_string(),
        };
        self
    }

    pub fn add_symbol(&mut self, symbol: &str) -> &mut Self {
        if !self.symbols.iter().any(|s| s == symbol) {
            self.symbols.push(symbol.to_string());
        }
        self
    }

    pub fn add_timeframe(&mut self, timeframe: &str) -> &mut Self {
        if !self.timeframes.iter().any(|t| t == timeframe) {
            self.timeframes.push(timeframe.to_string());
        }
        self
    }

    /// Register an indicator instance under `name`. Re-using a name
    /// overwrites the earlier instance in place (registration position is
    /// kept) and records a warning.
    pub fn add_indicator(&mut self, name: &str, function: &str, params: Params) -> &mut Self {
        if let Err(err) = self.indicator_registry.lookup(function) {
            self.deferred.push(format!("indicator '{}': {}", name, err));
        }
        let spec = IndicatorSpec {
            name: name.to_string(),
            function: function.to_string(),
            params,
        };
        if let Some(existing) = self.indicators.iter_mut().find(|i| i.name == name) {
            let warning = format!(
                "indicator '{}' redefined: {} replaces {}",
                name, spec.function, existing.function
            );
            log::warn!("{}", warning);
            self.warnings.push(warning);
            *existing = spec;
        } else {
            self.indicators.push(spec);
        }
        self
    }

    /// Add a signal rule. Each argument is classified once, here: if the
    /// signal function declares the parameter as a reference, the argument
    /// is a reference (a numeric value given for it becomes an unresolvable
    /// reference and fails the build); otherwise it is a literal.
    pub fn add_signal_rule(
        &mut self,
        name: &str,
        function: &str,
        args: Vec<(&str, Arg)>,
    ) -> &mut Self {
        let reference_params: Vec<String> = match self.signal_registry.lookup(function) {
            Ok(entry) => entry.reference_params.clone(),
            Err(err) => {
                self.deferred.push(format!("signal rule '{}': {}", name, err));
                return self;
            }
        };

        let mut references = Vec::new();
        let mut params = Params::new();
        for (param, arg) in args {
            if reference_params.iter().any(|p| p == param) {
                let raw = match arg {
                    Arg::Name(raw) => raw,
                    Arg::Value(value) => value.to_string(),
                };
                references.push(ReferenceArg {
                    param: param.to_string(),
                    raw,
                });
            } else {
                match arg {
                    Arg::Value(value) => {
                        params.insert(param.to_string(), value);
                    }
                    Arg::Name(raw) => {
                        self.deferred.push(format!(
                            "signal rule '{}': literal parameter '{}' must be numeric, got '{}'",
                            name, param, raw
                        ));
                    }
                }
            }
        }

        self.rules.push(SignalRuleSpec {
            name: name.to_string(),
            function: function.to_string(),
            references,
            params,
        });
        self
    }

    /// Set the combination policy. Weighted-policy shape problems (empty,
    /// non-finite values, zero weight sum) are reported synchronously;
    /// whether the weight keys name real rules is checked at build.
    pub fn set_combination_policy(
        &mut self,
        policy: CombinationPolicy,
    ) -> Result<&mut Self, ConfigurationError> {
        if let CombinationPolicy::Weighted { weights } = &policy {
            if weights.is_empty() {
                return Err(ConfigurationError::InvalidPolicy {
                    reason: "weighted policy requires at least one weight".to_string(),
                });
            }
            for (rule, weight) in weights {
                if !weight.is_finite() {
                    return Err(ConfigurationError::InvalidPolicy {
                        reason: format!("weight for '{}' is not finite: {}", rule, weight),
                    });
                }
            }
            let total: f64 = weights.values().sum();
            if total == 0.0 {
                return Err(ConfigurationError::InvalidPolicy {
                    reason: "weights sum to zero".to_string(),
                });
            }
        }
        self.policy = policy;
        Ok(self)
    }

    /// Attach an opaque risk parameter bag. Stored on the definition,
    /// never interpreted.
    pub fn add_risk_rule(&mut self, kind: &str, params: Params) -> &mut Self {
        self.risk_rules.insert(kind.to_string(), params);
        self
    }

    /// Warnings accumulated so far (indicator overwrites).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Validate everything and freeze. The builder is untouched, so a
    /// failed build can be corrected and retried.
    pub fn build(&self) -> Result<RuntimeEvaluator, ConfigurationError> {
        let definition = validate::validate(
            &self.metadata,
            &self.symbols,
            &self.timeframes,
            &self.indicators,
            &self.rules,
            &self.policy,
            &self.risk_rules,
            &self.deferred,
            &self.indicator_registry,
        )?;
        Ok(RuntimeEvaluator::new(
            definition,
            Arc::clone(&self.indicator_registry),
            Arc::clone(&self.signal_registry),
        ))
    }
}

impl Default for StrategyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(n: f64) -> Params {
        Params::from([("period".to_string(), n)])
    }

    #[test]
    fn fluent_accumulation() {
        let mut builder = StrategyBuilder::new();
        builder
            .set_metadata("crossover", "1.0")
            .add_symbol("BHP")
            .add_symbol("BHP")
            .add_timeframe("1d")
            .add_indicator("sma_fast", "sma", period(10.0))
            .add_indicator("sma_slow", "sma", period(30.0))
            .add_signal_rule(
                "cross",
                "cross_over",
                vec![("fast", "sma_fast".into()), ("slow", "sma_slow".into())],
            );
        let evaluator = builder.build().unwrap();
        let definition = evaluator.definition();
        assert_eq!(definition.symbols, vec!["BHP".to_string()]);
        assert_eq!(definition.indicators.len(), 2);
        assert_eq!(definition.signal_rules.len(), 1);
    }

    #[test]
    fn indicator_overwrite_warns_and_keeps_position() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_indicator("trend", "sma", period(10.0))
            .add_indicator("other", "ema", period(5.0))
            .add_indicator("trend", "ema", period(20.0));
        assert_eq!(builder.warnings().len(), 1);
        assert!(builder.warnings()[0].contains("trend"));

        builder.add_signal_rule(
            "cross",
            "cross_over",
            vec![("fast", "trend".into()), ("slow", "other".into())],
        );
        let evaluator = builder.build().unwrap();
        let definition = evaluator.definition();
        assert_eq!(definition.indicators[0].name, "trend");
        assert_eq!(definition.indicators[0].function, "ema");
    }

    #[test]
    fn unknown_indicator_function_defers_to_build() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_indicator("trend", "smaa", period(10.0))
            .add_signal_rule("level", "threshold", vec![("series", "trend".into())]);
        let err = builder.build().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("smaa"));
        assert!(msg.contains("sma"), "should list registered alternatives");
    }

    #[test]
    fn numeric_value_for_reference_param_fails_at_build() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_indicator("trend", "sma", period(10.0))
            .add_signal_rule(
                "cross",
                "cross_over",
                vec![("fast", Arg::Value(42.0)), ("slow", "trend".into())],
            );
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn name_for_literal_param_fails_at_build() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_indicator("momentum", "rsi", period(14.0))
            .add_signal_rule(
                "level",
                "threshold",
                vec![("series", "momentum".into()), ("upper", "momentum".into())],
            );
        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("must be numeric"));
    }

    #[test]
    fn weighted_policy_shape_checked_synchronously() {
        let mut builder = StrategyBuilder::new();
        let empty = builder
            .set_combination_policy(CombinationPolicy::Weighted {
                weights: BTreeMap::new(),
            })
            .unwrap_err();
        assert!(matches!(empty, ConfigurationError::InvalidPolicy { .. }));

        let non_finite = builder
            .set_combination_policy(CombinationPolicy::Weighted {
                weights: BTreeMap::from([("cross".to_string(), f64::NAN)]),
            })
            .unwrap_err();
        assert!(matches!(non_finite, ConfigurationError::InvalidPolicy { .. }));

        let zero_sum = builder
            .set_combination_policy(CombinationPolicy::Weighted {
                weights: BTreeMap::from([
                    ("a".to_string(), 1.0),
                    ("b".to_string(), -1.0),
                ]),
            })
            .unwrap_err();
        assert!(matches!(zero_sum, ConfigurationError::InvalidPolicy { .. }));
    }

    #[test]
    fn rules_may_reference_indicators_added_later() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_signal_rule(
                "cross",
                "cross_over",
                vec![("fast", "sma_fast".into()), ("slow", "sma_slow".into())],
            )
            .add_indicator("sma_fast", "sma", period(10.0))
            .add_indicator("sma_slow", "sma", period(30.0));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn failed_build_leaves_builder_usable() {
        let mut builder = StrategyBuilder::new();
        builder.add_signal_rule(
            "cross",
            "cross_over",
            vec![("fast", "sma_fast".into()), ("slow", "sma_slow".into())],
        );
        assert!(builder.build().is_err());

        builder
            .add_indicator("sma_fast", "sma", period(10.0))
            .add_indicator("sma_slow", "sma", period(30.0));
        assert!(builder.build().is_ok());
    }

    #[test]
    fn builder_and_evaluator_are_debuggable() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_indicator("trend", "sma", period(10.0))
            .add_signal_rule("level", "threshold", vec![("series", "trend".into())]);
        assert!(format!("{:?}", builder).contains("StrategyBuilder"));

        let evaluator = builder.build().unwrap();
        let dump = format!("{:?}", evaluator);
        assert!(dump.contains("RuntimeEvaluator"));
        assert!(dump.contains("trend"));
    }

    #[test]
    fn risk_rules_are_stored_opaquely() {
        let mut builder = StrategyBuilder::new();
        builder
            .add_indicator("trend", "sma", period(10.0))
            .add_signal_rule("level", "threshold", vec![("series", "trend".into())])
            .add_risk_rule("stop_loss", Params::from([("percent".to_string(), 5.0)]));
        let evaluator = builder.build().unwrap();
        let definition = evaluator.definition();
        assert_eq!(definition.risk_rules["stop_loss"]["percent"], 5.0);
    }
}
