//! Build-time validation.
//!
//! Checks run in a fixed order: deferred add-time problems, rule-name
//! uniqueness, referential integrity, weighted-policy integrity, non-empty
//! indicator and rule sets. The first check that finds anything reports
//! *all* of its violations in one `ConfigurationError`, so the caller can
//! fix a whole class of problems per attempt instead of one per attempt.

use std::collections::BTreeMap;

use crate::domain::definition::{
    CombinationPolicy, IndicatorSpec, ReferenceTarget, SignalRuleSpec, StrategyDefinition,
    StrategyMetadata,
};
use crate::domain::error::ConfigurationError;
use crate::domain::reference;
use crate::domain::registry::{IndicatorRegistry, Params};

#[allow(clippy::too_many_arguments)]
pub fn validate(
    metadata: &StrategyMetadata,
    symbols: &[String],
    timeframes: &[String],
    indicators: &[IndicatorSpec],
    rules: &[SignalRuleSpec],
    policy: &CombinationPolicy,
    risk_rules: &BTreeMap<String, Params>,
    deferred: &[String],
    registry: &IndicatorRegistry,
) -> Result<StrategyDefinition, ConfigurationError> {
    if !deferred.is_empty() {
        return Err(ConfigurationError::Invalid {
            violations: deferred.to_vec(),
        });
    }

    check_rule_uniqueness(rules)?;
    let resolved_references = check_references(indicators, rules, registry)?;
    check_weights(rules, policy)?;
    check_non_empty(indicators, rules)?;

    Ok(StrategyDefinition {
        metadata: metadata.clone(),
        symbols: symbols.to_vec(),
        timeframes: timeframes.to_vec(),
        indicators: indicators.to_vec(),
        signal_rules: rules.to_vec(),
        resolved_references,
        policy: policy.clone(),
        risk_rules: risk_rules.clone(),
    })
}

fn check_rule_uniqueness(rules: &[SignalRuleSpec]) -> Result<(), ConfigurationError> {
    let mut violations = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        if rules[..i].iter().any(|r| r.name == rule.name) {
            violations.push(format!("duplicate signal rule name '{}'", rule.name));
        }
    }
    fail_if_any(violations)
}

fn check_references(
    indicators: &[IndicatorSpec],
    rules: &[SignalRuleSpec],
    registry: &IndicatorRegistry,
) -> Result<BTreeMap<String, BTreeMap<String, ReferenceTarget>>, ConfigurationError> {
    let mut violations = Vec::new();
    let mut resolved = BTreeMap::new();

    for rule in rules {
        let mut rule_refs = BTreeMap::new();
        for reference in &rule.references {
            match reference::resolve(&reference.raw, indicators, registry) {
                Some(target) => {
                    rule_refs.insert(reference.param.clone(), target);
                }
                None => {
                    let targets = reference::available_targets(indicators, registry);
                    violations.push(format!(
                        "rule '{}': unresolved reference '{}' for parameter '{}' (known targets: {})",
                        rule.name,
                        reference.raw,
                        reference.param,
                        targets.join(", "),
                    ));
                }
            }
        }
        resolved.insert(rule.name.clone(), rule_refs);
    }

    fail_if_any(violations)?;
    Ok(resolved)
}

fn check_weights(
    rules: &[SignalRuleSpec],
    policy: &CombinationPolicy,
) -> Result<(), ConfigurationError> {
    let CombinationPolicy::Weighted { weights } = policy else {
        return Ok(());
    };
    let mut violations = Vec::new();
    for key in weights.keys() {
        if !rules.iter().any(|r| &r.name == key) {
            let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
            violations.push(format!(
                "weight refers to unknown rule '{}' (rules: {})",
                key,
                names.join(", "),
            ));
        }
    }
    fail_if_any(violations)
}

fn check_non_empty(
    indicators: &[IndicatorSpec],
    rules: &[SignalRuleSpec],
) -> Result<(), ConfigurationError> {
    let mut violations = Vec::new();
    if indicators.is_empty() {
        violations.push("strategy defines no indicators".to_string());
    }
    if rules.is_empty() {
        violations.push("strategy defines no signal rules".to_string());
    }
    fail_if_any(violations)
}

fn fail_if_any(violations: Vec<String>) -> Result<(), ConfigurationError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::Invalid { violations })
    }
}
