//! Immutable strategy definition produced by a successful build.
//!
//! Everything here is plain data: the builder accumulates it, the validator
//! freezes it, the evaluator walks it. Indicator and rule order is
//! preserved from registration; it drives deterministic reference
//! resolution and evaluation order.

use std::collections::BTreeMap;

use crate::domain::registry::Params;

/// One configured indicator instance: a registry function plus literal
/// parameters, under a user-chosen name.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub name: String,
    pub function: String,
    pub params: Params,
}

/// Resolved target of a reference argument.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReferenceTarget {
    /// A single-output indicator, by configured name.
    Indicator(String),
    /// One component of a named-output indicator.
    Component { indicator: String, component: String },
}

impl std::fmt::Display for ReferenceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceTarget::Indicator(name) => write!(f, "{}", name),
            ReferenceTarget::Component { indicator, component } => {
                write!(f, "{}.{}", indicator, component)
            }
        }
    }
}

/// A reference argument as written by the user: classified at add-time,
/// resolved to a [`ReferenceTarget`] at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceArg {
    /// Formal parameter name declared by the signal function.
    pub param: String,
    /// The raw referenced name as the user wrote it.
    pub raw: String,
}

/// One configured signal rule.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRuleSpec {
    pub name: String,
    pub function: String,
    /// Reference arguments in declared-parameter order.
    pub references: Vec<ReferenceArg>,
    /// Literal (numeric) parameters.
    pub params: Params,
}

/// How per-rule signals are folded into one decision.
#[derive(Debug, Clone, PartialEq)]
pub enum CombinationPolicy {
    /// Strict majority wins; anything less is HOLD.
    MajorityVote,
    /// Normalized weighted score with a ±0.3 dead zone; unweighted rules
    /// do not participate.
    Weighted { weights: BTreeMap<String, f64> },
    /// All rules must agree; any disagreement is HOLD.
    Unanimous,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrategyMetadata {
    pub name: String,
    pub version: String,
}

/// A validated, immutable strategy definition.
///
/// Construction goes through `StrategyBuilder::build()`; there is no other
/// way to obtain one, so holding a `StrategyDefinition` implies every
/// invariant checked by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDefinition {
    pub metadata: StrategyMetadata,
    pub symbols: Vec<String>,
    pub timeframes: Vec<String>,
    /// Registration order preserved.
    pub indicators: Vec<IndicatorSpec>,
    /// Registration order preserved. References are resolved: every
    /// `ReferenceArg.raw` maps to a target in `resolved_references`.
    pub signal_rules: Vec<SignalRuleSpec>,
    /// rule name → (formal param → resolved target).
    pub resolved_references: BTreeMap<String, BTreeMap<String, ReferenceTarget>>,
    pub policy: CombinationPolicy,
    /// Opaque risk parameter bags, keyed by kind. Stored, never interpreted.
    pub risk_rules: BTreeMap<String, Params>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_target_display() {
        assert_eq!(
            ReferenceTarget::Indicator("sma_fast".into()).to_string(),
            "sma_fast"
        );
        assert_eq!(
            ReferenceTarget::Component {
                indicator: "macd_main".into(),
                component: "histogram".into(),
            }
            .to_string(),
            "macd_main.histogram"
        );
    }

    #[test]
    fn reference_target_orders_for_map_keys() {
        let a = ReferenceTarget::Indicator("a".into());
        let b = ReferenceTarget::Component {
            indicator: "a".into(),
            component: "x".into(),
        };
        assert!(a < b);
    }
}
