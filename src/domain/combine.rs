//! Combination policies: fold per-rule signals into one decision value.

use std::collections::BTreeMap;

use crate::domain::definition::CombinationPolicy;
use crate::domain::signal::Signal;

/// Dead zone half-width for the weighted policy: |score| must exceed this
/// for a directional decision.
pub const WEIGHTED_DEAD_ZONE: f64 = 0.3;

pub fn combine(policy: &CombinationPolicy, per_rule: &BTreeMap<String, Signal>) -> Signal {
    match policy {
        CombinationPolicy::MajorityVote => {
            majority_vote(per_rule.values().copied())
        }
        CombinationPolicy::Weighted { weights } => weighted(per_rule, weights),
        CombinationPolicy::Unanimous => unanimous(per_rule.values().copied()),
    }
}

/// Strict majority: a signal wins only with count > n/2. Ties and
/// pluralities short of a majority are HOLD. Count-based, so the outcome
/// cannot depend on rule order.
pub fn majority_vote<I: IntoIterator<Item = Signal>>(signals: I) -> Signal {
    let mut buys = 0usize;
    let mut sells = 0usize;
    let mut total = 0usize;
    for signal in signals {
        total += 1;
        match signal {
            Signal::Buy => buys += 1,
            Signal::Sell => sells += 1,
            Signal::Hold => {}
        }
    }
    if buys * 2 > total {
        Signal::Buy
    } else if sells * 2 > total {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Normalized weighted score: Σ weight·score / Σ weight, with a dead zone
/// of ±[`WEIGHTED_DEAD_ZONE`]. Rules without a weight do not participate.
pub fn weighted(per_rule: &BTreeMap<String, Signal>, weights: &BTreeMap<String, f64>) -> Signal {
    let mut score = 0.0;
    let mut total = 0.0;
    for (rule, weight) in weights {
        if let Some(signal) = per_rule.get(rule) {
            score += weight * signal.score();
            total += weight;
        }
    }
    if total == 0.0 {
        return Signal::Hold;
    }
    let normalized = score / total;
    if normalized > WEIGHTED_DEAD_ZONE {
        Signal::Buy
    } else if normalized < -WEIGHTED_DEAD_ZONE {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// All rules agree or the answer is HOLD. An empty rule set is HOLD.
pub fn unanimous<I: IntoIterator<Item = Signal>>(signals: I) -> Signal {
    let mut iter = signals.into_iter();
    let Some(first) = iter.next() else {
        return Signal::Hold;
    };
    if iter.all(|signal| signal == first) {
        first
    } else {
        Signal::Hold
    }
}
