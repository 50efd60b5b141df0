//! Strategy config loader: translates an INI-backed [`ConfigPort`] into
//! builder calls.
//!
//! Schema:
//! - `[strategy]` — name, version, policy (majority | weighted | unanimous),
//!   comma-separated symbols and timeframes
//! - `[indicator.NAME]` — function plus numeric parameters
//! - `[signal.NAME]` — function plus arguments; a value that parses as a
//!   number is offered as a literal, anything else as a name. Final
//!   classification is the builder's, driven by the signal function's
//!   declared reference parameters.
//! - `[weights]` — rule name → weight, required for the weighted policy
//! - `[risk.KIND]` — opaque numeric parameters
//!
//! Sections are visited in the config port's enumeration order (sorted for
//! the INI adapter), which fixes indicator registration order and with it
//! bare-component resolution.

use std::collections::BTreeMap;

use crate::domain::builder::{Arg, StrategyBuilder};
use crate::domain::definition::CombinationPolicy;
use crate::domain::error::QuorumError;
use crate::domain::registry::Params;
use crate::ports::config_port::ConfigPort;

const STRATEGY_SECTION: &str = "strategy";
const WEIGHTS_SECTION: &str = "weights";
const INDICATOR_PREFIX: &str = "indicator.";
const SIGNAL_PREFIX: &str = "signal.";
const RISK_PREFIX: &str = "risk.";

pub fn load_strategy(config: &dyn ConfigPort) -> Result<StrategyBuilder, QuorumError> {
    let mut builder = StrategyBuilder::new();

    let name = config
        .get_string(STRATEGY_SECTION, "name")
        .unwrap_or_default();
    let version = config
        .get_string(STRATEGY_SECTION, "version")
        .unwrap_or_default();
    builder.set_metadata(&name, &version);

    for symbol in list_value(config, "symbols") {
        builder.add_symbol(&symbol);
    }
    for timeframe in list_value(config, "timeframes") {
        builder.add_timeframe(&timeframe);
    }

    for section in config.sections() {
        if let Some(name) = section.strip_prefix(INDICATOR_PREFIX) {
            let function = require(config, &section, "function")?;
            let params = numeric_params(config, &section)?;
            builder.add_indicator(name, &function, params);
        } else if let Some(name) = section.strip_prefix(SIGNAL_PREFIX) {
            let function = require(config, &section, "function")?;
            let args = signal_args(config, &section)?;
            builder.add_signal_rule(
                name,
                &function,
                args.iter().map(|(k, v)| (k.as_str(), v.clone())).collect(),
            );
        } else if let Some(kind) = section.strip_prefix(RISK_PREFIX) {
            builder.add_risk_rule(kind, numeric_params(config, &section)?);
        }
    }

    let policy = load_policy(config)?;
    builder.set_combination_policy(policy)?;
    Ok(builder)
}

fn load_policy(config: &dyn ConfigPort) -> Result<CombinationPolicy, QuorumError> {
    let policy = config
        .get_string(STRATEGY_SECTION, "policy")
        .unwrap_or_else(|| "majority".to_string());
    match policy.as_str() {
        "majority" | "majority_vote" => Ok(CombinationPolicy::MajorityVote),
        "unanimous" => Ok(CombinationPolicy::Unanimous),
        "weighted" => {
            let mut weights = BTreeMap::new();
            for rule in config.section_keys(WEIGHTS_SECTION) {
                weights.insert(rule.clone(), parse_number(config, WEIGHTS_SECTION, &rule)?);
            }
            if weights.is_empty() {
                return Err(QuorumError::ConfigMissing {
                    section: WEIGHTS_SECTION.to_string(),
                    key: "<rule weights>".to_string(),
                });
            }
            Ok(CombinationPolicy::Weighted { weights })
        }
        other => Err(QuorumError::ConfigInvalid {
            section: STRATEGY_SECTION.to_string(),
            key: "policy".to_string(),
            reason: format!(
                "'{}' is not a policy (expected majority, weighted or unanimous)",
                other
            ),
        }),
    }
}

fn list_value(config: &dyn ConfigPort, key: &str) -> Vec<String> {
    config
        .get_string(STRATEGY_SECTION, key)
        .map(|value| {
            value
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, QuorumError> {
    config
        .get_string(section, key)
        .ok_or_else(|| QuorumError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn parse_number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, QuorumError> {
    let raw = require(config, section, key)?;
    raw.trim()
        .parse()
        .map_err(|_| QuorumError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not a number", raw),
        })
}

/// Every key except `function`, all required to be numeric.
fn numeric_params(config: &dyn ConfigPort, section: &str) -> Result<Params, QuorumError> {
    let mut params = Params::new();
    for key in config.section_keys(section) {
        if key == "function" {
            continue;
        }
        params.insert(key.clone(), parse_number(config, section, &key)?);
    }
    Ok(params)
}

/// Every key except `function`, numbers as literal candidates and
/// everything else as name candidates.
fn signal_args(
    config: &dyn ConfigPort,
    section: &str,
) -> Result<Vec<(String, Arg)>, QuorumError> {
    let mut args = Vec::new();
    for key in config.section_keys(section) {
        if key == "function" {
            continue;
        }
        let raw = require(config, section, &key)?;
        let arg = match raw.trim().parse::<f64>() {
            Ok(value) => Arg::Value(value),
            Err(_) => Arg::Name(raw.trim().to_string()),
        };
        args.push((key, arg));
    }
    Ok(args)
}
