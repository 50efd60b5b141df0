//! Reference resolution for signal-rule arguments.
//!
//! A reference written by the user resolves, in order:
//! 1. an indicator by exact configured name (single-output only),
//! 2. an `indicator.component` dotted path,
//! 3. a bare component name declared by any registered indicator, scanning
//!    indicators in registration order and components in declaration order.
//!
//! First match wins, so resolution is deterministic across builds of the
//! same configuration. Anything else is unresolved; the caller reports it
//! with [`available_targets`].

use crate::domain::definition::{IndicatorSpec, ReferenceTarget};
use crate::domain::registry::{IndicatorRegistry, OutputShape};

pub fn resolve(
    raw: &str,
    indicators: &[IndicatorSpec],
    registry: &IndicatorRegistry,
) -> Option<ReferenceTarget> {
    // exact indicator name
    if let Some(spec) = indicators.iter().find(|spec| spec.name == raw) {
        if let Ok(entry) = registry.lookup(&spec.function) {
            if entry.output == OutputShape::Single {
                return Some(ReferenceTarget::Indicator(raw.to_string()));
            }
        }
        // named-output indicators must be referenced per component;
        // fall through so a bare component can still match
    }

    // dotted path
    if let Some((indicator, component)) = raw.split_once('.') {
        let spec = indicators.iter().find(|spec| spec.name == indicator)?;
        let entry = registry.lookup(&spec.function).ok()?;
        if entry.output.components().iter().any(|c| c == component) {
            return Some(ReferenceTarget::Component {
                indicator: indicator.to_string(),
                component: component.to_string(),
            });
        }
        return None;
    }

    // bare component, registration then declaration order
    for spec in indicators {
        let Ok(entry) = registry.lookup(&spec.function) else {
            continue;
        };
        for component in entry.output.components() {
            if component == raw {
                return Some(ReferenceTarget::Component {
                    indicator: spec.name.clone(),
                    component: component.clone(),
                });
            }
        }
    }

    None
}

/// Every name a reference could legally resolve to, for error messages:
/// single-output indicator names, dotted component paths, and bare
/// component names.
pub fn available_targets(
    indicators: &[IndicatorSpec],
    registry: &IndicatorRegistry,
) -> Vec<String> {
    let mut targets = Vec::new();
    for spec in indicators {
        let Ok(entry) = registry.lookup(&spec.function) else {
            continue;
        };
        match &entry.output {
            OutputShape::Single => targets.push(spec.name.clone()),
            OutputShape::Named(components) => {
                for component in components {
                    targets.push(format!("{}.{}", spec.name, component));
                }
            }
        }
    }
    targets
}
