//! Function registries for indicators and signal rules.
//!
//! Each registry maps a stable name to a callable transformation plus a
//! capability descriptor declared once at registration: the input channels
//! and output shape for indicators, the reference-parameter names for
//! signal functions. Behaviour is driven only by these descriptors, never
//! by matching on function names at call time.
//!
//! Registries are populated once at process start ([`builtin_indicators`],
//! [`builtin_signals`]) and read-only afterwards; they may be shared across
//! threads freely.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::domain::error::{ComputationError, ConfigurationError};
use crate::domain::indicator;
use crate::domain::signal::Signal;
use crate::domain::signal_rules;

/// Literal parameter bag: parameter name → numeric value.
pub type Params = BTreeMap<String, f64>;

/// One aligned numeric input channel derived from the bar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Declared output shape of an indicator function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputShape {
    /// One series aligned 1:1 with the bar window.
    Single,
    /// An ordered tuple of component series, each with a declared name.
    Named(Vec<String>),
}

impl OutputShape {
    pub fn named(components: &[&str]) -> Self {
        OutputShape::Named(components.iter().map(|c| c.to_string()).collect())
    }

    /// Declared component names, empty for `Single`.
    pub fn components(&self) -> &[String] {
        match self {
            OutputShape::Single => &[],
            OutputShape::Named(components) => components,
        }
    }
}

/// Bar-window channels handed to indicator functions.
///
/// All slices are the same length and time-ascending.
pub struct Channels<'a> {
    pub open: &'a [f64],
    pub high: &'a [f64],
    pub low: &'a [f64],
    pub close: &'a [f64],
    pub volume: &'a [f64],
}

impl Channels<'_> {
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Result of one indicator computation.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    Single(Vec<f64>),
    /// Component series in declaration order, keyed by component name.
    Named(Vec<(String, Vec<f64>)>),
}

/// Resolved reference-parameter series handed to a signal function,
/// keyed by the function's formal parameter names.
#[derive(Debug, Default)]
pub struct SeriesBindings<'a> {
    series: BTreeMap<String, &'a [f64]>,
}

impl<'a> SeriesBindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, series: &'a [f64]) {
        self.series.insert(name.to_string(), series);
    }

    /// Fails with [`ComputationError::MissingReference`] when the rule did
    /// not supply an argument for a declared reference parameter.
    pub fn get(&self, name: &str) -> Result<&'a [f64], ComputationError> {
        self.series
            .get(name)
            .copied()
            .ok_or_else(|| ComputationError::MissingReference {
                name: name.to_string(),
            })
    }
}

pub type IndicatorFn = fn(&Channels, &Params) -> Result<IndicatorOutput, ComputationError>;

pub type SignalFn =
    for<'a> fn(&SeriesBindings<'a>, &Params) -> Result<Vec<Signal>, ComputationError>;

/// Registered indicator: callable plus capability descriptor.
pub struct IndicatorEntry {
    pub function: IndicatorFn,
    pub inputs: Vec<Channel>,
    pub output: OutputShape,
}

impl std::fmt::Debug for IndicatorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndicatorEntry")
            .field("inputs", &self.inputs)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// Registered signal function: callable plus declared reference parameters.
pub struct SignalEntry {
    pub function: SignalFn,
    pub reference_params: Vec<String>,
}

impl std::fmt::Debug for SignalEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalEntry")
            .field("reference_params", &self.reference_params)
            .finish_non_exhaustive()
    }
}

pub struct IndicatorRegistry {
    entries: BTreeMap<String, IndicatorEntry>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &str,
        function: IndicatorFn,
        inputs: Vec<Channel>,
        output: OutputShape,
    ) -> Result<(), ConfigurationError> {
        if self.entries.contains_key(name) {
            return Err(ConfigurationError::DuplicateRegistration {
                name: name.to_string(),
            });
        }
        self.entries.insert(
            name.to_string(),
            IndicatorEntry {
                function,
                inputs,
                output,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&IndicatorEntry, ConfigurationError> {
        self.entries
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownFunction {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The builtin indicator library.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let entries: &[(&str, IndicatorFn, &[Channel], OutputShape)] = &[
            ("price", indicator::price, &[Channel::Close], OutputShape::Single),
            ("sma", indicator::sma, &[Channel::Close], OutputShape::Single),
            ("ema", indicator::ema, &[Channel::Close], OutputShape::Single),
            ("wma", indicator::wma, &[Channel::Close], OutputShape::Single),
            ("rsi", indicator::rsi, &[Channel::Close], OutputShape::Single),
            ("roc", indicator::roc, &[Channel::Close], OutputShape::Single),
            ("stddev", indicator::stddev, &[Channel::Close], OutputShape::Single),
            (
                "obv",
                indicator::obv,
                &[Channel::Close, Channel::Volume],
                OutputShape::Single,
            ),
            (
                "atr",
                indicator::atr,
                &[Channel::High, Channel::Low, Channel::Close],
                OutputShape::Single,
            ),
            (
                "macd",
                indicator::macd,
                &[Channel::Close],
                OutputShape::named(&["macd_line", "signal_line", "histogram"]),
            ),
            (
                "bollinger",
                indicator::bollinger,
                &[Channel::Close],
                OutputShape::named(&["upper_band", "middle_band", "lower_band"]),
            ),
        ];
        for (name, function, inputs, output) in entries {
            registry.entries.insert(
                name.to_string(),
                IndicatorEntry {
                    function: *function,
                    inputs: inputs.to_vec(),
                    output: output.clone(),
                },
            );
        }
        registry
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SignalRegistry {
    entries: BTreeMap<String, SignalEntry>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &str,
        function: SignalFn,
        reference_params: &[&str],
    ) -> Result<(), ConfigurationError> {
        if self.entries.contains_key(name) {
            return Err(ConfigurationError::DuplicateRegistration {
                name: name.to_string(),
            });
        }
        self.entries.insert(
            name.to_string(),
            SignalEntry {
                function,
                reference_params: reference_params.iter().map(|p| p.to_string()).collect(),
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&SignalEntry, ConfigurationError> {
        self.entries
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownFunction {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The builtin signal-function library.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let entries: &[(&str, SignalFn, &[&str])] = &[
            ("cross_over", signal_rules::cross_over, &["fast", "slow"]),
            ("threshold", signal_rules::threshold, &["series"]),
            ("zero_cross", signal_rules::zero_cross, &["series"]),
            (
                "band_breakout",
                signal_rules::band_breakout,
                &["price", "upper", "lower"],
            ),
        ];
        for (name, function, reference_params) in entries {
            registry.entries.insert(
                name.to_string(),
                SignalEntry {
                    function: *function,
                    reference_params: reference_params.iter().map(|p| p.to_string()).collect(),
                },
            );
        }
        registry
    }
}

impl Default for SignalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide builtin indicator registry, populated on first use.
pub fn builtin_indicators() -> Arc<IndicatorRegistry> {
    static REGISTRY: OnceLock<Arc<IndicatorRegistry>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(IndicatorRegistry::builtin())))
}

/// Process-wide builtin signal registry, populated on first use.
pub fn builtin_signals() -> Arc<SignalRegistry> {
    static REGISTRY: OnceLock<Arc<SignalRegistry>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(SignalRegistry::builtin())))
}
