//! Domain error types.
//!
//! Two error kinds with different propagation rules:
//! - [`ConfigurationError`]: fatal, build-time only. Always fails `build()`
//!   and always carries the valid alternatives so the caller can fix the
//!   configuration in one pass.
//! - [`ComputationError`]: recoverable, evaluation-time. Absorbed at
//!   indicator/rule granularity and surfaced as structured metadata on the
//!   returned `Decision`, never propagated past the evaluator.

/// Fatal configuration error raised by registries and `build()`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigurationError {
    #[error("duplicate registration: '{name}' already exists")]
    DuplicateRegistration { name: String },

    #[error("unknown function '{name}' (registered: {})", available.join(", "))]
    UnknownFunction {
        name: String,
        available: Vec<String>,
    },

    #[error("invalid combination policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("invalid strategy definition:\n  {}", violations.join("\n  "))]
    Invalid { violations: Vec<String> },
}

/// Recoverable failure inside one indicator or signal function.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ComputationError {
    #[error("{reason}")]
    Failed { reason: String },

    #[error("missing reference input '{name}'")]
    MissingReference { name: String },

    #[error("output shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
}

/// Top-level error type for quorumtrader.
#[derive(Debug, thiserror::Error)]
pub enum QuorumError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no bars for {symbol} on timeframe {timeframe}")]
    NoData { symbol: String, timeframe: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuorumError> for std::process::ExitCode {
    fn from(err: &QuorumError) -> Self {
        let code: u8 = match err {
            QuorumError::Io(_) => 1,
            QuorumError::ConfigParse { .. }
            | QuorumError::ConfigMissing { .. }
            | QuorumError::ConfigInvalid { .. } => 2,
            QuorumError::Configuration(_) => 3,
            QuorumError::Data { .. } | QuorumError::NoData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_function_lists_alternatives() {
        let err = ConfigurationError::UnknownFunction {
            name: "smaa".into(),
            available: vec!["ema".into(), "sma".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("smaa"));
        assert!(msg.contains("ema, sma"));
    }

    #[test]
    fn invalid_aggregates_violations() {
        let err = ConfigurationError::Invalid {
            violations: vec!["first".into(), "second".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("first"));
        assert!(msg.contains("second"));
    }

    #[test]
    fn missing_config_key_message() {
        let err = QuorumError::ConfigMissing {
            section: "strategy".into(),
            key: "policy".into(),
        };
        assert_eq!(err.to_string(), "missing config key [strategy] policy");
    }

    #[test]
    fn computation_error_messages() {
        let err = ComputationError::MissingReference { name: "fast".into() };
        assert_eq!(err.to_string(), "missing reference input 'fast'");

        let err = ComputationError::ShapeMismatch {
            expected: "3 named components".into(),
            got: "single series".into(),
        };
        assert!(err.to_string().contains("3 named components"));
    }
}
