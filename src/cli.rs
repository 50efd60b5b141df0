//! CLI definition and dispatch.
//!
//! Decisions go to stdout, diagnostics to stderr, and failures map to
//! process exit codes through `From<&QuorumError>`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::csv_adapter::CsvBarAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::log_observer::LogObserver;
use crate::adapters::strategy_loader;
use crate::domain::error::QuorumError;
use crate::domain::evaluator::RuntimeEvaluator;
use crate::domain::registry::{builtin_indicators, builtin_signals, OutputShape};
use crate::ports::data_port::BarDataPort;

#[derive(Parser, Debug)]
#[command(name = "quorumtrader", about = "Composable trading-signal evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a strategy against CSV bar data
    Evaluate {
        #[arg(short, long)]
        strategy: PathBuf,
        /// Directory holding {symbol}_{timeframe}.csv files
        #[arg(short, long)]
        data: PathBuf,
        /// Evaluate one symbol instead of the strategy's universe
        #[arg(long)]
        symbol: Option<String>,
        /// Evaluate one timeframe instead of the strategy's list
        #[arg(long)]
        timeframe: Option<String>,
    },
    /// Validate a strategy configuration without evaluating
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// List the builtin indicator and signal functions
    ListFunctions,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evaluate {
            strategy,
            data,
            symbol,
            timeframe,
        } => run_evaluate(&strategy, &data, symbol.as_deref(), timeframe.as_deref()),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::ListFunctions => run_list_functions(),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuorumError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn build_evaluator(strategy_path: &PathBuf) -> Result<RuntimeEvaluator, ExitCode> {
    let config = load_config(strategy_path)?;
    let builder = strategy_loader::load_strategy(&config).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;
    for warning in builder.warnings() {
        eprintln!("warning: {warning}");
    }
    builder
        .build()
        .map(|evaluator| evaluator.with_observer(Arc::new(LogObserver)))
        .map_err(|e| {
            let err = QuorumError::from(e);
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })
}

fn run_evaluate(
    strategy_path: &PathBuf,
    data_path: &PathBuf,
    symbol_override: Option<&str>,
    timeframe_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading strategy from {}", strategy_path.display());
    let evaluator = match build_evaluator(strategy_path) {
        Ok(e) => e,
        Err(code) => return code,
    };

    let definition = evaluator.definition();
    let symbols: Vec<String> = match symbol_override {
        Some(s) => vec![s.to_string()],
        None => definition.symbols.clone(),
    };
    let timeframes: Vec<String> = match timeframe_override {
        Some(t) => vec![t.to_string()],
        None => definition.timeframes.clone(),
    };

    if symbols.is_empty() {
        eprintln!("error: no symbols configured (use --symbol or [strategy] symbols)");
        return ExitCode::from(2);
    }
    if timeframes.is_empty() {
        eprintln!("error: no timeframes configured (use --timeframe or [strategy] timeframes)");
        return ExitCode::from(2);
    }

    let data_port = CsvBarAdapter::new(data_path.clone());
    let mut evaluated = 0usize;

    for symbol in &symbols {
        for timeframe in &timeframes {
            let bars = match data_port.fetch_bars(symbol, timeframe) {
                Ok(bars) => bars,
                Err(e) => {
                    eprintln!("warning: skipping {} {} ({})", symbol, timeframe, e);
                    continue;
                }
            };

            let decision = evaluator.evaluate(symbol, timeframe, &bars);
            println!("{} {} {}", decision.symbol, decision.timeframe, decision.value);
            for (rule, signal) in &decision.per_rule_signals {
                eprintln!("  {}: {}", rule, signal);
            }
            for failure in &decision.failures {
                eprintln!("  warning: {} '{}': {}", failure.stage_label(), failure.name, failure.reason);
            }
            evaluated += 1;
        }
    }

    if evaluated == 0 {
        eprintln!("error: no symbol/timeframe pair had data");
        return ExitCode::from(4);
    }
    ExitCode::SUCCESS
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    eprintln!("Validating strategy: {}", strategy_path.display());
    let evaluator = match build_evaluator(strategy_path) {
        Ok(e) => e,
        Err(code) => return code,
    };

    let definition = evaluator.definition();
    eprintln!(
        "\n{} v{}: {} indicator(s), {} rule(s)",
        definition.metadata.name,
        definition.metadata.version,
        definition.indicators.len(),
        definition.signal_rules.len(),
    );
    for rule in &definition.signal_rules {
        let refs: Vec<String> = definition.resolved_references[&rule.name]
            .iter()
            .map(|(param, target)| format!("{}={}", param, target))
            .collect();
        eprintln!("  {} ({}): {}", rule.name, rule.function, refs.join(", "));
    }
    eprintln!("\nStrategy configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_functions() -> ExitCode {
    let indicators = builtin_indicators();
    println!("Indicators:");
    for name in indicators.names() {
        if let Ok(entry) = indicators.lookup(&name) {
            match &entry.output {
                OutputShape::Single => println!("  {}", name),
                OutputShape::Named(components) => {
                    println!("  {} -> {}", name, components.join(", "))
                }
            }
        }
    }

    let signals = builtin_signals();
    println!("Signal functions:");
    for name in signals.names() {
        if let Ok(entry) = signals.lookup(&name) {
            println!("  {} (references: {})", name, entry.reference_params.join(", "));
        }
    }
    ExitCode::SUCCESS
}
