#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use quorumtrader::domain::bar::Bar;
use quorumtrader::domain::error::QuorumError;
use quorumtrader::ports::data_port::BarDataPort;
use std::collections::HashMap;

pub struct MockBarPort {
    pub data: HashMap<(String, String), Vec<Bar>>,
    pub errors: HashMap<(String, String), String>,
}

impl MockBarPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, timeframe: &str, bars: Vec<Bar>) -> Self {
        self.data
            .insert((symbol.to_string(), timeframe.to_string()), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, timeframe: &str, reason: &str) -> Self {
        self.errors.insert(
            (symbol.to_string(), timeframe.to_string()),
            reason.to_string(),
        );
        self
    }
}

impl BarDataPort for MockBarPort {
    fn fetch_bars(&self, symbol: &str, timeframe: &str) -> Result<Vec<Bar>, QuorumError> {
        let key = (symbol.to_string(), timeframe.to_string());
        if let Some(reason) = self.errors.get(&key) {
            return Err(QuorumError::Data {
                reason: reason.clone(),
            });
        }
        self.data
            .get(&key)
            .cloned()
            .ok_or_else(|| QuorumError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            })
    }

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, QuorumError> {
        let mut symbols: Vec<String> = self
            .data
            .keys()
            .filter(|(_, t)| t == timeframe)
            .map(|(s, _)| s.clone())
            .collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn bar(date: &str, close: f64) -> Bar {
    Bar {
        timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::MIN),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// Daily bars starting 2024-01-01, one per close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: (start + chrono::Duration::days(i as i64)).and_time(NaiveTime::MIN),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// A falling-then-rising window that makes a short moving average cross
/// above a longer one on the final bar.
pub fn v_shaped_closes() -> Vec<f64> {
    vec![10.0, 9.0, 8.0, 7.0, 9.0, 12.0]
}
