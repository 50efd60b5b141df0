//! CSV bar data adapter.
//!
//! One file per symbol/timeframe pair, `{symbol}_{timeframe}.csv`, with a
//! `timestamp,open,high,low,close,volume` header. Timestamps are either
//! `%Y-%m-%d %H:%M:%S` or bare dates (read as midnight). Rows are sorted
//! ascending after reading, so file order does not matter.

use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::bar::Bar;
use crate::domain::error::QuorumError;
use crate::ports::data_port::BarDataPort;

pub struct CsvBarAdapter {
    base_path: PathBuf,
}

impl CsvBarAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, timeframe))
    }

    fn parse_timestamp(value: &str) -> Result<NaiveDateTime, QuorumError> {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
            return Ok(ts);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|e| QuorumError::Data {
                reason: format!("invalid timestamp '{}': {}", value, e),
            })
    }

    fn field<'a>(
        record: &'a csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<&'a str, QuorumError> {
        record.get(index).ok_or_else(|| QuorumError::Data {
            reason: format!("missing {} column", name),
        })
    }

    fn numeric_field(
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<f64, QuorumError> {
        Self::field(record, index, name)?
            .parse()
            .map_err(|e| QuorumError::Data {
                reason: format!("invalid {} value: {}", name, e),
            })
    }
}

impl BarDataPort for CsvBarAdapter {
    fn fetch_bars(&self, symbol: &str, timeframe: &str) -> Result<Vec<Bar>, QuorumError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path).map_err(|e| QuorumError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuorumError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            bars.push(Bar {
                timestamp: Self::parse_timestamp(Self::field(&record, 0, "timestamp")?)?,
                open: Self::numeric_field(&record, 1, "open")?,
                high: Self::numeric_field(&record, 2, "high")?,
                low: Self::numeric_field(&record, 3, "low")?,
                close: Self::numeric_field(&record, 4, "close")?,
                volume: Self::numeric_field(&record, 5, "volume")?,
            });
        }

        if bars.is_empty() {
            return Err(QuorumError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, QuorumError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| QuorumError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", timeframe);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| QuorumError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.ends_with(&suffix) {
                symbols.push(name_str[..name_str.len() - suffix.len()].to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
