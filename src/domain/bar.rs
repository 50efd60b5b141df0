//! OHLCV bar representation.

use chrono::NaiveDateTime;

/// One price bar. The evaluator decomposes a bar window into uniform
/// per-channel `f64` series, volume included.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
