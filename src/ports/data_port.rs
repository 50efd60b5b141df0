//! Bar data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::QuorumError;

pub trait BarDataPort {
    /// Fetch the bar window for one symbol/timeframe pair, sorted by
    /// timestamp ascending.
    fn fetch_bars(&self, symbol: &str, timeframe: &str) -> Result<Vec<Bar>, QuorumError>;

    /// Symbols the backend can serve for a timeframe.
    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, QuorumError>;
}
