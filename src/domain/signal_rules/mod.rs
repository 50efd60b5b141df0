//! Builtin signal functions.
//!
//! Every signal function has the uniform signature
//! `fn(&SeriesBindings, &Params) -> Result<Vec<Signal>, ComputationError>`.
//! Reference inputs arrive pre-resolved and keyed by the function's formal
//! parameter names; literal parameters arrive in the params bag.
//!
//! Outputs align to the shortest input series. A NaN at any input position
//! (or the previous position, for crossing rules) yields HOLD there, so
//! indicator warm-up degrades to HOLD instead of spurious trades.

pub mod band_breakout;
pub mod cross_over;
pub mod threshold;
pub mod zero_cross;

pub use band_breakout::band_breakout;
pub use cross_over::cross_over;
pub use threshold::threshold;
pub use zero_cross::zero_cross;
