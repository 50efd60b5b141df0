//! Raw close-price passthrough.
//!
//! Exists so signal rules can reference the price series by name the same
//! way they reference any derived series. No parameters, no warm-up.

use crate::domain::error::ComputationError;
use crate::domain::registry::{Channels, IndicatorOutput, Params};

pub fn price(channels: &Channels, _params: &Params) -> Result<IndicatorOutput, ComputationError> {
    Ok(IndicatorOutput::Single(channels.close.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_util::OwnedChannels;

    #[test]
    fn price_is_identity_on_close() {
        let owned = OwnedChannels::from_closes(&[10.0, 11.0, 12.0]);
        let out = price(&owned.channels(), &Params::new()).unwrap();
        assert_eq!(out, IndicatorOutput::Single(vec![10.0, 11.0, 12.0]));
    }

    #[test]
    fn price_empty_window() {
        let owned = OwnedChannels::from_closes(&[]);
        let out = price(&owned.channels(), &Params::new()).unwrap();
        assert_eq!(out, IndicatorOutput::Single(vec![]));
    }
}
