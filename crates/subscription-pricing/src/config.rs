//! Pricing Configuration

use pricing_core::{PricingError, Result};
use serde::{Deserialize, Serialize};

/// Number of future periods estimated for every subscription root
pub const DEFAULT_HORIZON: u32 = 12;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Periods in the forward schedule
    pub horizon: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
        }
    }
}

impl PricingConfig {
    pub const fn with_horizon(horizon: u32) -> Self {
        Self { horizon }
    }

    /// Load from environment (`PRICING_HORIZON`), falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let horizon = lookup("PRICING_HORIZON")
            .and_then(|h| h.trim().parse().ok())
            .unwrap_or(DEFAULT_HORIZON);
        Self { horizon }
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(PricingError::invalid("horizon must cover at least one period"));
        }
        Ok(())
    }
}
