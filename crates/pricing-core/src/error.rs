//! Error Types

use thiserror::Error;

/// Result type alias for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;

/// Pricing error types
///
/// Pricing is pure computation over already-resolved cart data, so every
/// failure is deterministic: the same input fails the same way every time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// The cart or subscription data cannot be priced as given
    #[error("Invalid pricing configuration: {0}")]
    InvalidPricingConfiguration(String),
}

impl PricingError {
    /// Shorthand constructor
    pub fn invalid(reason: impl Into<String>) -> Self {
        PricingError::InvalidPricingConfiguration(reason.into())
    }

    /// Check if error is retryable
    ///
    /// Never: callers must fix the input instead.
    pub const fn is_retryable(&self) -> bool {
        false
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PricingError::InvalidPricingConfiguration(_) => {
                "This subscription cannot be priced with its current configuration.".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefix() {
        let err = PricingError::invalid("payment strategy is required");
        assert_eq!(
            err.to_string(),
            "Invalid pricing configuration: payment strategy is required"
        );
        assert!(!err.is_retryable());
    }
}
