//! Cart Pricing Facade

use std::sync::Arc;

use pricing_core::{Cart, Result};

use crate::assembler::ResponseAssembler;
use crate::classifier::{SubscriptionRoot, subscription_roots};
use crate::clock::Clock;
use crate::config::PricingConfig;
use crate::context::PricingContextBuilder;
use crate::model::PriceResponse;
use crate::proration::{ProrationAdjustments, ProrationCalculator};
use crate::schedule::PeriodScheduler;

/// Prices every subscription in a cart
#[derive(Clone)]
pub struct SubscriptionPricer {
    builder: PricingContextBuilder,
    assembler: ResponseAssembler,
}

impl SubscriptionPricer {
    /// Create a pricer with neutral adjustments
    pub fn new(config: &PricingConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: PricingContextBuilder::new(clock, PeriodScheduler::new(config.horizon)),
            assembler: ResponseAssembler::default(),
        })
    }

    /// Replace the credit / prior-unbilled / modification hooks
    pub fn with_adjustments(mut self, adjustments: Arc<dyn ProrationAdjustments>) -> Self {
        self.assembler = ResponseAssembler::new(ProrationCalculator::new(adjustments));
        self
    }

    /// One response per subscription root, in cart order
    ///
    /// Fails as a whole if any root cannot be priced.
    pub fn price_cart(&self, cart: &Cart) -> Result<Vec<PriceResponse>> {
        let responses = subscription_roots(cart)
            .map(|root| self.price_root(root))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| {
                tracing::warn!(cart_id = %cart.id, error = %e, "Cart pricing rejected");
            })?;

        tracing::info!(cart_id = %cart.id, roots = responses.len(), "Priced cart");
        Ok(responses)
    }

    /// Price a single subscription root
    pub fn price_root(&self, root: SubscriptionRoot<'_>) -> Result<PriceResponse> {
        let context = self.builder.build(root)?;
        self.assembler.assemble(root.item, &context)
    }
}
