//! Pricing Context Construction

use std::collections::BTreeMap;
use std::sync::Arc;

use pricing_core::{PaymentStrategy, PricingError, Result};

use crate::classifier::SubscriptionRoot;
use crate::clock::Clock;
use crate::model::PricingContext;
use crate::schedule::PeriodScheduler;

/// Assembles the pricing context of one subscription root
#[derive(Clone)]
pub struct PricingContextBuilder {
    clock: Arc<dyn Clock>,
    scheduler: PeriodScheduler,
}

impl PricingContextBuilder {
    pub fn new(clock: Arc<dyn Clock>, scheduler: PeriodScheduler) -> Self {
        Self { clock, scheduler }
    }

    /// Resolve the root's terms and lay out its forward schedule
    pub fn build(&self, subscription: SubscriptionRoot<'_>) -> Result<PricingContext> {
        let root = subscription.item;
        let attributes = &root.attributes;
        let flow = attributes.flow.unwrap_or_default();

        let payment_strategy = attributes
            .payment_strategy
            .as_deref()
            .ok_or_else(|| {
                PricingError::invalid(format!("item {} has no payment strategy", root.id))
            })?
            .parse::<PaymentStrategy>()
            .inspect_err(|e| {
                tracing::warn!(root_item_id = %root.id, error = %e, "Rejected payment strategy");
            })?;

        let period_type = root.price.period_type.ok_or_else(|| {
            PricingError::invalid(format!("item {} has no recurring period", root.id))
        })?;
        if root.price.period_frequency == 0 {
            return Err(PricingError::invalid(format!(
                "item {} has a period frequency of zero",
                root.id
            )));
        }

        let currency = root.price.recurring_price.currency.clone();
        root.price.subtotal.ensure_currency(&currency)?;

        let atypical_next_bill_date = if flow.is_modification() {
            attributes.atypical_next_bill_date
        } else {
            None
        };

        let mut context = PricingContext {
            root_item_id: root.id.clone(),
            flow,
            existing_subscription_id: attributes.existing_subscription_id.clone(),
            payment_strategy,
            period_type,
            period_frequency: root.price.period_frequency,
            term_duration: root.term_duration.clone(),
            currency,
            atypical_next_bill_date,
            today: self.clock.today(),
            dependents_promoted: subscription.dependents_promoted,
            period_definitions: BTreeMap::new(),
        };
        context.period_definitions = self.scheduler.build_schedule(&context)?;

        tracing::debug!(
            root_item_id = %context.root_item_id,
            flow = %context.flow,
            strategy = %context.payment_strategy,
            horizon = self.scheduler.horizon(),
            "Built pricing context"
        );

        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_core::{Flow, ItemAttributes, PeriodType};
    use rust_decimal_macros::dec;

    use crate::test_support::{fixed_clock, recurring_item, utc};

    fn builder() -> PricingContextBuilder {
        PricingContextBuilder::new(fixed_clock(), PeriodScheduler::new(12))
    }

    fn attributes(flow: Option<Flow>, strategy: Option<&str>) -> ItemAttributes {
        ItemAttributes {
            flow,
            existing_subscription_id: None,
            payment_strategy: strategy.map(String::from),
            atypical_next_bill_date: Some(utc(2026, 11, 7)),
        }
    }

    #[test]
    fn test_create_ignores_atypical_date() {
        let root = recurring_item("plan", PeriodType::Monthly, dec!(29.00))
            .with_attributes(attributes(None, Some("POSTPAID")));

        let context = builder().build(SubscriptionRoot::top_level(&root)).unwrap();
        assert_eq!(context.flow, Flow::Create);
        assert_eq!(context.payment_strategy, PaymentStrategy::Postpaid);
        assert_eq!(context.atypical_next_bill_date, None);
        assert_eq!(context.today, utc(2026, 10, 16));
        assert_eq!(context.horizon(), 12);
        assert_eq!(context.currency.as_str(), "USD");
    }

    #[test]
    fn test_modification_keeps_atypical_date() {
        let mut attrs = attributes(Some(Flow::Upgrade), Some("POSTPAID"));
        attrs.existing_subscription_id = Some("sub-42".into());
        let root = recurring_item("plan", PeriodType::Monthly, dec!(29.00)).with_attributes(attrs);

        let context = builder().build(SubscriptionRoot::top_level(&root)).unwrap();
        assert_eq!(context.atypical_next_bill_date, Some(utc(2026, 11, 7)));
        assert_eq!(context.existing_subscription_id.as_deref(), Some("sub-42"));
        assert!(context.has_stub_period());
        assert_eq!(context.period(1).unwrap().bill_date, utc(2026, 11, 7));
    }

    #[test]
    fn test_payment_strategy_is_required() {
        for strategy in [None, Some(""), Some("  "), Some("MONTHLY_ARREARS")] {
            let root = recurring_item("plan", PeriodType::Monthly, dec!(29.00))
                .with_attributes(attributes(Some(Flow::Create), strategy));
            let err = builder().build(SubscriptionRoot::top_level(&root)).unwrap_err();
            assert!(matches!(err, PricingError::InvalidPricingConfiguration(_)));
        }
    }

    #[test]
    fn test_dependents_promoted_follows_root_position() {
        let root = recurring_item("bundle", PeriodType::Monthly, dec!(15.00))
            .with_attributes(attributes(None, Some("IN_ADVANCE")))
            .separate();

        let top_level = builder().build(SubscriptionRoot::top_level(&root)).unwrap();
        assert!(top_level.dependents_promoted);

        let promoted = builder().build(SubscriptionRoot::promoted(&root)).unwrap();
        assert!(!promoted.dependents_promoted);
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let mut root = recurring_item("plan", PeriodType::Monthly, dec!(29.00))
            .with_attributes(attributes(None, Some("IN_ADVANCE")));
        root.price.period_frequency = 0;
        assert!(builder().build(SubscriptionRoot::top_level(&root)).is_err());
    }

    #[test]
    fn test_unsupported_period_type_rejected() {
        let root = recurring_item("plan", PeriodType::Weekly, dec!(7.00))
            .with_attributes(attributes(None, Some("IN_ADVANCE")));
        assert!(builder().build(SubscriptionRoot::top_level(&root)).is_err());
    }
}
