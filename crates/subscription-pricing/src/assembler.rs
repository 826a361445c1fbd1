//! Response Assembly
//!
//! Runs the calculator once for "due now" and once per scheduled period,
//! then aggregates the item details into the priced response.

use pricing_core::{CartItem, PricingError, Result};

use crate::model::{EstimatedFuturePayment, PriceResponse, PriceTotals, PricingContext};
use crate::proration::ProrationCalculator;

/// Aggregates item-level amounts into due-now and per-period responses
#[derive(Clone, Default)]
pub struct ResponseAssembler {
    calculator: ProrationCalculator,
}

impl ResponseAssembler {
    pub const fn new(calculator: ProrationCalculator) -> Self {
        Self { calculator }
    }

    pub const fn calculator(&self) -> &ProrationCalculator {
        &self.calculator
    }

    /// Price one subscription root under its context
    pub fn assemble(&self, root: &CartItem, context: &PricingContext) -> Result<PriceResponse> {
        let items = self.calculator.item_details(root, None, context)?;
        let due_now = PriceTotals::from_details(&items, context)?;
        let estimated_future_payments = self.future_payments(root, context)?;

        tracing::info!(
            root_item_id = %root.id,
            flow = %context.flow,
            strategy = %context.payment_strategy,
            amount_due_now = %due_now.amount,
            periods = estimated_future_payments.len(),
            "Priced subscription"
        );

        Ok(PriceResponse {
            root_item_id: root.id.clone(),
            flow: context.flow,
            payment_strategy: context.payment_strategy,
            existing_subscription_id: context.existing_subscription_id.clone(),
            currency: context.currency.clone(),
            amount_due_now: due_now.amount,
            prorated_amount: due_now.prorated_amount,
            credited_amount: due_now.credited_amount,
            prior_unbilled_amount: due_now.prior_unbilled_amount,
            items,
            estimated_future_payments,
        })
    }

    /// One estimated payment per scheduled period, in period order
    pub fn future_payments(
        &self,
        root: &CartItem,
        context: &PricingContext,
    ) -> Result<Vec<EstimatedFuturePayment>> {
        if context.period_definitions.is_empty() {
            return Err(PricingError::invalid(format!(
                "no periods scheduled for item {}",
                root.id
            )));
        }

        context
            .period_definitions
            .iter()
            .map(|(&period, definition)| {
                let items = self.calculator.item_details(root, Some(period), context)?;
                let totals = PriceTotals::from_details(&items, context)?;

                Ok(EstimatedFuturePayment {
                    period,
                    bill_date: definition.bill_date,
                    period_start_date: definition.period_start_date,
                    period_end_date: definition.period_end_date,
                    amount: totals.amount,
                    prorated_amount: totals.prorated_amount,
                    credited_amount: totals.credited_amount,
                    prior_unbilled_amount: totals.prior_unbilled_amount,
                    items,
                })
            })
            .collect()
    }
}
