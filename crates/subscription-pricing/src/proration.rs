//! Proration
//!
//! Turns an item's recurring terms into the amounts owed for one evaluation:
//! due now (`period == None`) or one scheduled period (`Some(n)`).
//!
//! Only the short first period of a postpaid subscription carried over to a
//! mid-cycle bill date is day-prorated. Crediting prior payments, billing
//! prior unbilled usage and repricing against an existing subscription are
//! hooks on [`ProrationAdjustments`]; [`StandardAdjustments`] leaves them
//! neutral.

use std::sync::Arc;

use chrono::TimeDelta;
use pricing_core::{CartItem, Money, PricingError, Result};
use rust_decimal::Decimal;

use crate::clock::start_of_day;
use crate::model::{ItemPriceDetail, PeriodDefinition, PricingContext};
use crate::schedule::days_in_period;

/// Override points for amounts that depend on the prior subscription
pub trait ProrationAdjustments: Send + Sync {
    /// Credit for prepaid time being replaced (in-advance edits)
    fn credited_amount(
        &self,
        _item: &CartItem,
        _period: Option<u32>,
        context: &PricingContext,
    ) -> Result<Money> {
        Ok(context.zero())
    }

    /// Charges rendered but not yet billed (postpaid edits)
    fn prior_unbilled_amount(
        &self,
        _item: &CartItem,
        _period: Option<u32>,
        context: &PricingContext,
    ) -> Result<Money> {
        Ok(context.zero())
    }

    /// Period price for EDIT/UPGRADE/DOWNGRADE/TERMINATE flows
    ///
    /// Defaults to the typical recurring price; no proration against the
    /// existing subscription's price is applied.
    fn modification_price(
        &self,
        item: &CartItem,
        _period: u32,
        _context: &PricingContext,
    ) -> Result<Money> {
        Ok(item.price.recurring_price.clone())
    }
}

/// Neutral adjustments: no credits, no prior unbilled charges
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardAdjustments;

impl ProrationAdjustments for StandardAdjustments {}

/// Computes item-level amounts for a pricing context
#[derive(Clone)]
pub struct ProrationCalculator {
    adjustments: Arc<dyn ProrationAdjustments>,
}

impl Default for ProrationCalculator {
    fn default() -> Self {
        Self::new(Arc::new(StandardAdjustments))
    }
}

impl ProrationCalculator {
    pub fn new(adjustments: Arc<dyn ProrationAdjustments>) -> Self {
        Self { adjustments }
    }

    /// Price owed for the item, before credits and prior unbilled charges
    pub fn prorated_amount(
        &self,
        item: &CartItem,
        period: Option<u32>,
        context: &PricingContext,
    ) -> Result<Money> {
        validate_terms(item, context)?;

        let Some(period) = period else {
            // Due now: the checkout subtotal, charged in full
            return Ok(item.price.subtotal.clone());
        };

        let amount = if period == 1 && context.has_stub_period() {
            stub_period_amount(item, context)?
        } else if context.flow.is_modification() {
            self.adjustments.modification_price(item, period, context)?
        } else {
            item.price.recurring_price.clone()
        };

        amount.ensure_currency(&context.currency)?;
        Ok(amount)
    }

    pub fn credited_amount(
        &self,
        item: &CartItem,
        period: Option<u32>,
        context: &PricingContext,
    ) -> Result<Money> {
        let amount = self.adjustments.credited_amount(item, period, context)?;
        amount.ensure_currency(&context.currency)?;
        Ok(amount)
    }

    pub fn prior_unbilled_amount(
        &self,
        item: &CartItem,
        period: Option<u32>,
        context: &PricingContext,
    ) -> Result<Money> {
        let amount = self.adjustments.prior_unbilled_amount(item, period, context)?;
        amount.ensure_currency(&context.currency)?;
        Ok(amount)
    }

    /// Price detail for one item
    pub fn item_detail(
        &self,
        item: &CartItem,
        parent: Option<&CartItem>,
        period: Option<u32>,
        context: &PricingContext,
    ) -> Result<ItemPriceDetail> {
        let prorated_amount = self.prorated_amount(item, period, context)?;
        let credited_amount = self.credited_amount(item, period, context)?;
        let prior_unbilled_amount = self.prior_unbilled_amount(item, period, context)?;
        let amount = prorated_amount
            .checked_add(&prior_unbilled_amount)?
            .checked_sub(&credited_amount)?;

        tracing::debug!(
            item_id = %item.id,
            period = ?period,
            amount = %amount,
            "Priced item"
        );

        Ok(ItemPriceDetail {
            item_id: item.id.clone(),
            product_id: item.product_id.clone(),
            parent_item_id: parent.map(|p| p.id.clone()),
            amount,
            prorated_amount,
            credited_amount,
            prior_unbilled_amount,
        })
    }

    /// Details for the root and its directly attached dependents
    ///
    /// Dependents flagged separate from primary are skipped, as are all
    /// dependents of a root whose dependents were promoted to roots of their
    /// own. Only one level of nesting is walked.
    pub fn item_details(
        &self,
        root: &CartItem,
        period: Option<u32>,
        context: &PricingContext,
    ) -> Result<Vec<ItemPriceDetail>> {
        let mut details = vec![self.item_detail(root, None, period, context)?];

        if !context.dependents_promoted {
            for dependent in root.dependents.iter().filter(|d| !d.separate_from_primary) {
                details.push(self.item_detail(dependent, Some(root), period, context)?);
            }
        }

        Ok(details)
    }
}

/// Item terms must match the subscription they are priced under
fn validate_terms(item: &CartItem, context: &PricingContext) -> Result<()> {
    let price = &item.price;
    if price.period_type != Some(context.period_type)
        || price.period_frequency != context.period_frequency
    {
        let found = price
            .period_type
            .map_or_else(|| "one-time".to_string(), |t| t.to_string());
        tracing::warn!(item_id = %item.id, "Item terms do not match subscription");
        return Err(PricingError::invalid(format!(
            "item {} is billed {} x{}, subscription is billed {} x{}",
            item.id, found, price.period_frequency, context.period_type, context.period_frequency
        )));
    }
    price.subtotal.ensure_currency(&context.currency)?;
    price.recurring_price.ensure_currency(&context.currency)?;
    Ok(())
}

/// Recurring price scaled to the days of the short first period
fn stub_period_amount(item: &CartItem, context: &PricingContext) -> Result<Money> {
    let definition = context
        .period(1)
        .ok_or_else(|| PricingError::invalid("first period has not been scheduled"))?;

    let nominal_days = days_in_period(context.period_type, context.period_frequency)?;
    let price_per_day = item
        .price
        .recurring_price
        .div_decimal(Decimal::from(nominal_days))?;

    Ok(price_per_day
        .mul_decimal(Decimal::from(days_to_bill(definition)))?
        .rounded())
}

/// Whole days from period start through the day after period end
///
/// A bill date already in the past yields zero days rather than a negative charge.
fn days_to_bill(definition: &PeriodDefinition) -> i64 {
    let start = start_of_day(definition.period_start_date);
    let end = start_of_day(definition.period_end_date + TimeDelta::days(1));
    (end - start).num_days().max(0)
}
