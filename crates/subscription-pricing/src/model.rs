//! Domain Models
//!
//! The per-root pricing context and the priced output. Everything here is
//! request-scoped: built, filled and handed back within one pricing call.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use pricing_core::{Currency, Flow, Money, PaymentStrategy, PeriodType, Result, TermDuration};
use serde::{Deserialize, Serialize};

/// One billing period of the forward schedule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDefinition {
    pub bill_date: DateTime<Utc>,
    pub period_start_date: DateTime<Utc>,
    /// Last nanosecond of the period; the next period starts 1ns later
    pub period_end_date: DateTime<Utc>,
}

/// Everything needed to price one subscription root
///
/// Built once by [`crate::PricingContextBuilder`] and not modified afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingContext {
    pub root_item_id: String,

    pub flow: Flow,

    pub existing_subscription_id: Option<String>,

    pub payment_strategy: PaymentStrategy,

    pub period_type: PeriodType,

    pub period_frequency: u32,

    pub term_duration: Option<TermDuration>,

    pub currency: Currency,

    /// Pre-existing mid-cycle bill date; always `None` for CREATE
    pub atypical_next_bill_date: Option<DateTime<Utc>>,

    /// Midnight UTC of the pricing day
    pub today: DateTime<Utc>,

    /// The root's dependents are priced as roots of their own
    pub dependents_promoted: bool,

    /// Period number (1-based) to definition, ordered by period number
    pub period_definitions: BTreeMap<u32, PeriodDefinition>,
}

impl PricingContext {
    /// Definition of a scheduled period
    pub fn period(&self, number: u32) -> Option<&PeriodDefinition> {
        self.period_definitions.get(&number)
    }

    /// Number of scheduled periods
    pub fn horizon(&self) -> usize {
        self.period_definitions.len()
    }

    /// Whether period 1 is a short period ending at the atypical bill date
    pub fn has_stub_period(&self) -> bool {
        self.atypical_next_bill_date.is_some()
            && self.payment_strategy == PaymentStrategy::Postpaid
    }

    pub fn zero(&self) -> Money {
        Money::zero(self.currency.clone())
    }
}

/// Price of one cart item for one evaluation (due now, or one period)
///
/// `amount = prorated_amount + prior_unbilled_amount - credited_amount`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPriceDetail {
    pub item_id: String,

    pub product_id: String,

    /// Set for dependents priced together with their root
    pub parent_item_id: Option<String>,

    pub amount: Money,

    pub prorated_amount: Money,

    pub credited_amount: Money,

    pub prior_unbilled_amount: Money,
}

/// Field-wise sums over a set of item details
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceTotals {
    pub amount: Money,
    pub prorated_amount: Money,
    pub credited_amount: Money,
    pub prior_unbilled_amount: Money,
}

impl PriceTotals {
    /// Sum each component and derive the amount from the sums
    pub fn from_details(details: &[ItemPriceDetail], context: &PricingContext) -> Result<Self> {
        let prorated_amount = sum_field(details, |d| &d.prorated_amount, context)?;
        let credited_amount = sum_field(details, |d| &d.credited_amount, context)?;
        let prior_unbilled_amount = sum_field(details, |d| &d.prior_unbilled_amount, context)?;
        let amount = prorated_amount
            .checked_add(&prior_unbilled_amount)?
            .checked_sub(&credited_amount)?;

        Ok(Self {
            amount,
            prorated_amount,
            credited_amount,
            prior_unbilled_amount,
        })
    }
}

/// Sum one money field over item details, starting from zero in the context currency
pub fn sum_field<F>(
    details: &[ItemPriceDetail],
    field: F,
    context: &PricingContext,
) -> Result<Money>
where
    F: Fn(&ItemPriceDetail) -> &Money,
{
    details
        .iter()
        .try_fold(context.zero(), |total, detail| total.checked_add(field(detail)))
}

/// Estimated charge for one scheduled period
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EstimatedFuturePayment {
    pub period: u32,

    pub bill_date: DateTime<Utc>,

    pub period_start_date: DateTime<Utc>,

    pub period_end_date: DateTime<Utc>,

    pub amount: Money,

    pub prorated_amount: Money,

    pub credited_amount: Money,

    pub prior_unbilled_amount: Money,

    pub items: Vec<ItemPriceDetail>,
}

/// Priced result for one subscription root
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceResponse {
    pub root_item_id: String,

    pub flow: Flow,

    pub payment_strategy: PaymentStrategy,

    pub existing_subscription_id: Option<String>,

    pub currency: Currency,

    /// Charged at checkout; negative means a refund
    pub amount_due_now: Money,

    pub prorated_amount: Money,

    pub credited_amount: Money,

    pub prior_unbilled_amount: Money,

    pub items: Vec<ItemPriceDetail>,

    pub estimated_future_payments: Vec<EstimatedFuturePayment>,
}

impl PriceResponse {
    /// Whether checkout pays money back
    pub fn is_refund(&self) -> bool {
        self.amount_due_now.is_negative()
    }

    /// Sum of all estimated future payments
    pub fn total_scheduled(&self) -> Result<Money> {
        self.estimated_future_payments
            .iter()
            .try_fold(Money::zero(self.currency.clone()), |total, payment| {
                total.checked_add(&payment.amount)
            })
    }

    /// Generate summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "Subscription {} ({}, {})",
            self.root_item_id, self.flow, self.payment_strategy
        );
        if let Some(existing) = &self.existing_subscription_id {
            let _ = writeln!(s, "Existing subscription: {existing}");
        }

        let label = if self.is_refund() { "Refund now" } else { "Due now" };
        let _ = writeln!(s, "{label}: {}", self.amount_due_now);
        for item in &self.items {
            let _ = writeln!(s, "  {:<24} {}", item.product_id, item.amount);
        }

        let _ = writeln!(s, "\nEstimated future payments:");
        for payment in &self.estimated_future_payments {
            let _ = writeln!(
                s,
                "  #{:<3} {}  {} .. {}  {}",
                payment.period,
                payment.bill_date.date_naive(),
                payment.period_start_date.date_naive(),
                payment.period_end_date.date_naive(),
                payment.amount
            );
        }
        if let Ok(total) = self.total_scheduled() {
            let _ = writeln!(s, "Total scheduled: {total}");
        }

        s
    }
}
